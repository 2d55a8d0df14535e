use crate::error::IdentityError;
use crate::extract::AuthUser;
use crate::model::{AccountProfile, AccountRow, UpdateProfileRequest};
use crate::{Identity, password};
use folio_domain::config::AdminSeed;
use folio_domain::models::Role;
use folio_kernel::{safe_nanoid, timestamp};
use tracing::{info, warn};

/// Validated registration input.
#[derive(Debug)]
pub(crate) struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Identity {
    /// Resolves a bearer token to its account.
    ///
    /// # Errors
    /// [`IdentityError::Token`] for an invalid token, [`IdentityError::Auth`] when the account is
    /// gone or deactivated.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let claims = self.tokens.verify(token)?;
        let account = self
            .accounts
            .find(&claims.sub)
            .await?
            .ok_or_else(|| IdentityError::auth("User not found"))?;
        if !account.is_active {
            return Err(IdentityError::auth("User account is deactivated"));
        }
        Ok(AuthUser { profile: account.into_profile() })
    }

    pub(crate) async fn register(&self, input: NewAccount) -> Result<(String, AccountProfile), IdentityError> {
        if self.accounts.is_taken(Some(&input.email), Some(&input.username), None).await? {
            return Err(IdentityError::Duplicate { message: "User already exists".into(), context: None });
        }

        let now = timestamp();
        let row = AccountRow {
            uid: safe_nanoid!(),
            username: input.username,
            email: input.email,
            password_hash: password::hash(input.password).await?,
            role: input.role.to_string(),
            avatar: None,
            bio: None,
            is_active: true,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        };
        let token = self.tokens.issue(&row.uid, row.role())?;
        self.accounts.create(row.clone()).await?;

        info!(account = %row.uid, role = %row.role, "Account registered");
        Ok((token, row.into_profile()))
    }

    pub(crate) async fn login(&self, email: &str, secret: String) -> Result<(String, AccountProfile), IdentityError> {
        let Some(mut account) = self.accounts.find_by_email(email).await? else {
            return Err(IdentityError::auth("Invalid credentials"));
        };
        if !password::verify(secret, account.password_hash.clone()).await? {
            return Err(IdentityError::auth("Invalid credentials"));
        }
        if !account.is_active {
            return Err(IdentityError::auth("Account is deactivated"));
        }

        account.last_login = Some(self.accounts.record_login(&account.uid).await?);
        let token = self.tokens.issue(&account.uid, account.role())?;
        Ok((token, account.into_profile()))
    }

    pub(crate) async fn update_profile(
        &self,
        uid: &str,
        patch: UpdateProfileRequest,
    ) -> Result<AccountProfile, IdentityError> {
        if (patch.email.is_some() || patch.username.is_some())
            && self.accounts.is_taken(patch.email.as_deref(), patch.username.as_deref(), Some(uid)).await?
        {
            return Err(IdentityError::Duplicate {
                message: "Username or email is already in use".into(),
                context: None,
            });
        }

        self.accounts
            .update_profile(uid, patch)
            .await?
            .map(AccountRow::into_profile)
            .ok_or_else(|| IdentityError::NotFound { message: uid.to_owned().into(), context: None })
    }

    pub(crate) async fn change_password(
        &self,
        uid: &str,
        current: String,
        replacement: String,
    ) -> Result<(String, AccountProfile), IdentityError> {
        let account = self
            .accounts
            .find(uid)
            .await?
            .ok_or_else(|| IdentityError::NotFound { message: uid.to_owned().into(), context: None })?;
        if !password::verify(current, account.password_hash.clone()).await? {
            return Err(IdentityError::auth("Current password is incorrect"));
        }

        self.accounts.set_password(uid, password::hash(replacement).await?).await?;
        let token = self.tokens.issue(&account.uid, account.role())?;
        Ok((token, account.into_profile()))
    }

    /// Creates the configured administrator unless an admin already exists.
    pub(crate) async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), IdentityError> {
        if self.accounts.admin_exists().await? {
            return Ok(());
        }

        let email = seed.email.trim().to_lowercase();
        let username = seed.username.trim().to_owned();
        if email.is_empty() || username.is_empty() || seed.password.len() < 6 {
            return Err(IdentityError::Config {
                message: "admin seed needs a username, an email and a password of at least 6 characters".into(),
                context: Some("security.admin".into()),
            });
        }
        if self.accounts.is_taken(Some(&email), Some(&username), None).await? {
            warn!(%email, %username, "Admin seed skipped: username or email already registered");
            return Ok(());
        }

        let (_, profile) = self
            .register(NewAccount { username, email, password: seed.password.clone(), role: Role::Admin })
            .await?;
        info!(account = %profile.id, "Administrator account seeded");
        Ok(())
    }
}
