use crate::error::IdentityError;
use crate::model::{AccountRow, UpdateProfileRequest};
use folio_database::{Database, Total};
use folio_domain::models::Role;
use folio_kernel::timestamp;

const SELECT_ACCOUNT: &str = "SELECT * OMIT id FROM account";

#[derive(Debug, Clone)]
pub(crate) struct AccountRepository {
    db: Database,
}

impl AccountRepository {
    pub(crate) const fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) async fn find(&self, uid: &str) -> Result<Option<AccountRow>, IdentityError> {
        let mut rows = self
            .db
            .query(format!("{SELECT_ACCOUNT} WHERE uid = $uid LIMIT 1"))
            .bind(("uid", uid.to_owned()))
            .await?
            .take::<Vec<AccountRow>>(0)?;
        Ok(rows.pop())
    }

    pub(crate) async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, IdentityError> {
        let mut rows = self
            .db
            .query(format!("{SELECT_ACCOUNT} WHERE email = $email LIMIT 1"))
            .bind(("email", email.to_owned()))
            .await?
            .take::<Vec<AccountRow>>(0)?;
        Ok(rows.pop())
    }

    /// Whether `email` or `username` is used by an account other than `except`.
    pub(crate) async fn is_taken(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        except: Option<&str>,
    ) -> Result<bool, IdentityError> {
        let total = self
            .db
            .query(
                "SELECT count() AS total FROM account
                 WHERE (email = $email OR username = $username) AND uid != $except
                 GROUP ALL",
            )
            .bind(("email", email.map(str::to_owned)))
            .bind(("username", username.map(str::to_owned)))
            .bind(("except", except.map(str::to_owned)))
            .await?
            .take::<Option<Total>>(0)?;
        Ok(Total::of(total) > 0)
    }

    pub(crate) async fn create(&self, row: AccountRow) -> Result<(), IdentityError> {
        self.db
            .query("CREATE account CONTENT $row RETURN NONE")
            .bind(("row", row))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    /// Applies the supplied profile fields and returns the updated row.
    pub(crate) async fn update_profile(
        &self,
        uid: &str,
        patch: UpdateProfileRequest,
    ) -> Result<Option<AccountRow>, IdentityError> {
        let mut sets = vec!["updated_at = $now"];
        if patch.username.is_some() {
            sets.push("username = $username");
        }
        if patch.email.is_some() {
            sets.push("email = $email");
        }
        if patch.bio.is_some() {
            sets.push("bio = $bio");
        }
        if patch.avatar.is_some() {
            sets.push("avatar = $avatar");
        }

        self.db
            .query(format!("UPDATE account SET {} WHERE uid = $uid RETURN NONE", sets.join(", ")))
            .bind(("uid", uid.to_owned()))
            .bind(("now", timestamp()))
            .bind(("username", patch.username))
            .bind(("email", patch.email))
            .bind(("bio", patch.bio))
            .bind(("avatar", patch.avatar))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;

        self.find(uid).await
    }

    pub(crate) async fn set_password(&self, uid: &str, password_hash: String) -> Result<(), IdentityError> {
        self.db
            .query("UPDATE account SET password_hash = $hash, updated_at = $now WHERE uid = $uid RETURN NONE")
            .bind(("uid", uid.to_owned()))
            .bind(("hash", password_hash))
            .bind(("now", timestamp()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    pub(crate) async fn record_login(&self, uid: &str) -> Result<String, IdentityError> {
        let now = timestamp();
        self.db
            .query("UPDATE account SET last_login = $now WHERE uid = $uid RETURN NONE")
            .bind(("uid", uid.to_owned()))
            .bind(("now", now.clone()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(now)
    }

    pub(crate) async fn admin_exists(&self) -> Result<bool, IdentityError> {
        let total = self
            .db
            .query("SELECT count() AS total FROM account WHERE role = $role GROUP ALL")
            .bind(("role", Role::Admin.to_string()))
            .await?
            .take::<Option<Total>>(0)?;
        Ok(Total::of(total) > 0)
    }
}
