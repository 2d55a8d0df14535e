use folio_derive::api_model;
use folio_domain::models::LeadStatus;
use folio_kernel::error::ApiError;
use folio_kernel::validation::Validator;
use surrealdb::types::SurrealValue;

pub(crate) const DEFAULT_SOURCE: &str = "website";

#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct LeadRow {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub budget: String,
    pub message: String,
    pub source: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl LeadRow {
    pub(crate) fn into_lead(self) -> Lead {
        Lead {
            status: self.status.parse().unwrap_or_default(),
            id: self.uid,
            name: self.name,
            email: self.email,
            budget: self.budget,
            message: self.message,
            source: self.source,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A contact form submission.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub budget: String,
    pub message: String,
    /// Where the lead came from, `website` unless the form says otherwise.
    pub source: String,
    #[schema(value_type = String, example = "new")]
    pub status: LeadStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Public contact form payload.
#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct NewLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
}

/// A validated submission with its text normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewLead {
    pub name: String,
    pub email: String,
    pub budget: String,
    pub message: String,
    pub source: String,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl NewLeadRequest {
    /// # Errors
    /// Returns a bad request when a required field is missing, and the validation error
    /// listing every field that is too long or malformed.
    pub(crate) fn validate(&self) -> Result<NewLead, ApiError> {
        let (Some(name), Some(email), Some(message)) =
            (present(self.name.as_ref()), present(self.email.as_ref()), present(self.message.as_ref()))
        else {
            return Err(ApiError::bad_request("name, email, message are required"));
        };

        let email = email.to_lowercase();
        Validator::new()
            .length("name", name, 1, 80, "Name too long")
            .email("email", &email)
            .length("message", message, 1, 2000, "Message too long")
            .finish()?;

        Ok(NewLead {
            name: name.to_owned(),
            email,
            budget: self.budget.as_deref().map(str::trim).unwrap_or_default().to_owned(),
            message: message.to_owned(),
            source: present(self.source.as_ref()).unwrap_or(DEFAULT_SOURCE).to_owned(),
        })
    }
}

/// Admin listing filters.
#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct LeadListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub status: Option<LeadStatus>,
}

#[api_model]
pub struct LeadStatusRequest {
    /// `new`, `contacted`, `won` or `lost`.
    pub status: Option<String>,
}

impl LeadStatusRequest {
    /// # Errors
    /// Returns a bad request for a missing or unknown status.
    pub(crate) fn status(&self) -> Result<LeadStatus, ApiError> {
        self.status
            .as_deref()
            .and_then(|status| status.trim().parse().ok())
            .ok_or_else(|| ApiError::bad_request("Invalid status"))
    }
}
