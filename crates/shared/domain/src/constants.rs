//! Table names, OpenAPI tags and other fixed strings.

// Tables
pub const ACCOUNT: &str = "account";
pub const PROJECT: &str = "project";
pub const LEAD: &str = "lead";
pub const SETTING: &str = "setting";
pub const IMAGE: &str = "image";

// OpenAPI tags
pub const TAG_SYSTEM: &str = "System";
pub const TAG_AUTH: &str = "Auth";
pub const TAG_PROJECTS: &str = "Projects";
pub const TAG_LEADS: &str = "Leads";
pub const TAG_CONFIG: &str = "Config";
pub const TAG_IMAGES: &str = "Images";
pub const TAG_SITE: &str = "Site";

/// Media store bucket holding uploaded images.
pub const UPLOADS_BUCKET: &str = "uploads";
/// Public URL prefix under which uploaded images are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Environment variable prefix for configuration overrides (`FOLIO__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "FOLIO";
