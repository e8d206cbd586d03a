use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid toolbar settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("toolbar settings declare neither `tabs` nor `components`")]
    NoTabs,
}
