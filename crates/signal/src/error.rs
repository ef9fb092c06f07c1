use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream rejected request with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Network error. Check your connection.",
            ApiError::Status { status, .. } if is_auth_status(*status) => {
                "The API key was rejected."
            }
            ApiError::Status { .. } => "The service has no data for this request.",
            ApiError::Decode(_) => "The service returned an unexpected response.",
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if is_auth_status(*status))
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
