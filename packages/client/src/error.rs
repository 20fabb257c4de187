use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not logged in")]
    NotLoggedIn,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ClientError {
    /// Build an `Api` error from a status and raw response body. Bodies that
    /// are not the backend's `{code, message}` shape are kept verbatim.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { code, message }) => ClientError::Api {
                status,
                code,
                message,
            },
            Err(_) => ClientError::Api {
                status,
                code: "HTTP_ERROR".into(),
                message: body.trim().to_string(),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
