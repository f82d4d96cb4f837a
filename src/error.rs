use thiserror::Error;

/// Outcome of a single GET against the camera server that did not succeed.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status} for {path}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid endpoint url: {0}")]
    Url(String),
}

/// Reasons the panel refuses an action before any request is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("Settings are locked, {0} was not sent")]
    Locked(&'static str),

    #[error("{action} is not available in the {profile} profile")]
    Unsupported {
        action: &'static str,
        profile: &'static str,
    },
}
