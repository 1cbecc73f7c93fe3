use std::fmt;

/// Longest upstream error body kept for diagnostics.
const MAX_BODY_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The request never produced a response (connect, timeout, tls, ...).
    Transport(String),
    /// The upstream answered with a non-success status.
    Status { status: u16, body: String },
    /// A success response whose body could not be decoded.
    Decode(String),
}

impl UpstreamError {

    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_status(status: u16, mut body: String) -> Self {
        if body.len() > MAX_BODY_LEN {
            let mut cut = MAX_BODY_LEN;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        UpstreamError::Status { status, body }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Transport(msg) => write!(f, "upstream request failed: {}", msg),
            UpstreamError::Status { status, body } => write!(f, "upstream answered with status {}: {}", status, body),
            UpstreamError::Decode(msg) => write!(f, "upstream response could not be decoded: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}
