use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input did not resolve against the vehicle type table.
    #[error("unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    /// The server answered with a non-success status. Never retried.
    #[error("request to {url} failed with status {status}")]
    RequestFailed { status: u16, url: String },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Nothing matched where at least one element was expected and the
    /// response carried no session state either.
    #[error("no elements matched `{selector}` and the response carried no session state")]
    ExtractionEmpty { selector: String },

    /// The results panel listed some, but not all, price fields.
    #[error("price record is missing fields: {}", missing.join(", "))]
    IncompleteRecord { missing: Vec<&'static str> },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl CatalogError {
    /// True for failures raised by the request itself rather than by
    /// the markup it returned.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::Transport(_))
    }
}
