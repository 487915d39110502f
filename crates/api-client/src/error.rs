/// Failure of a single API call.
///
/// Gateway methods return this instead of panicking or propagating transport
/// errors; the caller decides how to surface it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete, or its response could not be read.
    #[error("connection error: {0}")]
    NetworkFailure(String),
    /// The server answered and reported a failure.
    #[error("{0}")]
    ApiFailure(String),
}

impl ApiError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ApiError::NetworkFailure(format!("could not connect: {err}"))
        } else if err.is_decode() || err.is_body() {
            ApiError::NetworkFailure(format!("unreadable response: {err}"))
        } else {
            ApiError::NetworkFailure(err.to_string())
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::NetworkFailure(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
