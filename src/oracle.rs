pub mod client;
pub mod reply;
pub mod retry;

pub use client::{ChatCompletionsOracle, OracleEndpoint};
pub use reply::{extract_json_array, parse_json_array, strip_code_fences, FormatError};
pub use retry::{pause, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle transport failure: {0}")]
    Transport(String),
    #[error("oracle call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("oracle returned http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("oracle reply carried no message content")]
    EmptyReply,
}

/// One complete prompt for the text-generation service.
///
/// Retries re-send an identical request, so equality is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub model: String,
    pub system: String,
    pub user: String,
}

/// The external text-generation service. Replies are untrusted text; every
/// caller parses and validates them before use.
pub trait Oracle {
    fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        (**self).complete(request)
    }
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        (**self).complete(request)
    }
}
