use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No API key was configured for a networked extractor
    #[error("No API key configured (set OPENAI_API_KEY or pass --api-key)")]
    MissingApiKey,

    /// The HTTP request could not be sent or its body could not be read
    #[error("Request to the extraction endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Extraction endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The endpoint answered but carried no message content
    #[error("Extraction response contained no message content")]
    EmptyResponse,

    /// The model output contained no parseable JSON object
    #[error("No JSON object found in model output")]
    NoJsonObject,

    /// A JSON object was found but did not decode as an act set
    #[error("Failed to decode extracted act set: {0}")]
    Decode(#[from] serde_json::Error),

    /// The decoded act set cannot be normalized
    #[error("Extracted act set is unusable: {0}")]
    Invalid(#[from] iap_core::IapError),

    /// Every attempt failed; `last` is the final failure
    #[error("Failed to extract acts after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ExtractError>,
    },

    /// An error that occurs when reading or writing the extraction cache
    #[error("Extraction cache error: {0}")]
    Cache(String),
}
