// Fetch error types

/// Every way a GET against the dashboard API can fail. Accessors treat all
/// of them as one "fetch failed" outcome.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
