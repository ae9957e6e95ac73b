#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Push API returned status {status}")]
    DeliveryFailed { status: u16 },
}
