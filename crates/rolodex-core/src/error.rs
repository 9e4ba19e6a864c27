use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolodexError {
    #[error("Page fetch failed: {0}")]
    PageFetch(String),

    #[error("List unavailable: {0}")]
    ListUnavailable(String),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}
