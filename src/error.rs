//! Error types shared by configuration, the HTTP adapter and startup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver task owning the timer has stopped
    #[error("timer driver is not running")]
    DriverUnavailable,

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}
