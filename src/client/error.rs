use reqwest::StatusCode;

/// The errors that may occur when talking to the finance tracker server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request.
    ///
    /// Holds the status code and the message from the server's error body.
    #[error("the server responded with {status}: {message}")]
    Status {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The `message` field of the error body, or the status reason.
        message: String,
    },
}
