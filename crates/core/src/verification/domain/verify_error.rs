use thiserror::Error;

use crate::capture::domain::verification_payload::PayloadError;

#[derive(Error, Debug)]
pub enum VerifyError {
    /// The request never produced a response.
    #[error("network error contacting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The multipart body could not be assembled; nothing was sent.
    #[error("failed to build multipart body: {0}")]
    Form(#[source] reqwest::Error),
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },
    #[error("failed to decode verification response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl VerifyError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}
