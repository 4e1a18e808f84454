//! Error taxonomy shared across layers
//!
//! `ValidationError` never leaves the form that produced it; `ApiError`
//! travels from the network layer back to the views as a display message.

use thiserror::Error;

/// Client-side form rejection, raised before any request is built
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("please select an account")]
    MissingAccount,
    #[error("please enter a valid amount")]
    InvalidAmount,
    #[error("please select a different destination account")]
    SameTransferAccount,
}

/// Failure of a single API round trip
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; message comes from the server body when parsable
    #[error("{message}")]
    Status { status: u16, message: String },
    /// Login/register response lacked a usable access token
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
