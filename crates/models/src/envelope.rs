//! Backend response envelope.
//!
//! Every endpoint answers `{ "message": { "success": bool, "message"?: str, "data"?: T } }`.
//! The envelope is decoded once into [`Reply`] so callers never re-inspect
//! the raw `success` flag.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::ModelError;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub message: EnvelopeBody<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeBody<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Decoded outcome of a backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok { data: Option<T>, message: Option<String> },
    Err { message: Option<String> },
}

impl<T> From<Envelope<T>> for Reply<T> {
    fn from(env: Envelope<T>) -> Self {
        let body = env.message;
        if body.success {
            Reply::Ok { data: body.data, message: body.message }
        } else {
            Reply::Err { message: body.message }
        }
    }
}

impl<T> Reply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Reply::Ok { message, .. } | Reply::Err { message } => message.as_deref(),
        }
    }
}

/// Decode a response body into a [`Reply`].
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<Reply<T>, ModelError> {
    let env: Envelope<T> = serde_json::from_slice(body).map_err(|e| ModelError::Decode(e.to_string()))?;
    Ok(env.into())
}

/// Best-effort extraction of the server message from an error body.
pub fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct Loose {
        message: Option<LooseBody>,
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseBody {
        Structured { message: Option<String> },
        Text(String),
    }

    let loose: Loose = serde_json::from_slice(body).ok()?;
    match loose.message? {
        LooseBody::Structured { message } => message.filter(|m| !m.is_empty()),
        LooseBody::Text(text) => Some(text).filter(|m| !m.is_empty()),
    }
}
