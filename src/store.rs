use async_trait::async_trait;

use crate::error::{RequestError, ResourceLoadError};
use crate::model::FilePath;

/// Collaborator endpoint that lists the gallery's file paths.
#[async_trait]
pub trait ListSource: Send + Sync {
    async fn list(&self) -> Result<Vec<FilePath>, RequestError>;
}

/// Resolves an image `src` the way a browser would load it.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Returns the number of bytes received.
    async fn fetch(&self, src: &str) -> Result<usize, ResourceLoadError>;
}

/// Parses a `/list` body. Only a JSON array of strings is accepted.
pub fn parse_listing(body: &[u8]) -> Result<Vec<FilePath>, RequestError> {
    let value: json::Value =
        json::from_slice(body).map_err(|err| RequestError::Malformed(err.to_string()))?;

    let entries = value.as_array().ok_or_else(|| {
        RequestError::Malformed(format!("expected an array, got {}", kind_of(&value)))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry.as_str().map(FilePath::from).ok_or_else(|| {
                RequestError::Malformed(format!(
                    "entry {} is {}, expected a string",
                    i,
                    kind_of(entry)
                ))
            })
        })
        .collect()
}

fn kind_of(value: &json::Value) -> &'static str {
    match value {
        json::Value::Null => "null",
        json::Value::Bool(_) => "a boolean",
        json::Value::Number(_) => "a number",
        json::Value::String(_) => "a string",
        json::Value::Array(_) => "an array",
        json::Value::Object(_) => "an object",
    }
}
