//! Transport trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use cirrus_common::Result;

/// HTTP method of a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Extra request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    /// Create a header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `Range: bytes=<start>-<end>`, both ends inclusive.
    pub fn range(start: u64, end: u64) -> Self {
        Self::new("Range", format!("bytes={}-{}", start, end))
    }
}

/// Authenticated request primitives against the remote API.
///
/// Paths are relative to the API base URL, e.g. `/me/drive/root`.
/// Implementations attach credentials themselves and map non-success
/// responses to transport errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read a resource.
    async fn get(&self, path: &str, headers: &[Header]) -> Result<Bytes>;

    /// Create a resource from a JSON body.
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Bytes>;

    /// Update a resource from a JSON body.
    async fn patch(&self, path: &str, body: Vec<u8>) -> Result<Bytes>;

    /// Delete a resource.
    async fn delete(&self, path: &str) -> Result<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, path: &str, headers: &[Header]) -> Result<Bytes> {
        (**self).get(path, headers).await
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        (**self).post(path, body).await
    }

    async fn patch(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        (**self).patch(path, body).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        (**self).delete(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_header() {
        let header = Header::range(10_485_760, 20_971_519);
        assert_eq!(header.name, "Range");
        assert_eq!(header.value, "bytes=10485760-20971519");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
