//! Common types used throughout Cirrus.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// An absolute path on the remote drive.
///
/// Paths are `/`-separated and always rooted at the drive root. They carry
/// no knowledge of how the server addresses them; see the graph crate's
/// `paths` module for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrivePath {
    components: Vec<String>,
}

impl DrivePath {
    /// Create a root path.
    pub fn root() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Create a path from string components.
    ///
    /// # Errors
    /// - Returns error if any component is empty or contains a separator
    pub fn from_components(components: Vec<String>) -> crate::Result<Self> {
        for comp in &components {
            validate_component(comp)?;
        }
        Ok(Self { components })
    }

    /// Parse a path string into a DrivePath.
    ///
    /// Leading and trailing separators are ignored, so `"docs/"`, `"/docs"`
    /// and `"/docs/"` are the same path.
    pub fn parse(path: &str) -> crate::Result<Self> {
        let path = path.trim_start_matches('/').trim_end_matches('/');
        if path.is_empty() {
            return Ok(Self::root());
        }

        let components: Vec<String> = path.split('/').map(String::from).collect();
        Self::from_components(components)
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the path components.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Convert to a string representation.
    pub fn to_string_path(&self) -> String {
        if self.is_root() {
            "/".to_string()
        } else {
            format!("/{}", self.components.join("/"))
        }
    }
}

fn validate_component(comp: &str) -> crate::Result<()> {
    if comp.is_empty() {
        return Err(crate::Error::InvalidInput(
            "Path component cannot be empty".to_string(),
        ));
    }
    if comp.contains('/') || comp.contains('\\') {
        return Err(crate::Error::InvalidInput(format!(
            "Path component cannot contain separators: {}",
            comp
        )));
    }
    Ok(())
}

impl fmt::Display for DrivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_path())
    }
}

/// Bearer token for the remote API. Zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token string.
    ///
    /// # Errors
    /// - Returns error if the token is empty or only whitespace
    pub fn new(token: impl Into<String>) -> crate::Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(crate::Error::InvalidInput(
                "Access token cannot be empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// Get the raw token.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_drive_path_root() {
        let path = DrivePath::root();
        assert!(path.is_root());
        assert_eq!(path.to_string_path(), "/");
        assert_eq!(DrivePath::parse("/").unwrap(), path);
        assert_eq!(DrivePath::parse("").unwrap(), path);
    }

    #[test]
    fn test_drive_path_parse() {
        let path = DrivePath::parse("/Documents/reports/q3.xlsx").unwrap();
        assert_eq!(path.components(), &["Documents", "reports", "q3.xlsx"]);
        assert_eq!(path.to_string_path(), "/Documents/reports/q3.xlsx");
    }

    #[test]
    fn test_drive_path_rejects_empty_component() {
        assert!(DrivePath::parse("/a//b").is_err());
        assert!(DrivePath::from_components(vec![String::new()]).is_err());
        assert!(DrivePath::from_components(vec!["a\\b".to_string()]).is_err());
    }

    #[test]
    fn test_access_token_redacted() {
        let token = AccessToken::new("eyJ0eXAi.secret").unwrap();
        assert_eq!(format!("{:?}", token), "AccessToken([REDACTED])");
        assert_eq!(token.secret(), "eyJ0eXAi.secret");
        assert!(AccessToken::new("  ").is_err());
    }

    proptest! {
        #[test]
        fn prop_components_round_trip(parts in prop::collection::vec("[a-zA-Z0-9 ._-]{1,12}", 0..6)) {
            let path = DrivePath::from_components(parts.clone()).unwrap();
            let reparsed = DrivePath::parse(&path.to_string_path()).unwrap();
            prop_assert_eq!(reparsed.components(), parts.as_slice());
        }

        #[test]
        fn prop_separator_in_component_is_rejected(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let joined = format!("{}/{}", a, b);
            prop_assert!(DrivePath::from_components(vec![joined]).is_err());
        }
    }
}
