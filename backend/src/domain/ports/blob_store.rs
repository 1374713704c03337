//! Port abstraction for attachment blob storage.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// The key is malformed or escapes the namespace.
        InvalidKey { key: String } => "invalid blob key: {key}",
        /// No object exists under the key.
        NotFound { key: String } => "blob not found: {key}",
        /// The backing storage failed.
        Io { message: String } => "blob storage failed: {message}",
    }
}

/// Namespaced object key such as `submissions/8812764429.pdf`.
///
/// ## Invariants
/// - `namespace` and `name` are non-empty.
/// - Neither contains a path separator or starts with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    namespace: String,
    name: String,
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
        && segment.chars().all(|c| !c.is_control())
}

impl BlobKey {
    /// Validate and construct a key.
    ///
    /// # Examples
    /// ```
    /// use daybook::domain::ports::BlobKey;
    ///
    /// let key = BlobKey::new("submissions", "42.pdf").unwrap();
    /// assert_eq!(key.to_string(), "submissions/42.pdf");
    /// assert!(BlobKey::new("submissions", "../etc/passwd").is_err());
    /// ```
    pub fn new(namespace: &str, name: &str) -> Result<Self, BlobStoreError> {
        if !is_safe_segment(namespace) || !is_safe_segment(name) {
            return Err(BlobStoreError::invalid_key(format!("{namespace}/{name}")));
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Object storage for uploaded attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(&self, key: &BlobKey, bytes: Vec<u8>) -> Result<String, BlobStoreError>;

    /// Read the object stored under `key`.
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, BlobStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("submissions", "")]
    #[case("", "1.pdf")]
    #[case("submissions", "..")]
    #[case("submissions", ".hidden")]
    #[case("submissions", "a/b.pdf")]
    #[case("submissions", "a\\b.pdf")]
    fn rejects_unsafe_segments(#[case] namespace: &str, #[case] name: &str) {
        assert!(matches!(
            BlobKey::new(namespace, name),
            Err(BlobStoreError::InvalidKey { .. })
        ));
    }

    #[rstest]
    fn displays_as_namespaced_path() {
        let key = BlobKey::new("submissions", "123.png").expect("valid key");
        assert_eq!(key.to_string(), "submissions/123.png");
        assert_eq!(key.name(), "123.png");
    }
}
