//! Collaborators the recipe engine talks to: the HMI tag runtime and the
//! file system holding the recipe tables.

use std::fmt;
use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::client::plc_types::parse_int_prefix;
use crate::error::BridgeError;

/// Value of one HMI tag as the runtime hands it out.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl TagValue {
    /// Script truthiness: `false`, `0`, `NaN` and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            TagValue::Bool(b) => *b,
            TagValue::Int(v) => *v != 0,
            TagValue::Real(v) => *v != 0.0 && !v.is_nan(),
            TagValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Bool(b) => Some(*b as i64),
            TagValue::Int(v) => Some(*v),
            TagValue::Real(v) if v.is_finite() => Some(v.trunc() as i64),
            TagValue::Real(_) => None,
            TagValue::Text(s) => parse_int_prefix(s),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            TagValue::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Int(v) => write!(f, "{}", v),
            TagValue::Real(v) => write!(f, "{}", v),
            TagValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        TagValue::Bool(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Int(v)
    }
}

impl From<u32> for TagValue {
    fn from(v: u32) -> Self {
        TagValue::Int(v as i64)
    }
}

impl From<u16> for TagValue {
    fn from(v: u16) -> Self {
        TagValue::Int(v as i64)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Text(v.to_owned())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::Text(v)
    }
}

/// Named tag access through the HMI runtime.
#[async_trait]
pub trait TagBridge: Send + Sync {
    async fn read_tag(&self, name: &str) -> Result<TagValue, BridgeError>;

    async fn write_tag(&self, name: &str, value: TagValue) -> Result<(), BridgeError>;

    /// Reads a tag set in one round trip. Values come back in `names` order.
    async fn read_tags(&self, names: &[String]) -> Result<Vec<TagValue>, BridgeError> {
        let mut values = Vec::with_capacity(names.len());
        for name in names {
            values.push(self.read_tag(name).await?);
        }
        Ok(values)
    }

    async fn write_tags(&self, values: Vec<(String, TagValue)>) -> Result<(), BridgeError> {
        for (name, value) in values {
            self.write_tag(&name, value).await?;
        }
        Ok(())
    }
}

/// Text file access. A missing file is reported as `io::ErrorKind::NotFound`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_text_file(&self, path: &Path) -> io::Result<String>;

    async fn write_text_file(&self, path: &Path, content: &str) -> io::Result<()>;

    async fn create_directory(&self, path: &Path) -> io::Result<()>;
}

pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_text_file(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_text_file(&self, path: &Path, content: &str) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_test() {
        assert!(TagValue::Bool(true).is_truthy());
        assert!(!TagValue::Int(0).is_truthy());
        assert!(TagValue::Int(2).is_truthy());
        assert!(!TagValue::Real(f64::NAN).is_truthy());
        assert!(!TagValue::from("").is_truthy());
        assert!(TagValue::from("Z1").is_truthy());
    }

    #[test]
    fn conversion_test() {
        assert_eq!(TagValue::from("12").as_i64(), Some(12));
        assert_eq!(TagValue::from("x").as_i64(), None);
        assert_eq!(TagValue::Real(3.7).as_i64(), Some(3));
        assert_eq!(TagValue::Int(4).as_text(), "4");
        assert_eq!(TagValue::from("abc").as_text(), "abc");
    }

    #[tokio::test]
    async fn local_file_system_test() {
        let dir = std::env::temp_dir().join(format!("hmi-recipe-fs-{}", std::process::id()));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        let fs = LocalFileSystem;
        fs.create_directory(&dir).await.unwrap();

        let file = dir.join("table.csv");
        let missing = fs.read_text_file(&file).await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);

        fs.write_text_file(&file, "a;b").await.unwrap();
        assert_eq!(fs.read_text_file(&file).await.unwrap(), "a;b");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
