//! Configuration for registries and marshallers.
use std::path::{Path, PathBuf};

/// XML formatting options used when writing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlFormat {
    Compact,
    Pretty {
        indent_char: char,
        indent_size: usize,
    },
}

impl Default for XmlFormat {
    fn default() -> Self {
        XmlFormat::Pretty {
            indent_char: ' ',
            indent_size: 2,
        }
    }
}

/// Location of the UBL 2.0 schemas and output formatting.
///
/// `schema_dir` is the `xsd` directory of the UBL 2.0 distribution; main
/// document schemas are looked up under its `maindoc` subdirectory.
///
/// # Examples
/// ```rust
/// use ubl20_core::config::{Config, XmlFormat};
///
/// let config = Config::new("path/to/UBL2.0/xsd").with_format(XmlFormat::Compact);
/// assert_eq!(config.format(), XmlFormat::Compact);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    schema_dir: PathBuf,
    format: XmlFormat,
}

impl Config {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            format: XmlFormat::default(),
        }
    }

    pub fn with_format(mut self, format: XmlFormat) -> Self {
        self.format = format;
        self
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn maindoc_dir(&self) -> PathBuf {
        self.schema_dir.join("maindoc")
    }

    pub fn format(&self) -> XmlFormat {
        self.format
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new("./assets/schemas/UBL2.0/xsd")
    }
}
