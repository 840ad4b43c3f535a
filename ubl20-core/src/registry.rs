//! Namespace to document type and schema resolution.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::document_type::DocumentType;
use crate::model::UblDocument;
use crate::validation::{ValidationErrors, ValidationEvent};
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};
use thiserror::Error;

/// Errors raised while loading an XML Schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("invalid schema path: {path}")]
    InvalidPath { path: PathBuf },
    #[error("failed to compile schema {path}: {errors}")]
    Compile {
        path: PathBuf,
        errors: ValidationErrors,
    },
}

impl From<SchemaError> for ValidationEvent {
    fn from(err: SchemaError) -> Self {
        ValidationEvent::fatal(err.to_string())
    }
}

/// A registered document type together with the location of its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    document_type: DocumentType,
    namespace_uri: String,
    schema_path: PathBuf,
}

impl SchemaDescriptor {
    fn new(document_type: DocumentType, maindoc_dir: &Path) -> Self {
        Self {
            document_type,
            namespace_uri: document_type.namespace_uri(),
            schema_path: maindoc_dir.join(document_type.schema_file()),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Load the schema and build a fresh validation context for it.
    pub fn compile(&self) -> Result<SchemaValidationContext, SchemaError> {
        // libxml reports a missing file as an opaque parser error
        if !self.schema_path.exists() {
            return Err(SchemaError::NotFound {
                path: self.schema_path.clone(),
            });
        }
        let xsd_path = self
            .schema_path
            .to_str()
            .ok_or_else(|| SchemaError::InvalidPath {
                path: self.schema_path.clone(),
            })?;

        let mut parser_ctx = SchemaParserContext::from_file(xsd_path);
        SchemaValidationContext::from_parser(&mut parser_ctx).map_err(|errors| {
            SchemaError::Compile {
                path: self.schema_path.clone(),
                errors: errors.into(),
            }
        })
    }
}

/// Read-only lookup table from namespaces and Rust types to schemas.
///
/// Built once from a [`Config`] and shared by reference (or `Arc`) between
/// marshallers; nothing in it changes after construction.
///
/// # Examples
/// ```rust
/// use ubl20_core::config::Config;
/// use ubl20_core::document_type::DocumentType;
/// use ubl20_core::model::Invoice;
/// use ubl20_core::registry::DocumentTypeRegistry;
///
/// let registry = DocumentTypeRegistry::new(&Config::new("xsd"));
/// let descriptor = registry
///     .schema_for_namespace("urn:oasis:names:specification:ubl:schema:xsd:Invoice-2")
///     .expect("registered");
/// assert_eq!(descriptor.document_type(), DocumentType::Invoice);
/// assert_eq!(registry.schema_for::<Invoice>(), Some(descriptor));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentTypeRegistry {
    entries: Vec<SchemaDescriptor>,
    by_namespace: HashMap<String, usize>,
    by_type: HashMap<DocumentType, usize>,
}

impl DocumentTypeRegistry {
    /// Register every UBL 2.0 document type.
    pub fn new(config: &Config) -> Self {
        Self::with_types(config, DocumentType::ALL)
    }

    /// Register only `types`; duplicates are ignored.
    pub fn with_types(config: &Config, types: impl IntoIterator<Item = DocumentType>) -> Self {
        let maindoc_dir = config.maindoc_dir();
        let mut registry = Self {
            entries: Vec::new(),
            by_namespace: HashMap::new(),
            by_type: HashMap::new(),
        };
        for document_type in types {
            if registry.by_type.contains_key(&document_type) {
                continue;
            }
            let descriptor = SchemaDescriptor::new(document_type, &maindoc_dir);
            let idx = registry.entries.len();
            registry
                .by_namespace
                .insert(descriptor.namespace_uri.clone(), idx);
            registry.by_type.insert(document_type, idx);
            registry.entries.push(descriptor);
        }
        registry
    }

    pub fn schema_for_namespace(&self, namespace_uri: &str) -> Option<&SchemaDescriptor> {
        self.by_namespace
            .get(namespace_uri)
            .map(|&idx| &self.entries[idx])
    }

    pub fn schema_for_type(&self, document_type: DocumentType) -> Option<&SchemaDescriptor> {
        self.by_type
            .get(&document_type)
            .map(|&idx| &self.entries[idx])
    }

    pub fn schema_for<T: UblDocument>(&self) -> Option<&SchemaDescriptor> {
        self.schema_for_type(T::DOCUMENT_TYPE)
    }

    /// The document type bound to `namespace_uri`, if it is registered.
    pub fn document_type_for_namespace(&self, namespace_uri: &str) -> Option<DocumentType> {
        self.schema_for_namespace(namespace_uri)
            .map(SchemaDescriptor::document_type)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_registry_only_knows_its_types() {
        let config = Config::new("/schemas");
        let registry = DocumentTypeRegistry::with_types(
            &config,
            [DocumentType::Order, DocumentType::Invoice, DocumentType::Order],
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.schema_for_type(DocumentType::Order).is_some());
        assert!(registry.schema_for_type(DocumentType::CreditNote).is_none());
        assert_eq!(
            registry.document_type_for_namespace(&DocumentType::CreditNote.namespace_uri()),
            None
        );
    }

    #[test]
    fn schema_path_points_into_maindoc() {
        let registry = DocumentTypeRegistry::new(&Config::new("/schemas/xsd"));
        let descriptor = registry.schema_for_type(DocumentType::Reminder).unwrap();
        assert_eq!(
            descriptor.schema_path(),
            Path::new("/schemas/xsd/maindoc/UBL-Reminder-2.0.xsd")
        );
    }

    #[test]
    fn missing_schema_file_is_reported() {
        let registry = DocumentTypeRegistry::new(&Config::new("/does/not/exist"));
        let descriptor = registry.schema_for_type(DocumentType::Invoice).unwrap();
        assert!(matches!(
            descriptor.compile(),
            Err(SchemaError::NotFound { .. })
        ));
    }
}
