//! Read, write and schema-validate UBL 2.0 business documents.
//!
//! A [`registry::DocumentTypeRegistry`] maps namespaces and Rust types to the
//! UBL 2.0 schemas, and a [`marshal::UblMarshaller`] uses it to turn XML into
//! typed documents and back, validating on the way.
//!
//! # Examples
//! ```rust
//! use ubl20_core::config::Config;
//! use ubl20_core::registry::DocumentTypeRegistry;
//!
//! let registry = DocumentTypeRegistry::new(&Config::default());
//! assert_eq!(registry.len(), 31);
//! ```
pub mod binding;
pub mod config;
pub mod document_type;
pub mod marshal;
pub mod model;
pub mod namespace;
pub mod registry;
pub mod validation;
pub mod xml;

pub use document_type::DocumentType;

#[cfg(test)]
mod tests {
    use crate::binding::BindError;
    use crate::document_type::DocumentType;
    use crate::marshal::MarshalError;

    #[test]
    fn misuse_is_told_apart_from_engine_failures() {
        assert!(MarshalError::UnknownNamespace("urn:x".into()).is_misuse());
        assert!(MarshalError::UnregisteredType(DocumentType::Waybill).is_misuse());
        assert!(!MarshalError::XmlParse("eof".into()).is_misuse());
        assert!(!MarshalError::Bind(BindError::MissingField("cbc:ID".into())).is_misuse());
    }
}
