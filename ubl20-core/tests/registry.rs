mod common;

use ubl20_core::document_type::DocumentType;
use ubl20_core::model::{CreditNote, Invoice, Order};
use ubl20_core::registry::DocumentTypeRegistry;

#[test]
fn every_document_type_resolves_by_namespace_and_type() {
    let registry = DocumentTypeRegistry::new(&common::config());
    assert_eq!(registry.len(), DocumentType::ALL.len());

    for document_type in DocumentType::ALL {
        let namespace = document_type.namespace_uri();
        let by_namespace = registry
            .schema_for_namespace(&namespace)
            .unwrap_or_else(|| panic!("{document_type} missing by namespace"));
        let by_type = registry
            .schema_for_type(document_type)
            .unwrap_or_else(|| panic!("{document_type} missing by type"));
        assert_eq!(by_namespace, by_type);
        assert_eq!(by_namespace.namespace_uri(), namespace);
        assert_eq!(
            registry.document_type_for_namespace(&namespace),
            Some(document_type)
        );
        assert!(
            by_type
                .schema_path()
                .ends_with(format!("maindoc/{}", document_type.schema_file())),
            "unexpected schema path {:?}",
            by_type.schema_path()
        );
    }
}

#[test]
fn typed_lookup_matches_namespace_lookup() {
    let registry = common::shared_registry();
    assert_eq!(
        registry.schema_for::<Invoice>(),
        registry.schema_for_namespace("urn:oasis:names:specification:ubl:schema:xsd:Invoice-2")
    );
    assert_eq!(
        registry.schema_for::<CreditNote>().map(|d| d.document_type()),
        Some(DocumentType::CreditNote)
    );
    assert_eq!(
        registry.schema_for::<Order>().map(|d| d.document_type()),
        Some(DocumentType::Order)
    );
}

#[test]
fn unknown_namespaces_are_absent() {
    let registry = common::shared_registry();
    assert!(registry.schema_for_namespace("urn:example:not-ubl").is_none());
    assert!(
        registry
            .schema_for_namespace("urn:oasis:names:specification:ubl:schema:xsd:Invoice-1")
            .is_none()
    );
    assert!(registry.schema_for_namespace("").is_none());
}

#[test]
fn restricted_registry_only_knows_its_types() {
    let registry = DocumentTypeRegistry::with_types(
        &common::config(),
        [DocumentType::Invoice, DocumentType::Invoice, DocumentType::Order],
    );
    assert_eq!(registry.len(), 2);
    assert!(registry.schema_for::<Invoice>().is_some());
    assert!(registry.schema_for::<CreditNote>().is_none());
}

#[test]
fn fixture_schemas_compile() {
    let registry = common::shared_registry();
    for document_type in [
        DocumentType::Invoice,
        DocumentType::CreditNote,
        DocumentType::Order,
    ] {
        let descriptor = registry.schema_for_type(document_type).expect("registered");
        descriptor
            .compile()
            .unwrap_or_else(|e| panic!("{document_type} schema failed to compile: {e}"));
    }
}
