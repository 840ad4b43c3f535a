mod common;

use libxml::parser::Parser;
use ubl20_core::config::Config;
use ubl20_core::document_type::DocumentType;
use ubl20_core::marshal::{MarshalError, UblMarshaller};
use ubl20_core::registry::{DocumentTypeRegistry, SchemaError};
use ubl20_core::validation::{Severity, ValidationEvent, validate_document, validate_xml_str};

#[test]
fn valid_objects_produce_no_events() {
    let marshaller = common::marshaller();
    let errors = marshaller
        .validate(&common::sample_invoice(), DocumentType::Invoice)
        .expect("validate invoice");
    assert!(errors.is_empty(), "unexpected events:\n{errors}");

    let errors = marshaller
        .validate(&common::sample_credit_note(), DocumentType::CreditNote)
        .expect("validate credit note");
    assert!(errors.is_empty(), "unexpected events:\n{errors}");

    let errors = marshaller
        .validate(&common::sample_order(), DocumentType::Order)
        .expect("validate order");
    assert!(errors.is_empty(), "unexpected events:\n{errors}");
}

#[test]
fn invalid_object_reports_every_event() {
    let marshaller = common::marshaller();
    let mut invoice = common::sample_invoice();
    invoice.invoice_lines[0].line_extension_amount = None;
    invoice.invoice_lines.push(invoice.invoice_lines[0].clone());

    let errors = marshaller
        .validate(&invoice, DocumentType::Invoice)
        .expect("validation runs");
    assert!(errors.has_errors());
    // one event per broken line, not just the first
    assert!(errors.len() >= 2, "expected an event per line:\n{errors}");
    assert!(errors.iter().all(|e| e.severity >= Severity::Error));
}

#[test]
fn validate_refuses_mismatched_type() {
    let marshaller = common::marshaller();
    let err = marshaller
        .validate(&common::sample_order(), DocumentType::Invoice)
        .expect_err("order validated as invoice");
    assert!(matches!(
        err,
        MarshalError::TypeMismatch {
            actual: DocumentType::Order,
            declared: DocumentType::Invoice
        }
    ));
}

#[test]
fn validate_reports_missing_schema() {
    let marshaller = UblMarshaller::from_config(&Config::new("/nonexistent/ubl/xsd"));
    let err = marshaller
        .validate(&common::sample_invoice(), DocumentType::Invoice)
        .expect_err("schema missing");
    assert!(matches!(err, MarshalError::Schema(SchemaError::NotFound { .. })));
    assert!(!err.is_misuse());
}

#[test]
fn fixture_documents_validate() {
    let marshaller = common::marshaller();
    for name in [
        "invoice.xml",
        "invoice-precise.xml",
        "invoice-latin1.xml",
        "credit-note.xml",
        "order.xml",
    ] {
        let errors = marshaller.validate_xml_file(&common::document_path(name));
        assert!(errors.is_empty(), "{name} failed validation:\n{errors}");
    }
}

#[test]
fn invalid_fixture_reports_the_offending_element() {
    let marshaller = common::marshaller();
    let errors = marshaller.validate_xml_file(&common::document_path("invalid-invoice.xml"));
    assert_eq!(errors.len(), 1, "{errors}");
    let event = errors.iter().next().expect("one event");
    assert_eq!(event.severity, Severity::Error);
    assert!(event.message.contains("IssueDate"), "{}", event.message);
}

#[test]
fn raw_xml_failures_become_fatal_events() {
    let registry = common::shared_registry();

    let errors = validate_xml_str(&registry, &common::read_fixture("unknown-namespace.xml"));
    assert_eq!(errors.len(), 1);
    let event = errors.iter().next().expect("one event");
    assert_eq!(event.severity, Severity::Fatal);
    assert!(event.message.contains("urn:example:not-ubl"));

    let errors = validate_xml_str(&registry, "<root>no namespace</root>");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.iter().next().map(|e| e.severity),
        Some(Severity::Fatal)
    );

    let marshaller = common::marshaller();
    let errors = marshaller.validate_xml_file(&common::document_path("does-not-exist.xml"));
    assert_eq!(errors.len(), 1);
    assert!(errors
        .iter()
        .next()
        .is_some_and(|e| e.severity == Severity::Fatal && e.message.contains("not found")));
}

#[test]
fn validate_xml_str_uses_the_root_namespace() {
    let marshaller = common::marshaller();
    let order = common::read_fixture("order.xml");
    assert!(marshaller.validate_xml_str(&order).is_empty());
    assert_eq!(
        marshaller.detect_document_type(&order).expect("detect order"),
        DocumentType::Order
    );

    let err = marshaller
        .detect_document_type(&common::read_fixture("unknown-namespace.xml"))
        .expect_err("unknown namespace");
    assert!(matches!(err, MarshalError::UnknownNamespace(_)));
}

#[test]
fn validate_document_hands_events_to_the_handler() {
    let registry = common::shared_registry();
    let descriptor = registry
        .schema_for_type(DocumentType::Invoice)
        .expect("registered");
    let document = Parser::default()
        .parse_file(
            common::document_path("invalid-invoice.xml")
                .to_str()
                .expect("utf-8 path"),
        )
        .expect("parse invalid invoice");

    let mut seen = Vec::new();
    let mut handler = |event: &ValidationEvent| {
        seen.push(event.severity);
        false
    };
    let errors = validate_document(descriptor, &document, &mut handler)
        .expect_err("handler rejects the first event");
    assert_eq!(seen, vec![Severity::Error]);
    assert_eq!(errors.len(), 1);

    let valid = Parser::default()
        .parse_string(common::read_fixture("invoice.xml"))
        .expect("parse invoice");
    let mut untouched = |_: &ValidationEvent| -> bool { panic!("valid document raised an event") };
    validate_document(descriptor, &valid, &mut untouched).expect("valid invoice");
}

#[test]
fn unloadable_schema_fails_whatever_the_handler_says() {
    let registry = DocumentTypeRegistry::new(&Config::new("/nonexistent/ubl/xsd"));
    let descriptor = registry
        .schema_for_type(DocumentType::Invoice)
        .expect("registered");
    let document = Parser::default()
        .parse_string(common::read_fixture("invoice.xml"))
        .expect("parse invoice");

    let mut seen = Vec::new();
    let mut accept_all = |event: &ValidationEvent| {
        seen.push(event.severity);
        true
    };
    let errors = validate_document(descriptor, &document, &mut accept_all)
        .expect_err("no schema to validate against");
    assert_eq!(seen, vec![Severity::Fatal]);
    assert_eq!(errors.len(), 1);
    assert!(errors.iter().all(|e| e.message.contains("UBL-Invoice-2.0.xsd")));
}
