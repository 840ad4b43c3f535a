//! XML Schema validation and validation events.
use std::fmt;
use std::path::Path;

use crate::registry::{DocumentTypeRegistry, SchemaDescriptor};
use libxml::{
    error::{StructuredError, XmlErrorLevel},
    parser::Parser,
    schemas::SchemaValidationContext,
    tree::Document,
};
use tracing::{debug, error, warn};

/// Severity of a validation event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        })
    }
}

/// One diagnostic raised while validating or binding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ValidationEvent {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }
}

impl From<StructuredError> for ValidationEvent {
    fn from(err: StructuredError) -> Self {
        let severity = match err.level {
            XmlErrorLevel::Warning => Severity::Warning,
            XmlErrorLevel::Fatal => Severity::Fatal,
            _ => Severity::Error,
        };
        let message = err
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("libxml error {} in domain {}", err.code, err.domain));
        Self {
            severity,
            message,
            file: err.filename,
            line: err.line.and_then(|l| u32::try_from(l).ok()),
            column: err.col.and_then(|c| u32::try_from(c).ok()).filter(|c| *c > 0),
        }
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.severity)?;
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " {line}:{column}")?,
            (Some(line), None) => write!(f, " line {line}")?,
            _ => {}
        }
        write!(f, " {}", self.message)
    }
}

/// Ordered collection of validation events. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    events: Vec<ValidationEvent>,
}

impl ValidationErrors {
    pub fn new(events: Vec<ValidationEvent>) -> Self {
        Self { events }
    }

    pub fn single(event: ValidationEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if any event is an error or fatal error.
    pub fn has_errors(&self) -> bool {
        self.events.iter().any(|e| e.severity >= Severity::Error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationEvent> {
        self.events.iter()
    }

    pub fn push(&mut self, event: ValidationEvent) {
        self.events.push(event);
    }

    pub fn into_vec(self) -> Vec<ValidationEvent> {
        self.events
    }
}

impl From<Vec<StructuredError>> for ValidationErrors {
    fn from(errors: Vec<StructuredError>) -> Self {
        Self::new(errors.into_iter().map(ValidationEvent::from).collect())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationEvent;
    type IntoIter = std::vec::IntoIter<ValidationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationEvent;
    type IntoIter = std::slice::Iter<'a, ValidationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}

/// Receives validation events while a document is checked against its schema.
///
/// Returning `false` aborts the current read or write; the caller then gets
/// a validation failure carrying all events of the run.
pub trait ValidationEventHandler {
    fn handle_event(&mut self, event: &ValidationEvent) -> bool;
}

impl<F> ValidationEventHandler for F
where
    F: FnMut(&ValidationEvent) -> bool,
{
    fn handle_event(&mut self, event: &ValidationEvent) -> bool {
        self(event)
    }
}

/// Logs every event and continues only past warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingValidationEventHandler;

impl ValidationEventHandler for LoggingValidationEventHandler {
    fn handle_event(&mut self, event: &ValidationEvent) -> bool {
        match event.severity {
            Severity::Warning => {
                warn!(line = ?event.line, column = ?event.column, "{}", event.message);
                true
            }
            Severity::Error | Severity::Fatal => {
                error!(
                    severity = %event.severity,
                    line = ?event.line,
                    column = ?event.column,
                    "{}",
                    event.message
                );
                false
            }
        }
    }
}

/// Keeps every event and never aborts.
#[derive(Debug, Clone, Default)]
pub struct CollectingValidationEventHandler {
    errors: ValidationErrors,
}

impl CollectingValidationEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

impl ValidationEventHandler for CollectingValidationEventHandler {
    fn handle_event(&mut self, event: &ValidationEvent) -> bool {
        self.errors.push(event.clone());
        true
    }
}

/// Raw schema events for `document`, without consulting any handler.
pub(crate) fn schema_events(
    ctx: &mut SchemaValidationContext,
    document: &Document,
) -> ValidationErrors {
    match ctx.validate_document(document) {
        Ok(()) => ValidationErrors::default(),
        Err(errors) => errors.into(),
    }
}

/// Feed `events` to `handler` until it asks to stop.
pub(crate) fn dispatch(
    events: ValidationErrors,
    handler: &mut dyn ValidationEventHandler,
) -> Result<(), ValidationErrors> {
    for event in events.iter() {
        if !handler.handle_event(event) {
            return Err(events);
        }
    }
    Ok(())
}

/// Validate `document` against the schema of `descriptor`, feeding every
/// event to `handler`.
///
/// Fails with all events of the run once the handler rejects one. A schema
/// that cannot be loaded is reported to the handler as a single fatal event
/// and always fails, whatever the handler answers.
pub fn validate_document(
    descriptor: &SchemaDescriptor,
    document: &Document,
    handler: &mut dyn ValidationEventHandler,
) -> Result<(), ValidationErrors> {
    let mut ctx = match descriptor.compile() {
        Ok(ctx) => ctx,
        Err(err) => {
            let event = ValidationEvent::from(err);
            // nothing to validate against, so the answer is ignored
            let _ = handler.handle_event(&event);
            return Err(ValidationErrors::single(event));
        }
    };
    dispatch(schema_events(&mut ctx, document), handler)
}

/// Validate an XML string against the schema registered for its root namespace.
///
/// Never fails: unparsable input, unknown namespaces and unloadable schemas
/// are reported as fatal events.
pub fn validate_xml_str(registry: &DocumentTypeRegistry, xml: &str) -> ValidationErrors {
    let document = match Parser::default().parse_string(xml) {
        Ok(document) => document,
        Err(e) => {
            return ValidationErrors::single(ValidationEvent::fatal(format!(
                "Failed to parse XML: {e:?}"
            )));
        }
    };
    validate_parsed(registry, &document)
}

/// Validate an XML file against the schema registered for its root namespace.
pub fn validate_xml_file(registry: &DocumentTypeRegistry, path: &Path) -> ValidationErrors {
    // libxml only reports a null pointer for missing files
    if !path.exists() {
        return ValidationErrors::single(ValidationEvent::fatal(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let Some(xml_path) = path.to_str() else {
        return ValidationErrors::single(ValidationEvent::fatal("Invalid XML path"));
    };
    let document = match Parser::default().parse_file(xml_path) {
        Ok(document) => document,
        Err(e) => {
            return ValidationErrors::single(ValidationEvent::fatal(format!(
                "Failed to parse {}: {e:?}",
                path.display()
            )));
        }
    };
    validate_parsed(registry, &document)
}

fn validate_parsed(registry: &DocumentTypeRegistry, document: &Document) -> ValidationErrors {
    let Some(namespace) = root_namespace(document) else {
        return ValidationErrors::single(ValidationEvent::fatal(
            "Document has no namespaced root element",
        ));
    };
    let Some(descriptor) = registry.schema_for_namespace(&namespace) else {
        return ValidationErrors::single(ValidationEvent::fatal(format!(
            "No UBL 2.0 schema registered for namespace '{namespace}'"
        )));
    };
    let mut collector = CollectingValidationEventHandler::new();
    let errors = match validate_document(descriptor, document, &mut collector) {
        Ok(()) => collector.into_errors(),
        Err(errors) => errors,
    };
    debug!(
        document_type = %descriptor.document_type(),
        events = errors.len(),
        "validated XML document"
    );
    errors
}

/// Namespace URI of the root element, if it has one.
pub(crate) fn root_namespace(document: &Document) -> Option<String> {
    document
        .get_root_element()?
        .get_namespace()
        .map(|ns| ns.get_href())
}
