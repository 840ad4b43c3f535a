//! Reading, writing and validating typed UBL documents.
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::binding::{BindError, XmlBinder};
use crate::config::{Config, XmlFormat};
use crate::document_type::DocumentType;
use crate::model::UblDocument;
use crate::registry::{DocumentTypeRegistry, SchemaDescriptor, SchemaError};
use crate::validation::{
    self, dispatch, root_namespace, schema_events, CollectingValidationEventHandler,
    LoggingValidationEventHandler, ValidationErrors, ValidationEvent, ValidationEventHandler,
};
use crate::xml::to_xml_with_format;
use libxml::{parser::Parser, tree::Document};
use quick_xml::se::SeError;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Failures of the marshaller.
///
/// `NamespaceMismatch`, `UnknownNamespace`, `UnregisteredType` and
/// `TypeMismatch` are caller errors detected before any parsing, validation
/// or serialization takes place.
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("cannot read a document in namespace '{namespace}' as {requested}")]
    NamespaceMismatch {
        namespace: String,
        requested: DocumentType,
    },
    #[error("no UBL 2.0 document type registered for namespace '{0}'")]
    UnknownNamespace(String),
    #[error("document type {0} is not registered")]
    UnregisteredType(DocumentType),
    #[error("cannot write a {actual} as a {declared}")]
    TypeMismatch {
        actual: DocumentType,
        declared: DocumentType,
    },
    #[error("XML parse error: {0}")]
    XmlParse(String),
    #[error("document rejected by schema validation:\n{0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("failed to serialize document to XML: {source}")]
    Serialize {
        #[from]
        source: SeError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MarshalError {
    /// True for failures caused by asking for the wrong type or namespace.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            MarshalError::NamespaceMismatch { .. }
                | MarshalError::UnknownNamespace(_)
                | MarshalError::UnregisteredType(_)
                | MarshalError::TypeMismatch { .. }
        )
    }
}

fn log_failure(operation: &str, document_type: DocumentType, err: &MarshalError) {
    if err.is_misuse() {
        warn!(%document_type, "{operation} refused: {err}");
    } else {
        error!(%document_type, "{operation} failed: {err}");
    }
}

/// Converts between XML and [`UblDocument`] values, validating against the
/// registered schemas on the way in and on the way out.
///
/// The marshaller holds no mutable state; one instance can serve any number
/// of calls. Every optional `handler` argument defaults to
/// [`LoggingValidationEventHandler`], which rejects the document on the first
/// schema error.
///
/// # Examples
/// ```rust,no_run
/// use ubl20_core::config::Config;
/// use ubl20_core::marshal::UblMarshaller;
/// use ubl20_core::model::Invoice;
///
/// let marshaller = UblMarshaller::from_config(&Config::new("assets/schemas/UBL2.0/xsd"));
/// let invoice: Invoice = marshaller.read_file(std::path::Path::new("invoice.xml"), None)?;
/// let xml = marshaller.write_to_string(&invoice, ubl20_core::DocumentType::Invoice, None)?;
/// # let _ = xml;
/// # Ok::<(), ubl20_core::marshal::MarshalError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UblMarshaller {
    registry: Arc<DocumentTypeRegistry>,
    format: XmlFormat,
}

impl UblMarshaller {
    pub fn new(registry: Arc<DocumentTypeRegistry>, config: &Config) -> Self {
        Self {
            registry,
            format: config.format(),
        }
    }

    /// Build a marshaller over a registry of every UBL 2.0 document type.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(DocumentTypeRegistry::new(config)), config)
    }

    pub fn registry(&self) -> &DocumentTypeRegistry {
        &self.registry
    }

    // ---- reading ----

    /// Bind an already parsed document.
    ///
    /// The document type is taken from the root element's namespace and must
    /// be `T`'s; otherwise the call fails before validation is attempted.
    pub fn read_document<T: UblDocument>(
        &self,
        document: &Document,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        self.read_document_inner(document, handler)
            .inspect_err(|e| log_failure("read", T::DOCUMENT_TYPE, e))
    }

    fn read_document_inner<T: UblDocument>(
        &self,
        document: &Document,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        let namespace = root_namespace(document).unwrap_or_default();
        let descriptor = self
            .registry
            .schema_for_namespace(&namespace)
            .ok_or_else(|| MarshalError::UnknownNamespace(namespace.clone()))?;
        if descriptor.document_type() != T::DOCUMENT_TYPE {
            return Err(MarshalError::NamespaceMismatch {
                namespace,
                requested: T::DOCUMENT_TYPE,
            });
        }
        self.validate_and_bind(descriptor, document, handler)
    }

    /// Parse and bind an XML string as `T`.
    ///
    /// Without a node to inspect up front, the schema is chosen from `T`; a
    /// document of another type fails schema validation or binding. The text
    /// is handed to the parser as UTF-8; use [`Self::read_bytes`] for input
    /// in another encoding.
    pub fn read_str<T: UblDocument>(
        &self,
        xml: &str,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        self.read_bytes(xml.as_bytes(), handler)
    }

    /// Parse and bind raw XML as `T`; the XML declaration decides the encoding.
    pub fn read_bytes<T: UblDocument>(
        &self,
        xml: &[u8],
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        self.read_bytes_inner(xml, handler)
            .inspect_err(|e| log_failure("read", T::DOCUMENT_TYPE, e))
    }

    fn read_bytes_inner<T: UblDocument>(
        &self,
        xml: &[u8],
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        let descriptor = self
            .registry
            .schema_for::<T>()
            .ok_or(MarshalError::UnregisteredType(T::DOCUMENT_TYPE))?;
        let document = parse_xml(xml)?;
        self.validate_and_bind(descriptor, &document, handler)
    }

    pub fn read_file<T: UblDocument>(
        &self,
        path: &Path,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        let xml = std::fs::read(path)
            .map_err(MarshalError::from)
            .inspect_err(|e| log_failure("read", T::DOCUMENT_TYPE, e))?;
        self.read_bytes(&xml, handler)
    }

    pub fn read_reader<T: UblDocument, R: Read>(
        &self,
        mut reader: R,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        let mut xml = Vec::new();
        reader
            .read_to_end(&mut xml)
            .map_err(MarshalError::from)
            .inspect_err(|e| log_failure("read", T::DOCUMENT_TYPE, e))?;
        self.read_bytes(&xml, handler)
    }

    fn validate_and_bind<T: UblDocument>(
        &self,
        descriptor: &SchemaDescriptor,
        document: &Document,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<T, MarshalError> {
        let mut default_handler = LoggingValidationEventHandler;
        let handler = handler.unwrap_or(&mut default_handler);

        let mut ctx = descriptor.compile()?;
        dispatch(schema_events(&mut ctx, document), handler).map_err(MarshalError::Validation)?;

        let binder = XmlBinder::new(document, descriptor.document_type())?;
        let value = T::bind(&binder)?;
        debug!(document_type = %descriptor.document_type(), "read UBL document");
        Ok(value)
    }

    // ---- writing ----

    /// Serialize `document` as `document_type` and return the XML text.
    pub fn write_to_string<T: UblDocument>(
        &self,
        document: &T,
        document_type: DocumentType,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<String, MarshalError> {
        self.serialize_validated(document, document_type, handler)
            .map(|(xml, _)| xml)
            .inspect_err(|e| log_failure("write", document_type, e))
    }

    /// Serialize `document` as `document_type` into a DOM document.
    pub fn write_document<T: UblDocument>(
        &self,
        document: &T,
        document_type: DocumentType,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<Document, MarshalError> {
        self.serialize_validated(document, document_type, handler)
            .map(|(_, dom)| dom)
            .inspect_err(|e| log_failure("write", document_type, e))
    }

    /// Serialize `document` as `document_type` into `sink`.
    ///
    /// Nothing is written to `sink` unless serialization and validation
    /// both succeed.
    pub fn write<T: UblDocument, W: Write>(
        &self,
        document: &T,
        document_type: DocumentType,
        handler: Option<&mut dyn ValidationEventHandler>,
        mut sink: W,
    ) -> Result<(), MarshalError> {
        self.serialize_validated(document, document_type, handler)
            .and_then(|(xml, _)| {
                sink.write_all(xml.as_bytes())?;
                sink.flush()?;
                Ok(())
            })
            .inspect_err(|e| log_failure("write", document_type, e))
    }

    fn serialize_validated<T: UblDocument>(
        &self,
        document: &T,
        document_type: DocumentType,
        handler: Option<&mut dyn ValidationEventHandler>,
    ) -> Result<(String, Document), MarshalError> {
        let descriptor = self.checked_descriptor::<T>(document_type)?;
        let mut default_handler = LoggingValidationEventHandler;
        let handler = handler.unwrap_or(&mut default_handler);

        let mut ctx = descriptor.compile()?;
        let xml = to_xml_with_format(document, document_type, self.format)?;
        let dom = parse_xml(&xml)?;
        dispatch(schema_events(&mut ctx, &dom), handler).map_err(MarshalError::Validation)?;

        debug!(%document_type, bytes = xml.len(), "wrote UBL document");
        Ok((xml, dom))
    }

    fn checked_descriptor<T: UblDocument>(
        &self,
        document_type: DocumentType,
    ) -> Result<&SchemaDescriptor, MarshalError> {
        if T::DOCUMENT_TYPE != document_type {
            return Err(MarshalError::TypeMismatch {
                actual: T::DOCUMENT_TYPE,
                declared: document_type,
            });
        }
        self.registry
            .schema_for_type(document_type)
            .ok_or(MarshalError::UnregisteredType(document_type))
    }

    // ---- validation ----

    /// Check `document` against the schema of `document_type` without
    /// producing output.
    ///
    /// Returns every schema event; an empty collection means the document is
    /// valid. A document that cannot be serialized at all yields a single
    /// fatal event.
    pub fn validate<T: UblDocument>(
        &self,
        document: &T,
        document_type: DocumentType,
    ) -> Result<ValidationErrors, MarshalError> {
        self.validate_inner(document, document_type)
            .inspect_err(|e| log_failure("validate", document_type, e))
    }

    fn validate_inner<T: UblDocument>(
        &self,
        document: &T,
        document_type: DocumentType,
    ) -> Result<ValidationErrors, MarshalError> {
        let descriptor = self.checked_descriptor::<T>(document_type)?;
        let mut ctx = descriptor.compile()?;

        let dom = match to_xml_with_format(document, document_type, XmlFormat::Compact)
            .map_err(MarshalError::from)
            .and_then(|xml| parse_xml(&xml))
        {
            Ok(dom) => dom,
            Err(err) => return Ok(ValidationErrors::single(ValidationEvent::fatal(err.to_string()))),
        };

        let mut collector = CollectingValidationEventHandler::new();
        if let Err(errors) = dispatch(schema_events(&mut ctx, &dom), &mut collector) {
            return Ok(errors);
        }
        let errors = collector.into_errors();
        debug!(%document_type, events = errors.len(), "validated UBL document");
        Ok(errors)
    }

    /// Validate raw XML against the schema registered for its root namespace.
    pub fn validate_xml_str(&self, xml: &str) -> ValidationErrors {
        validation::validate_xml_str(&self.registry, xml)
    }

    pub fn validate_xml_file(&self, path: &Path) -> ValidationErrors {
        validation::validate_xml_file(&self.registry, path)
    }

    /// Document type of raw XML, judged by its root namespace only.
    pub fn detect_document_type(
        &self,
        xml: impl AsRef<[u8]>,
    ) -> Result<DocumentType, MarshalError> {
        let document = parse_xml(xml)?;
        let namespace = root_namespace(&document).unwrap_or_default();
        self.registry
            .document_type_for_namespace(&namespace)
            .ok_or(MarshalError::UnknownNamespace(namespace))
    }
}

fn parse_xml(xml: impl AsRef<[u8]>) -> Result<Document, MarshalError> {
    Parser::default()
        .parse_string(xml)
        .map_err(|e| MarshalError::XmlParse(format!("{e:?}")))
}
