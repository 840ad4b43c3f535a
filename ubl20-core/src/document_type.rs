//! The closed set of UBL 2.0 document types.
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NAMESPACE_PREFIX: &str = "urn:oasis:names:specification:ubl:schema:xsd:";
const NAMESPACE_SUFFIX: &str = "-2";

/// A UBL 2.0 document type, identified by its root element.
///
/// Every document type owns exactly one namespace URI
/// (`urn:oasis:names:specification:ubl:schema:xsd:<Name>-2`) and one main
/// schema file (`UBL-<Name>-2.0.xsd`).
///
/// # Examples
/// ```rust
/// use ubl20_core::document_type::DocumentType;
///
/// let ty = DocumentType::from_namespace(
///     "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2",
/// );
/// assert_eq!(ty, Some(DocumentType::Invoice));
/// assert_eq!(DocumentType::Invoice.schema_file(), "UBL-Invoice-2.0.xsd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    ApplicationResponse,
    AttachedDocument,
    BillOfLading,
    Catalogue,
    CatalogueDeletion,
    CatalogueItemSpecificationUpdate,
    CataloguePricingUpdate,
    CatalogueRequest,
    CertificateOfOrigin,
    CreditNote,
    DebitNote,
    DespatchAdvice,
    ForwardingInstructions,
    FreightInvoice,
    Invoice,
    Order,
    OrderCancellation,
    OrderChange,
    OrderResponse,
    OrderResponseSimple,
    PackingList,
    Quotation,
    ReceiptAdvice,
    Reminder,
    RemittanceAdvice,
    RequestForQuotation,
    SelfBilledCreditNote,
    SelfBilledInvoice,
    Statement,
    TransportationStatus,
    Waybill,
}

/// Error returned when parsing a [`DocumentType`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentTypeParseError {
    #[error("unknown UBL 2.0 document type: {input}")]
    Unknown { input: String },
}

impl DocumentType {
    pub const ALL: [DocumentType; 31] = [
        DocumentType::ApplicationResponse,
        DocumentType::AttachedDocument,
        DocumentType::BillOfLading,
        DocumentType::Catalogue,
        DocumentType::CatalogueDeletion,
        DocumentType::CatalogueItemSpecificationUpdate,
        DocumentType::CataloguePricingUpdate,
        DocumentType::CatalogueRequest,
        DocumentType::CertificateOfOrigin,
        DocumentType::CreditNote,
        DocumentType::DebitNote,
        DocumentType::DespatchAdvice,
        DocumentType::ForwardingInstructions,
        DocumentType::FreightInvoice,
        DocumentType::Invoice,
        DocumentType::Order,
        DocumentType::OrderCancellation,
        DocumentType::OrderChange,
        DocumentType::OrderResponse,
        DocumentType::OrderResponseSimple,
        DocumentType::PackingList,
        DocumentType::Quotation,
        DocumentType::ReceiptAdvice,
        DocumentType::Reminder,
        DocumentType::RemittanceAdvice,
        DocumentType::RequestForQuotation,
        DocumentType::SelfBilledCreditNote,
        DocumentType::SelfBilledInvoice,
        DocumentType::Statement,
        DocumentType::TransportationStatus,
        DocumentType::Waybill,
    ];

    /// Local name of the root element.
    pub fn local_name(&self) -> &'static str {
        match self {
            DocumentType::ApplicationResponse => "ApplicationResponse",
            DocumentType::AttachedDocument => "AttachedDocument",
            DocumentType::BillOfLading => "BillOfLading",
            DocumentType::Catalogue => "Catalogue",
            DocumentType::CatalogueDeletion => "CatalogueDeletion",
            DocumentType::CatalogueItemSpecificationUpdate => "CatalogueItemSpecificationUpdate",
            DocumentType::CataloguePricingUpdate => "CataloguePricingUpdate",
            DocumentType::CatalogueRequest => "CatalogueRequest",
            DocumentType::CertificateOfOrigin => "CertificateOfOrigin",
            DocumentType::CreditNote => "CreditNote",
            DocumentType::DebitNote => "DebitNote",
            DocumentType::DespatchAdvice => "DespatchAdvice",
            DocumentType::ForwardingInstructions => "ForwardingInstructions",
            DocumentType::FreightInvoice => "FreightInvoice",
            DocumentType::Invoice => "Invoice",
            DocumentType::Order => "Order",
            DocumentType::OrderCancellation => "OrderCancellation",
            DocumentType::OrderChange => "OrderChange",
            DocumentType::OrderResponse => "OrderResponse",
            DocumentType::OrderResponseSimple => "OrderResponseSimple",
            DocumentType::PackingList => "PackingList",
            DocumentType::Quotation => "Quotation",
            DocumentType::ReceiptAdvice => "ReceiptAdvice",
            DocumentType::Reminder => "Reminder",
            DocumentType::RemittanceAdvice => "RemittanceAdvice",
            DocumentType::RequestForQuotation => "RequestForQuotation",
            DocumentType::SelfBilledCreditNote => "SelfBilledCreditNote",
            DocumentType::SelfBilledInvoice => "SelfBilledInvoice",
            DocumentType::Statement => "Statement",
            DocumentType::TransportationStatus => "TransportationStatus",
            DocumentType::Waybill => "Waybill",
        }
    }

    /// Namespace URI of the root element.
    pub fn namespace_uri(&self) -> String {
        format!("{NAMESPACE_PREFIX}{}{NAMESPACE_SUFFIX}", self.local_name())
    }

    /// Qualified name of the root element as `(namespace, local name)`.
    pub fn qname(&self) -> (String, &'static str) {
        (self.namespace_uri(), self.local_name())
    }

    /// File name of the main schema, relative to the `maindoc` directory.
    pub fn schema_file(&self) -> String {
        format!("UBL-{}-2.0.xsd", self.local_name())
    }

    pub fn from_namespace(namespace_uri: &str) -> Option<DocumentType> {
        let name = namespace_uri
            .strip_prefix(NAMESPACE_PREFIX)?
            .strip_suffix(NAMESPACE_SUFFIX)?;
        DocumentType::ALL
            .into_iter()
            .find(|ty| ty.local_name() == name)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

impl FromStr for DocumentType {
    type Err = DocumentTypeParseError;

    fn from_str(input: &str) -> Result<DocumentType, DocumentTypeParseError> {
        let wanted = input.trim();
        DocumentType::ALL
            .into_iter()
            .find(|ty| ty.local_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DocumentTypeParseError::Unknown {
                input: input.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_round_trips_for_every_type() {
        for ty in DocumentType::ALL {
            assert_eq!(DocumentType::from_namespace(&ty.namespace_uri()), Some(ty));
        }
    }

    #[test]
    fn rejects_foreign_namespaces() {
        assert_eq!(
            DocumentType::from_namespace(
                "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2"
            ),
            None
        );
        assert_eq!(
            DocumentType::from_namespace("urn:oasis:names:specification:ubl:schema:xsd:Invoice-1"),
            None
        );
        assert_eq!(DocumentType::from_namespace(""), None);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("creditnote".parse(), Ok(DocumentType::CreditNote));
        assert_eq!(" Order ".parse(), Ok(DocumentType::Order));
        assert!(matches!(
            "Receipt".parse::<DocumentType>(),
            Err(DocumentTypeParseError::Unknown { .. })
        ));
    }

    #[test]
    fn qname_uses_document_namespace() {
        let (ns, local) = DocumentType::Waybill.qname();
        assert_eq!(ns, "urn:oasis:names:specification:ubl:schema:xsd:Waybill-2");
        assert_eq!(local, "Waybill");
    }
}
