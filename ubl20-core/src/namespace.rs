//! UBL 2.0 namespace context.

pub const CBC_NS: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
pub const CAC_NS: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
pub const EXT_NS: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2";

/// Prefix bound to the document namespace in XPath expressions.
pub const DOCUMENT_PREFIX: &str = "ubl";

/// Namespace declarations written on the root element, keyed by attribute name.
pub(crate) const ROOT_DECLARATIONS: [(&str, &str); 2] =
    [("@xmlns:cac", CAC_NS), ("@xmlns:cbc", CBC_NS)];
