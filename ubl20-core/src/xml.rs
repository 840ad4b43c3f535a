//! XML serialization for UBL documents.
use crate::config::XmlFormat;
use crate::document_type::DocumentType;
use crate::model::UblDocument;
use crate::namespace::ROOT_DECLARATIONS;

use quick_xml::se::{SeError, Serializer as QuickXmlSerializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt::{self, Display, Formatter};

/// Decimal rendered with a fixed number of fraction digits.
pub(crate) struct FixedPrecision {
    value: f64,
    precision: usize,
}

impl FixedPrecision {
    pub(crate) fn new(value: f64, precision: usize) -> Self {
        Self { value, precision }
    }
}

impl Display for FixedPrecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.precision, self.value)
    }
}

impl Serialize for FixedPrecision {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A text element carrying one optional attribute, e.g. `<cbc:ID schemeID="GLN">`.
pub(crate) struct TextWithAttribute<'a> {
    pub(crate) attribute: &'static str,
    pub(crate) attribute_value: Option<&'a str>,
    pub(crate) text: &'a str,
}

impl<'a> Serialize for TextWithAttribute<'a> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("TextWithAttribute", 2)?;
        if let Some(value) = self.attribute_value {
            st.serialize_field(self.attribute, value)?;
        }
        st.serialize_field("$text", self.text)?;
        st.end()
    }
}

/// Root element wrapper: declares the UBL namespaces, then writes the body.
pub struct DocumentXml<'a, T: UblDocument> {
    document: &'a T,
    document_type: DocumentType,
}

impl<'a, T: UblDocument> DocumentXml<'a, T> {
    pub fn new(document: &'a T, document_type: DocumentType) -> Self {
        Self {
            document,
            document_type,
        }
    }
}

impl<'a, T: UblDocument> Serialize for DocumentXml<'a, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut root = serializer.serialize_struct(self.document_type.local_name(), 0)?;

        // ---- namespaces (attributes) ----
        root.serialize_field("@xmlns", &self.document_type.namespace_uri())?;
        for (attribute, uri) in ROOT_DECLARATIONS {
            root.serialize_field(attribute, uri)?;
        }

        self.document.serialize_body(&mut root)?;
        root.end()
    }
}

/// Serialize `document` with `document_type`'s root element.
pub fn to_xml_with_format<T: UblDocument>(
    document: &T,
    document_type: DocumentType,
    format: XmlFormat,
) -> Result<String, SeError> {
    let mut buffer = String::with_capacity(4096);
    buffer.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    buffer.push('\n');

    {
        let mut serializer = QuickXmlSerializer::new(&mut buffer);
        if let XmlFormat::Pretty {
            indent_char,
            indent_size,
        } = format
        {
            serializer.indent(indent_char, indent_size);
        }
        DocumentXml::new(document, document_type).serialize(serializer)?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_precision_pads_fraction() {
        assert_eq!(FixedPrecision::new(100.0, 2).to_string(), "100.00");
        assert_eq!(FixedPrecision::new(0.129, 2).to_string(), "0.13");
        assert_eq!(FixedPrecision::new(7.4, 0).to_string(), "7");
    }
}
