//! XPath based binding of parsed documents onto typed values.
use std::str::FromStr;

use crate::document_type::DocumentType;
use crate::namespace::{CAC_NS, CBC_NS, DOCUMENT_PREFIX, EXT_NS};
use chrono::NaiveDate;
use libxml::{tree::Document, xpath};
use thiserror::Error;

/// Errors emitted while binding XML onto a domain object.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("XPath error: {0}")]
    XPath(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Expected root element {expected}, found {found}")]
    UnexpectedRoot { expected: String, found: String },
}

/// Read access to one parsed UBL document.
///
/// Paths handed to the helpers are relative to the root element and may use
/// the `cbc`, `cac` and `ext` prefixes, e.g. `cac:InvoiceLine[2]/cbc:ID`.
/// Attributes are addressed with a trailing `/@name` step.
pub struct XmlBinder {
    ctx: xpath::Context,
    root: String,
}

impl XmlBinder {
    /// Bind `document`, requiring its root element to be `document_type`'s.
    pub fn new(document: &Document, document_type: DocumentType) -> Result<Self, BindError> {
        let (namespace, local_name) = document_type.qname();
        let root = document
            .get_root_element()
            .ok_or_else(|| BindError::MissingField("root element".to_string()))?;
        let found_ns = root.get_namespace().map(|ns| ns.get_href()).unwrap_or_default();
        let found_name = root.get_name();
        if found_ns != namespace || found_name != local_name {
            return Err(BindError::UnexpectedRoot {
                expected: format!("{{{namespace}}}{local_name}"),
                found: format!("{{{found_ns}}}{found_name}"),
            });
        }

        let ctx = xpath::Context::new(document).map_err(|e| BindError::XPath(format!("{e:?}")))?;
        for (prefix, uri) in [
            (DOCUMENT_PREFIX, namespace.as_str()),
            ("cbc", CBC_NS),
            ("cac", CAC_NS),
            ("ext", EXT_NS),
        ] {
            ctx.register_namespace(prefix, uri)
                .map_err(|e| BindError::XPath(format!("{e:?}")))?;
        }

        Ok(Self {
            ctx,
            root: format!("/{DOCUMENT_PREFIX}:{local_name}"),
        })
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.root, path)
    }

    fn contents(&self, path: &str) -> Result<Vec<String>, BindError> {
        let expr = self.absolute(path);
        let nodes = self
            .ctx
            .evaluate(&expr)
            .map_err(|e| BindError::XPath(format!("{expr}: {e:?}")))?
            .get_nodes_as_vec();
        Ok(nodes.iter().map(|node| node.get_content()).collect())
    }

    /// Number of nodes matching `path`.
    pub fn count(&self, path: &str) -> Result<usize, BindError> {
        Ok(self.contents(path)?.len())
    }

    /// Trimmed text of the first node at `path`; empty text counts as absent.
    pub fn text_optional(&self, path: &str) -> Result<Option<String>, BindError> {
        let value = match self.contents(path)?.into_iter().next() {
            Some(value) => value.trim().to_string(),
            None => return Ok(None),
        };
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    pub fn text_required(&self, path: &str) -> Result<String, BindError> {
        self.text_optional(path)?
            .ok_or_else(|| BindError::MissingField(path.to_string()))
    }

    /// Trimmed text of every node at `path`, empty ones included.
    pub fn texts(&self, path: &str) -> Result<Vec<String>, BindError> {
        Ok(self
            .contents(path)?
            .into_iter()
            .map(|v| v.trim().to_string())
            .collect())
    }

    pub fn attribute_optional(&self, path: &str, name: &str) -> Result<Option<String>, BindError> {
        self.text_optional(&format!("{path}/@{name}"))
    }

    pub fn parse_optional<T: FromStr>(&self, path: &str) -> Result<Option<T>, BindError> {
        self.text_optional(path)?
            .map(|value| {
                value.parse::<T>().map_err(|_| BindError::InvalidValue {
                    field: path.to_string(),
                    value,
                })
            })
            .transpose()
    }

    pub fn parse_required<T: FromStr>(&self, path: &str) -> Result<T, BindError> {
        self.parse_optional(path)?
            .ok_or_else(|| BindError::MissingField(path.to_string()))
    }

    pub fn date_optional(&self, path: &str) -> Result<Option<NaiveDate>, BindError> {
        self.text_optional(path)?
            .map(|value| {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|e| {
                    BindError::InvalidValue {
                        field: path.to_string(),
                        value: format!("{value} ({e:?})"),
                    }
                })
            })
            .transpose()
    }

    pub fn date_required(&self, path: &str) -> Result<NaiveDate, BindError> {
        self.date_optional(path)?
            .ok_or_else(|| BindError::MissingField(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libxml::parser::Parser;

    const ORDER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Order xmlns="urn:oasis:names:specification:ubl:schema:xsd:Order-2"
       xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2"
       xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2">
  <cbc:ID> PO-77 </cbc:ID>
  <cbc:IssueDate>2015-03-09</cbc:IssueDate>
  <cbc:Note>first</cbc:Note>
  <cbc:Note></cbc:Note>
  <cbc:Note>third</cbc:Note>
  <cac:OrderLine><cac:LineItem><cbc:ID>1</cbc:ID><cbc:Quantity unitCode="EA">4</cbc:Quantity></cac:LineItem></cac:OrderLine>
  <cac:OrderLine><cac:LineItem><cbc:ID>2</cbc:ID><cbc:Quantity>x</cbc:Quantity></cac:LineItem></cac:OrderLine>
</Order>"#;

    fn binder(xml: &str, ty: DocumentType) -> Result<XmlBinder, BindError> {
        // The XPath context only holds a weak reference to the document, so
        // keep it alive for the rest of the test.
        let doc: &'static Document =
            Box::leak(Box::new(Parser::default().parse_string(xml).expect("parse")));
        XmlBinder::new(doc, ty)
    }

    #[test]
    fn reads_text_attributes_and_counts() {
        let b = binder(ORDER, DocumentType::Order).unwrap();
        assert_eq!(b.text_required("cbc:ID").unwrap(), "PO-77");
        assert_eq!(
            b.date_required("cbc:IssueDate").unwrap(),
            NaiveDate::from_ymd_opt(2015, 3, 9).unwrap()
        );
        assert_eq!(b.texts("cbc:Note").unwrap(), vec!["first", "", "third"]);
        assert_eq!(b.count("cac:OrderLine").unwrap(), 2);
        assert_eq!(
            b.attribute_optional("cac:OrderLine[1]/cac:LineItem/cbc:Quantity", "unitCode")
                .unwrap()
                .as_deref(),
            Some("EA")
        );
        assert_eq!(
            b.parse_required::<f64>("cac:OrderLine[1]/cac:LineItem/cbc:Quantity")
                .unwrap(),
            4.0
        );
    }

    #[test]
    fn reports_missing_and_invalid_values() {
        let b = binder(ORDER, DocumentType::Order).unwrap();
        assert!(matches!(
            b.text_required("cbc:UUID"),
            Err(BindError::MissingField(_))
        ));
        assert!(matches!(
            b.parse_required::<f64>("cac:OrderLine[2]/cac:LineItem/cbc:Quantity"),
            Err(BindError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_other_root_elements() {
        assert!(matches!(
            binder(ORDER, DocumentType::Invoice),
            Err(BindError::UnexpectedRoot { .. })
        ));
    }
}
