//! Typed UBL 2.0 documents.
//!
//! Only a slice of the UBL object model is provided here: the common
//! aggregates used by invoices, credit notes and orders. Other document types
//! can be bound by implementing [`UblDocument`] for a caller-defined type.
mod common;
mod credit_note;
mod invoice;
mod order;

pub use common::{
    Address, Amount, Identifier, InvoiceLine, Item, MonetaryTotal, OrderLine, Party,
    PartyTaxScheme, Percent, Price, Quantity, TaxCategory, TaxScheme, TaxSubtotal, TaxTotal,
};
pub use credit_note::CreditNote;
pub use invoice::Invoice;
pub use order::Order;

use crate::binding::{BindError, XmlBinder};
use crate::document_type::DocumentType;
use serde::ser::SerializeStruct;

/// A Rust type bound to the root element of one UBL document type.
///
/// `bind` reads the value from a parsed document, `serialize_body` writes
/// every child of the root element in schema order. The root element itself
/// and its namespace declarations are written by the caller.
pub trait UblDocument: Sized {
    const DOCUMENT_TYPE: DocumentType;

    fn bind(binder: &XmlBinder) -> Result<Self, BindError>;

    fn serialize_body<S: SerializeStruct>(&self, root: &mut S) -> Result<(), S::Error>;
}

/// Header fields shared by the provided documents.
pub(crate) mod header {
    use crate::binding::{BindError, XmlBinder};
    use iso_currency::Currency;

    pub(crate) fn currency_optional(
        binder: &XmlBinder,
        path: &str,
    ) -> Result<Option<Currency>, BindError> {
        binder
            .text_optional(path)?
            .map(|code| {
                Currency::from_code(&code).ok_or(BindError::InvalidValue {
                    field: path.to_string(),
                    value: code,
                })
            })
            .transpose()
    }
}
