use super::common::{party_role, MonetaryTotal, OrderLine, Party};
use super::{header, UblDocument};
use crate::binding::{BindError, XmlBinder};
use crate::document_type::DocumentType;
use chrono::NaiveDate;
use iso_currency::Currency;
use serde::ser::SerializeStruct;

/// UBL 2.0 `Order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub ubl_version_id: Option<String>,
    pub customization_id: Option<String>,
    pub profile_id: Option<String>,
    pub id: String,
    pub sales_order_id: Option<String>,
    pub uuid: Option<String>,
    pub issue_date: NaiveDate,
    pub notes: Vec<String>,
    pub document_currency_code: Option<Currency>,
    pub buyer_customer_party: Party,
    pub seller_supplier_party: Party,
    pub anticipated_monetary_total: Option<MonetaryTotal>,
    pub order_lines: Vec<OrderLine>,
}

impl UblDocument for Order {
    const DOCUMENT_TYPE: DocumentType = DocumentType::Order;

    fn bind(b: &XmlBinder) -> Result<Self, BindError> {
        Ok(Self {
            ubl_version_id: b.text_optional("cbc:UBLVersionID")?,
            customization_id: b.text_optional("cbc:CustomizationID")?,
            profile_id: b.text_optional("cbc:ProfileID")?,
            id: b.text_required("cbc:ID")?,
            sales_order_id: b.text_optional("cbc:SalesOrderID")?,
            uuid: b.text_optional("cbc:UUID")?,
            issue_date: b.date_required("cbc:IssueDate")?,
            notes: b.texts("cbc:Note")?,
            document_currency_code: header::currency_optional(b, "cbc:DocumentCurrencyCode")?,
            buyer_customer_party: Party::bind_at(b, "cac:BuyerCustomerParty/cac:Party")?,
            seller_supplier_party: Party::bind_at(b, "cac:SellerSupplierParty/cac:Party")?,
            anticipated_monetary_total: MonetaryTotal::bind_optional(
                b,
                "cac:AnticipatedMonetaryTotal",
            )?,
            order_lines: OrderLine::bind_all(b)?,
        })
    }

    fn serialize_body<S: SerializeStruct>(&self, root: &mut S) -> Result<(), S::Error> {
        if let Some(version) = &self.ubl_version_id {
            root.serialize_field("cbc:UBLVersionID", version)?;
        }
        if let Some(customization) = &self.customization_id {
            root.serialize_field("cbc:CustomizationID", customization)?;
        }
        if let Some(profile) = &self.profile_id {
            root.serialize_field("cbc:ProfileID", profile)?;
        }
        root.serialize_field("cbc:ID", &self.id)?;
        if let Some(sales_order_id) = &self.sales_order_id {
            root.serialize_field("cbc:SalesOrderID", sales_order_id)?;
        }
        if let Some(uuid) = &self.uuid {
            root.serialize_field("cbc:UUID", uuid)?;
        }
        root.serialize_field("cbc:IssueDate", &self.issue_date.to_string())?;
        for note in &self.notes {
            root.serialize_field("cbc:Note", note)?;
        }
        if let Some(currency) = &self.document_currency_code {
            root.serialize_field("cbc:DocumentCurrencyCode", currency.code())?;
        }
        root.serialize_field(
            "cac:BuyerCustomerParty",
            &party_role(&self.buyer_customer_party),
        )?;
        root.serialize_field(
            "cac:SellerSupplierParty",
            &party_role(&self.seller_supplier_party),
        )?;
        if let Some(total) = &self.anticipated_monetary_total {
            root.serialize_field("cac:AnticipatedMonetaryTotal", total)?;
        }
        for line in &self.order_lines {
            root.serialize_field("cac:OrderLine", line)?;
        }
        Ok(())
    }
}
