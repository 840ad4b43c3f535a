use super::common::{party_role, InvoiceLine, MonetaryTotal, Party, TaxTotal};
use super::{header, UblDocument};
use crate::binding::{BindError, XmlBinder};
use crate::document_type::DocumentType;
use chrono::NaiveDate;
use iso_currency::Currency;
use serde::ser::{Serialize, SerializeStruct, Serializer};

const QUANTITY_TAG: &str = "cbc:CreditedQuantity";

/// UBL 2.0 `CreditNote`.
///
/// `billing_references` holds the IDs of the invoices being credited.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditNote {
    pub ubl_version_id: Option<String>,
    pub customization_id: Option<String>,
    pub profile_id: Option<String>,
    pub id: String,
    pub uuid: Option<String>,
    pub issue_date: NaiveDate,
    pub notes: Vec<String>,
    pub document_currency_code: Option<Currency>,
    pub billing_references: Vec<String>,
    pub accounting_supplier_party: Party,
    pub accounting_customer_party: Party,
    pub tax_totals: Vec<TaxTotal>,
    pub legal_monetary_total: MonetaryTotal,
    pub credit_note_lines: Vec<InvoiceLine>,
}

impl UblDocument for CreditNote {
    const DOCUMENT_TYPE: DocumentType = DocumentType::CreditNote;

    fn bind(b: &XmlBinder) -> Result<Self, BindError> {
        Ok(Self {
            ubl_version_id: b.text_optional("cbc:UBLVersionID")?,
            customization_id: b.text_optional("cbc:CustomizationID")?,
            profile_id: b.text_optional("cbc:ProfileID")?,
            id: b.text_required("cbc:ID")?,
            uuid: b.text_optional("cbc:UUID")?,
            issue_date: b.date_required("cbc:IssueDate")?,
            notes: b.texts("cbc:Note")?,
            document_currency_code: header::currency_optional(b, "cbc:DocumentCurrencyCode")?,
            billing_references: b
                .texts("cac:BillingReference/cac:InvoiceDocumentReference/cbc:ID")?,
            accounting_supplier_party: Party::bind_at(b, "cac:AccountingSupplierParty/cac:Party")?,
            accounting_customer_party: Party::bind_at(b, "cac:AccountingCustomerParty/cac:Party")?,
            tax_totals: TaxTotal::bind_all(b, "")?,
            legal_monetary_total: MonetaryTotal::bind_required(b, "cac:LegalMonetaryTotal")?,
            credit_note_lines: InvoiceLine::bind_all(b, "cac:CreditNoteLine", QUANTITY_TAG)?,
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
        for invoice_id in &self.billing_references {
            root.serialize_field("cac:BillingReference", &BillingReferenceXml(invoice_id))?;
        }
        root.serialize_field(
            "cac:AccountingSupplierParty",
            &party_role(&self.accounting_supplier_party),
        )?;
        root.serialize_field(
            "cac:AccountingCustomerParty",
            &party_role(&self.accounting_customer_party),
        )?;
        for tax_total in &self.tax_totals {
            root.serialize_field("cac:TaxTotal", tax_total)?;
        }
        root.serialize_field("cac:LegalMonetaryTotal", &self.legal_monetary_total)?;
        for line in &self.credit_note_lines {
            root.serialize_field("cac:CreditNoteLine", &line.xml(QUANTITY_TAG))?;
        }
        Ok(())
    }
}

struct BillingReferenceXml<'a>(&'a str);

struct InvoiceDocumentReferenceXml<'a>(&'a str);

impl<'a> Serialize for InvoiceDocumentReferenceXml<'a> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:InvoiceDocumentReference", 1)?;
        st.serialize_field("cbc:ID", self.0)?;
        st.end()
    }
}

impl<'a> Serialize for BillingReferenceXml<'a> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:BillingReference", 1)?;
        st.serialize_field(
            "cac:InvoiceDocumentReference",
            &InvoiceDocumentReferenceXml(self.0),
        )?;
        st.end()
    }
}
