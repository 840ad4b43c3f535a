//! Common aggregate and basic components shared across document types.
use crate::binding::{BindError, XmlBinder};
use crate::xml::{FixedPrecision, TextWithAttribute};
use iso_currency::Currency;
use isocountry::CountryCode;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Monetary amount with its mandatory `currencyID`.
///
/// `scale` is the number of fraction digits written out. Values read from
/// XML keep the digits they were written with, so `0.125` stays `0.125`.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    pub value: f64,
    pub currency: Currency,
    pub scale: usize,
}

impl Amount {
    /// Amount written with the currency's minor unit digits, or two when
    /// ISO 4217 defines none.
    pub fn new(value: f64, currency: Currency) -> Self {
        Self {
            value,
            currency,
            scale: currency.exponent().map_or(2, usize::from),
        }
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale;
        self
    }

    pub(crate) fn bind_optional(b: &XmlBinder, path: &str) -> Result<Option<Self>, BindError> {
        let Some((value, scale)) = bind_scaled(b, path)? else {
            return Ok(None);
        };
        let code = b
            .attribute_optional(path, "currencyID")?
            .ok_or_else(|| BindError::MissingField(format!("{path}/@currencyID")))?;
        let currency = Currency::from_code(&code).ok_or_else(|| BindError::InvalidValue {
            field: format!("{path}/@currencyID"),
            value: code,
        })?;
        Ok(Some(Self {
            value,
            currency,
            scale,
        }))
    }

    pub(crate) fn bind_required(b: &XmlBinder, path: &str) -> Result<Self, BindError> {
        Self::bind_optional(b, path)?.ok_or_else(|| BindError::MissingField(path.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("Amount", 2)?;
        st.serialize_field("@currencyID", self.currency.code())?;
        st.serialize_field("$text", &FixedPrecision::new(self.value, self.scale))?;
        st.end()
    }
}

/// Quantity with an optional UN/ECE rec. 20 unit code.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit_code: Option<String>,
    pub scale: usize,
}

impl Quantity {
    /// Quantity written in its shortest form.
    pub fn new(value: f64, unit_code: Option<&str>) -> Self {
        Self {
            value,
            unit_code: unit_code.map(str::to_string),
            scale: shortest_scale(value),
        }
    }

    pub(crate) fn bind_optional(b: &XmlBinder, path: &str) -> Result<Option<Self>, BindError> {
        let Some((value, scale)) = bind_scaled(b, path)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            value,
            unit_code: b.attribute_optional(path, "unitCode")?,
            scale,
        }))
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("Quantity", 2)?;
        if let Some(unit_code) = &self.unit_code {
            st.serialize_field("@unitCode", unit_code)?;
        }
        st.serialize_field("$text", &FixedPrecision::new(self.value, self.scale))?;
        st.end()
    }
}

/// `cbc:Percent`, written with the fraction digits it was read with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent {
    pub value: f64,
    pub scale: usize,
}

impl Percent {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            scale: shortest_scale(value),
        }
    }

    fn bind_optional(b: &XmlBinder, path: &str) -> Result<Option<Self>, BindError> {
        Ok(bind_scaled(b, path)?.map(|(value, scale)| Self { value, scale }))
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FixedPrecision::new(self.value, self.scale).serialize(s)
    }
}

/// Decimal at `path` together with the number of fraction digits in its text.
fn bind_scaled(b: &XmlBinder, path: &str) -> Result<Option<(f64, usize)>, BindError> {
    let Some(text) = b.text_optional(path)? else {
        return Ok(None);
    };
    let value = text.parse::<f64>().map_err(|_| BindError::InvalidValue {
        field: path.to_string(),
        value: text.clone(),
    })?;
    Ok(Some((value, fraction_digits(&text))))
}

fn fraction_digits(text: &str) -> usize {
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

fn shortest_scale(value: f64) -> usize {
    fraction_digits(&value.to_string())
}

/// Identifier with an optional `schemeID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub scheme_id: Option<String>,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme_id: None,
        }
    }

    pub fn with_scheme(value: impl Into<String>, scheme_id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme_id: Some(scheme_id.into()),
        }
    }

    pub(crate) fn bind_optional(b: &XmlBinder, path: &str) -> Result<Option<Self>, BindError> {
        let Some(value) = b.text_optional(path)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            value,
            scheme_id: b.attribute_optional(path, "schemeID")?,
        }))
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TextWithAttribute {
            attribute: "@schemeID",
            attribute_value: self.scheme_id.as_deref(),
            text: &self.value,
        }
        .serialize(s)
    }
}

/// `cac:PostalAddress`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street_name: Option<String>,
    pub building_number: Option<String>,
    pub city_name: Option<String>,
    pub postal_zone: Option<String>,
    pub country: Option<CountryCode>,
}

impl Address {
    pub(crate) fn bind_optional(b: &XmlBinder, base: &str) -> Result<Option<Self>, BindError> {
        if b.count(base)? == 0 {
            return Ok(None);
        }
        let country_path = format!("{base}/cac:Country/cbc:IdentificationCode");
        let country = b
            .text_optional(&country_path)?
            .map(|code| {
                CountryCode::for_alpha2(&code).map_err(|_| BindError::InvalidValue {
                    field: country_path.clone(),
                    value: code,
                })
            })
            .transpose()?;
        Ok(Some(Self {
            street_name: b.text_optional(&format!("{base}/cbc:StreetName"))?,
            building_number: b.text_optional(&format!("{base}/cbc:BuildingNumber"))?,
            city_name: b.text_optional(&format!("{base}/cbc:CityName"))?,
            postal_zone: b.text_optional(&format!("{base}/cbc:PostalZone"))?,
            country,
        }))
    }
}

struct CountryXml(&'static str);

impl Serialize for CountryXml {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:Country", 1)?;
        st.serialize_field("cbc:IdentificationCode", self.0)?;
        st.end()
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:PostalAddress", 0)?;
        if let Some(street) = &self.street_name {
            st.serialize_field("cbc:StreetName", street)?;
        }
        if let Some(building) = &self.building_number {
            st.serialize_field("cbc:BuildingNumber", building)?;
        }
        if let Some(city) = &self.city_name {
            st.serialize_field("cbc:CityName", city)?;
        }
        if let Some(postal_zone) = &self.postal_zone {
            st.serialize_field("cbc:PostalZone", postal_zone)?;
        }
        if let Some(country) = &self.country {
            st.serialize_field("cac:Country", &CountryXml(country.alpha2()))?;
        }
        st.end()
    }
}

/// `cac:TaxScheme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxScheme {
    pub id: String,
}

impl TaxScheme {
    pub fn vat() -> Self {
        Self { id: "VAT".into() }
    }

    fn bind_at(b: &XmlBinder, base: &str) -> Result<Self, BindError> {
        Ok(Self {
            id: b.text_required(&format!("{base}/cbc:ID"))?,
        })
    }
}

impl Serialize for TaxScheme {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:TaxScheme", 1)?;
        st.serialize_field("cbc:ID", &self.id)?;
        st.end()
    }
}

/// `cac:PartyTaxScheme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyTaxScheme {
    pub company_id: Option<String>,
    pub tax_scheme: TaxScheme,
}

impl Serialize for PartyTaxScheme {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:PartyTaxScheme", 2)?;
        if let Some(company_id) = &self.company_id {
            st.serialize_field("cbc:CompanyID", company_id)?;
        }
        st.serialize_field("cac:TaxScheme", &self.tax_scheme)?;
        st.end()
    }
}

/// `cac:Party`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Party {
    pub identification: Option<Identifier>,
    pub name: Option<String>,
    pub postal_address: Option<Address>,
    pub tax_scheme: Option<PartyTaxScheme>,
    pub registration_name: Option<String>,
}

impl Party {
    pub(crate) fn bind_at(b: &XmlBinder, base: &str) -> Result<Self, BindError> {
        let tax_base = format!("{base}/cac:PartyTaxScheme");
        let tax_scheme = if b.count(&tax_base)? > 0 {
            Some(PartyTaxScheme {
                company_id: b.text_optional(&format!("{tax_base}/cbc:CompanyID"))?,
                tax_scheme: TaxScheme::bind_at(b, &format!("{tax_base}/cac:TaxScheme"))?,
            })
        } else {
            None
        };
        Ok(Self {
            identification: Identifier::bind_optional(
                b,
                &format!("{base}/cac:PartyIdentification/cbc:ID"),
            )?,
            name: b.text_optional(&format!("{base}/cac:PartyName/cbc:Name"))?,
            postal_address: Address::bind_optional(b, &format!("{base}/cac:PostalAddress"))?,
            tax_scheme,
            registration_name: b.text_optional(&format!(
                "{base}/cac:PartyLegalEntity/cbc:RegistrationName"
            ))?,
        })
    }
}

struct Wrapped<'a, T: Serialize> {
    tag: &'static str,
    value: &'a T,
}

impl<'a, T: Serialize> Serialize for Wrapped<'a, T> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("Wrapped", 1)?;
        st.serialize_field(self.tag, self.value)?;
        st.end()
    }
}

impl Serialize for Party {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:Party", 0)?;
        if let Some(id) = &self.identification {
            st.serialize_field(
                "cac:PartyIdentification",
                &Wrapped {
                    tag: "cbc:ID",
                    value: id,
                },
            )?;
        }
        if let Some(name) = &self.name {
            st.serialize_field(
                "cac:PartyName",
                &Wrapped {
                    tag: "cbc:Name",
                    value: name,
                },
            )?;
        }
        if let Some(address) = &self.postal_address {
            st.serialize_field("cac:PostalAddress", address)?;
        }
        if let Some(tax_scheme) = &self.tax_scheme {
            st.serialize_field("cac:PartyTaxScheme", tax_scheme)?;
        }
        if let Some(registration_name) = &self.registration_name {
            st.serialize_field(
                "cac:PartyLegalEntity",
                &Wrapped {
                    tag: "cbc:RegistrationName",
                    value: registration_name,
                },
            )?;
        }
        st.end()
    }
}

/// Writes `party` inside a role element such as `cac:AccountingSupplierParty`.
pub(crate) fn party_role(party: &Party) -> impl Serialize + '_ {
    Wrapped {
        tag: "cac:Party",
        value: party,
    }
}

/// `cac:TaxCategory` / `cac:ClassifiedTaxCategory`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxCategory {
    pub id: Option<String>,
    pub percent: Option<Percent>,
    pub tax_scheme: TaxScheme,
}

impl TaxCategory {
    pub fn vat(id: impl Into<String>, percent: f64) -> Self {
        Self {
            id: Some(id.into()),
            percent: Some(Percent::new(percent)),
            tax_scheme: TaxScheme::vat(),
        }
    }

    pub(crate) fn bind_optional(b: &XmlBinder, base: &str) -> Result<Option<Self>, BindError> {
        if b.count(base)? == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            id: b.text_optional(&format!("{base}/cbc:ID"))?,
            percent: Percent::bind_optional(b, &format!("{base}/cbc:Percent"))?,
            tax_scheme: TaxScheme::bind_at(b, &format!("{base}/cac:TaxScheme"))?,
        }))
    }
}

impl Serialize for TaxCategory {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:TaxCategory", 3)?;
        if let Some(id) = &self.id {
            st.serialize_field("cbc:ID", id)?;
        }
        if let Some(percent) = &self.percent {
            st.serialize_field("cbc:Percent", percent)?;
        }
        st.serialize_field("cac:TaxScheme", &self.tax_scheme)?;
        st.end()
    }
}

/// `cac:TaxSubtotal`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxSubtotal {
    pub taxable_amount: Option<Amount>,
    pub tax_amount: Amount,
    pub tax_category: TaxCategory,
}

impl Serialize for TaxSubtotal {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:TaxSubtotal", 3)?;
        if let Some(taxable) = &self.taxable_amount {
            st.serialize_field("cbc:TaxableAmount", taxable)?;
        }
        st.serialize_field("cbc:TaxAmount", &self.tax_amount)?;
        st.serialize_field("cac:TaxCategory", &self.tax_category)?;
        st.end()
    }
}

/// `cac:TaxTotal`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxTotal {
    pub tax_amount: Amount,
    pub subtotals: Vec<TaxSubtotal>,
}

impl TaxTotal {
    /// Bind every `cac:TaxTotal` directly below `parent` (empty for the root).
    pub(crate) fn bind_all(b: &XmlBinder, parent: &str) -> Result<Vec<Self>, BindError> {
        let path = child_path(parent, "cac:TaxTotal");
        let count = b.count(&path)?;
        let mut totals = Vec::with_capacity(count);
        for idx in 1..=count {
            let base = format!("{path}[{idx}]");
            let sub_count = b.count(&format!("{base}/cac:TaxSubtotal"))?;
            let mut subtotals = Vec::with_capacity(sub_count);
            for sub in 1..=sub_count {
                let sub_base = format!("{base}/cac:TaxSubtotal[{sub}]");
                let category_path = format!("{sub_base}/cac:TaxCategory");
                subtotals.push(TaxSubtotal {
                    taxable_amount: Amount::bind_optional(
                        b,
                        &format!("{sub_base}/cbc:TaxableAmount"),
                    )?,
                    tax_amount: Amount::bind_required(b, &format!("{sub_base}/cbc:TaxAmount"))?,
                    tax_category: TaxCategory::bind_optional(b, &category_path)?
                        .ok_or(BindError::MissingField(category_path))?,
                });
            }
            totals.push(TaxTotal {
                tax_amount: Amount::bind_required(b, &format!("{base}/cbc:TaxAmount"))?,
                subtotals,
            });
        }
        Ok(totals)
    }
}

impl Serialize for TaxTotal {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:TaxTotal", 0)?;
        st.serialize_field("cbc:TaxAmount", &self.tax_amount)?;
        for subtotal in &self.subtotals {
            st.serialize_field("cac:TaxSubtotal", subtotal)?;
        }
        st.end()
    }
}

/// `cac:LegalMonetaryTotal` / `cac:AnticipatedMonetaryTotal`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonetaryTotal {
    pub line_extension_amount: Option<Amount>,
    pub tax_exclusive_amount: Option<Amount>,
    pub tax_inclusive_amount: Option<Amount>,
    pub allowance_total_amount: Option<Amount>,
    pub charge_total_amount: Option<Amount>,
    pub prepaid_amount: Option<Amount>,
    pub payable_amount: Amount,
}

impl MonetaryTotal {
    pub fn payable(payable_amount: Amount) -> Self {
        Self {
            line_extension_amount: None,
            tax_exclusive_amount: None,
            tax_inclusive_amount: None,
            allowance_total_amount: None,
            charge_total_amount: None,
            prepaid_amount: None,
            payable_amount,
        }
    }

    pub(crate) fn bind_optional(b: &XmlBinder, base: &str) -> Result<Option<Self>, BindError> {
        if b.count(base)? == 0 {
            return Ok(None);
        }
        let amount = |tag: &str| Amount::bind_optional(b, &format!("{base}/{tag}"));
        Ok(Some(Self {
            line_extension_amount: amount("cbc:LineExtensionAmount")?,
            tax_exclusive_amount: amount("cbc:TaxExclusiveAmount")?,
            tax_inclusive_amount: amount("cbc:TaxInclusiveAmount")?,
            allowance_total_amount: amount("cbc:AllowanceTotalAmount")?,
            charge_total_amount: amount("cbc:ChargeTotalAmount")?,
            prepaid_amount: amount("cbc:PrepaidAmount")?,
            payable_amount: Amount::bind_required(b, &format!("{base}/cbc:PayableAmount"))?,
        }))
    }

    pub(crate) fn bind_required(b: &XmlBinder, base: &str) -> Result<Self, BindError> {
        Self::bind_optional(b, base)?.ok_or_else(|| BindError::MissingField(base.to_string()))
    }
}

impl Serialize for MonetaryTotal {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:MonetaryTotal", 0)?;
        let optional = [
            ("cbc:LineExtensionAmount", &self.line_extension_amount),
            ("cbc:TaxExclusiveAmount", &self.tax_exclusive_amount),
            ("cbc:TaxInclusiveAmount", &self.tax_inclusive_amount),
            ("cbc:AllowanceTotalAmount", &self.allowance_total_amount),
            ("cbc:ChargeTotalAmount", &self.charge_total_amount),
            ("cbc:PrepaidAmount", &self.prepaid_amount),
        ];
        for (tag, amount) in optional {
            if let Some(amount) = amount {
                st.serialize_field(tag, amount)?;
            }
        }
        st.serialize_field("cbc:PayableAmount", &self.payable_amount)?;
        st.end()
    }
}

/// `cac:Item`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub description: Option<String>,
    pub name: Option<String>,
    pub sellers_item_id: Option<String>,
    pub classified_tax_category: Option<TaxCategory>,
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn bind_at(b: &XmlBinder, base: &str) -> Result<Self, BindError> {
        Ok(Self {
            description: b.text_optional(&format!("{base}/cbc:Description"))?,
            name: b.text_optional(&format!("{base}/cbc:Name"))?,
            sellers_item_id: b
                .text_optional(&format!("{base}/cac:SellersItemIdentification/cbc:ID"))?,
            classified_tax_category: TaxCategory::bind_optional(
                b,
                &format!("{base}/cac:ClassifiedTaxCategory"),
            )?,
        })
    }
}

impl Serialize for Item {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:Item", 0)?;
        if let Some(description) = &self.description {
            st.serialize_field("cbc:Description", description)?;
        }
        if let Some(name) = &self.name {
            st.serialize_field("cbc:Name", name)?;
        }
        if let Some(id) = &self.sellers_item_id {
            st.serialize_field(
                "cac:SellersItemIdentification",
                &Wrapped {
                    tag: "cbc:ID",
                    value: id,
                },
            )?;
        }
        if let Some(category) = &self.classified_tax_category {
            st.serialize_field("cac:ClassifiedTaxCategory", category)?;
        }
        st.end()
    }
}

/// `cac:Price`.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub price_amount: Amount,
    pub base_quantity: Option<Quantity>,
}

impl Price {
    fn bind_optional(b: &XmlBinder, base: &str) -> Result<Option<Self>, BindError> {
        if b.count(base)? == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            price_amount: Amount::bind_required(b, &format!("{base}/cbc:PriceAmount"))?,
            base_quantity: Quantity::bind_optional(b, &format!("{base}/cbc:BaseQuantity"))?,
        }))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:Price", 2)?;
        st.serialize_field("cbc:PriceAmount", &self.price_amount)?;
        if let Some(quantity) = &self.base_quantity {
            st.serialize_field("cbc:BaseQuantity", quantity)?;
        }
        st.end()
    }
}

/// A billed line: `cac:InvoiceLine` or `cac:CreditNoteLine`.
///
/// The two differ only in the name of the quantity element
/// (`cbc:InvoicedQuantity` / `cbc:CreditedQuantity`).
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub id: String,
    pub note: Option<String>,
    pub quantity: Option<Quantity>,
    pub line_extension_amount: Option<Amount>,
    pub tax_total: Option<TaxTotal>,
    pub item: Item,
    pub price: Option<Price>,
}

impl InvoiceLine {
    /// Bind every `line_tag` element below the root.
    pub(crate) fn bind_all(
        b: &XmlBinder,
        line_tag: &str,
        quantity_tag: &str,
    ) -> Result<Vec<Self>, BindError> {
        let count = b.count(line_tag)?;
        let mut lines = Vec::with_capacity(count);
        for idx in 1..=count {
            let base = format!("{line_tag}[{idx}]");
            lines.push(Self {
                id: b.text_required(&format!("{base}/cbc:ID"))?,
                note: b.text_optional(&format!("{base}/cbc:Note"))?,
                quantity: Quantity::bind_optional(b, &format!("{base}/{quantity_tag}"))?,
                line_extension_amount: Amount::bind_optional(
                    b,
                    &format!("{base}/cbc:LineExtensionAmount"),
                )?,
                tax_total: TaxTotal::bind_all(b, &base)?.into_iter().next(),
                item: Item::bind_at(b, &format!("{base}/cac:Item"))?,
                price: Price::bind_optional(b, &format!("{base}/cac:Price"))?,
            });
        }
        Ok(lines)
    }

    pub(crate) fn xml(&self, quantity_tag: &'static str) -> impl Serialize + '_ {
        InvoiceLineXml {
            line: self,
            quantity_tag,
        }
    }
}

struct InvoiceLineXml<'a> {
    line: &'a InvoiceLine,
    quantity_tag: &'static str,
}

impl<'a> Serialize for InvoiceLineXml<'a> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let line = self.line;
        let mut st = s.serialize_struct("cac:InvoiceLine", 0)?;
        st.serialize_field("cbc:ID", &line.id)?;
        if let Some(note) = &line.note {
            st.serialize_field("cbc:Note", note)?;
        }
        if let Some(quantity) = &line.quantity {
            st.serialize_field(self.quantity_tag, quantity)?;
        }
        if let Some(amount) = &line.line_extension_amount {
            st.serialize_field("cbc:LineExtensionAmount", amount)?;
        }
        if let Some(tax_total) = &line.tax_total {
            st.serialize_field("cac:TaxTotal", tax_total)?;
        }
        st.serialize_field("cac:Item", &line.item)?;
        if let Some(price) = &line.price {
            st.serialize_field("cac:Price", price)?;
        }
        st.end()
    }
}

/// `cac:OrderLine` with its single `cac:LineItem`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: String,
    pub quantity: Option<Quantity>,
    pub line_extension_amount: Option<Amount>,
    pub price: Option<Price>,
    pub item: Item,
}

impl OrderLine {
    pub(crate) fn bind_all(b: &XmlBinder) -> Result<Vec<Self>, BindError> {
        let count = b.count("cac:OrderLine")?;
        let mut lines = Vec::with_capacity(count);
        for idx in 1..=count {
            let base = format!("cac:OrderLine[{idx}]/cac:LineItem");
            lines.push(Self {
                id: b.text_required(&format!("{base}/cbc:ID"))?,
                quantity: Quantity::bind_optional(b, &format!("{base}/cbc:Quantity"))?,
                line_extension_amount: Amount::bind_optional(
                    b,
                    &format!("{base}/cbc:LineExtensionAmount"),
                )?,
                price: Price::bind_optional(b, &format!("{base}/cac:Price"))?,
                item: Item::bind_at(b, &format!("{base}/cac:Item"))?,
            });
        }
        Ok(lines)
    }
}

struct LineItemXml<'a>(&'a OrderLine);

impl<'a> Serialize for LineItemXml<'a> {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let line = self.0;
        let mut st = s.serialize_struct("cac:LineItem", 0)?;
        st.serialize_field("cbc:ID", &line.id)?;
        if let Some(quantity) = &line.quantity {
            st.serialize_field("cbc:Quantity", quantity)?;
        }
        if let Some(amount) = &line.line_extension_amount {
            st.serialize_field("cbc:LineExtensionAmount", amount)?;
        }
        if let Some(price) = &line.price {
            st.serialize_field("cac:Price", price)?;
        }
        st.serialize_field("cac:Item", &line.item)?;
        st.end()
    }
}

impl Serialize for OrderLine {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = s.serialize_struct("cac:OrderLine", 1)?;
        st.serialize_field("cac:LineItem", &LineItemXml(self))?;
        st.end()
    }
}

fn child_path(parent: &str, tag: &str) -> String {
    if parent.is_empty() {
        tag.to_string()
    } else {
        format!("{parent}/{tag}")
    }
}
