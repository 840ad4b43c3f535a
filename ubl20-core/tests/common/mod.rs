use chrono::NaiveDate;
use iso_currency::Currency;
use isocountry::CountryCode;
use libxml::tree::Node;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ubl20_core::config::Config;
use ubl20_core::marshal::UblMarshaller;
use ubl20_core::model::{
    Address, Amount, CreditNote, Identifier, Invoice, InvoiceLine, Item, MonetaryTotal, Order,
    OrderLine, Party, PartyTaxScheme, Price, Quantity, TaxCategory, TaxScheme, TaxSubtotal,
    TaxTotal,
};
use ubl20_core::registry::DocumentTypeRegistry;

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[allow(dead_code)]
pub fn document_path(name: &str) -> PathBuf {
    fixtures_dir().join("documents").join(name)
}

#[allow(dead_code)]
pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(document_path(name)).expect("read fixture document")
}

#[allow(dead_code)]
pub fn config() -> Config {
    Config::new(fixtures_dir().join("schemas/xsd"))
}

#[allow(dead_code)]
pub fn marshaller() -> UblMarshaller {
    UblMarshaller::from_config(&config())
}

#[allow(dead_code)]
pub fn shared_registry() -> Arc<DocumentTypeRegistry> {
    Arc::new(DocumentTypeRegistry::new(&config()))
}

/// Asserts that two element trees agree on names, namespaces, attributes
/// and the text of their leaf elements. Whitespace between elements and
/// namespace declarations are not compared.
#[allow(dead_code)]
pub fn assert_same_elements(expected: &Node, actual: &Node, path: &str) {
    let here = format!("{path}/{}", expected.get_name());
    assert_eq!(expected.get_name(), actual.get_name(), "element at {here}");
    assert_eq!(
        expected.get_namespace().map(|ns| ns.get_href()),
        actual.get_namespace().map(|ns| ns.get_href()),
        "namespace of {here}"
    );
    assert_eq!(
        expected.get_properties(),
        actual.get_properties(),
        "attributes of {here}"
    );

    let expected_children = expected.get_child_elements();
    let actual_children = actual.get_child_elements();
    assert_eq!(
        expected_children.iter().map(Node::get_name).collect::<Vec<_>>(),
        actual_children.iter().map(Node::get_name).collect::<Vec<_>>(),
        "children of {here}"
    );
    if expected_children.is_empty() {
        assert_eq!(
            expected.get_content().trim(),
            actual.get_content().trim(),
            "text of {here}"
        );
    }
    for (e, a) in expected_children.iter().zip(&actual_children) {
        assert_same_elements(e, a, &here);
    }
}

#[allow(dead_code)]
pub fn gbp(value: f64) -> Amount {
    Amount::new(value, Currency::GBP)
}

#[allow(dead_code)]
pub fn supplier() -> Party {
    Party {
        identification: Some(Identifier::with_scheme("5412345000013", "GLN")),
        name: Some("Consortial".into()),
        postal_address: Some(Address {
            street_name: Some("Busy Street".into()),
            building_number: Some("56A".into()),
            city_name: Some("Farthing".into()),
            postal_zone: Some("AA99 1BB".into()),
            country: Some(CountryCode::GBR),
        }),
        tax_scheme: Some(PartyTaxScheme {
            company_id: Some("175 269 2355".into()),
            tax_scheme: TaxScheme::vat(),
        }),
        registration_name: Some("Consortial Ltd".into()),
    }
}

#[allow(dead_code)]
pub fn customer() -> Party {
    Party {
        name: Some("IYT Corporation".into()),
        ..Party::default()
    }
}

#[allow(dead_code)]
pub fn beeswax() -> Item {
    Item {
        description: Some("Acme beeswax".into()),
        name: Some("beeswax".into()),
        sellers_item_id: Some("6578489".into()),
        classified_tax_category: Some(TaxCategory::vat("A", 17.5)),
    }
}

#[allow(dead_code)]
pub fn sample_invoice() -> Invoice {
    Invoice {
        ubl_version_id: Some("2.0".into()),
        customization_id: None,
        profile_id: None,
        id: "INV-1".into(),
        uuid: Some("8e6000cf-1a98-4174-b3e7-b5d5954bc10d".into()),
        issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        invoice_type_code: Some("SalesInvoice".into()),
        notes: vec!["first".into(), "second & last".into()],
        document_currency_code: Some(Currency::GBP),
        order_reference: Some("PO-7".into()),
        accounting_supplier_party: supplier(),
        accounting_customer_party: customer(),
        tax_totals: vec![TaxTotal {
            tax_amount: gbp(17.5),
            subtotals: vec![TaxSubtotal {
                taxable_amount: Some(gbp(100.0)),
                tax_amount: gbp(17.5),
                tax_category: TaxCategory::vat("A", 17.5),
            }],
        }],
        legal_monetary_total: MonetaryTotal {
            line_extension_amount: Some(gbp(100.0)),
            tax_exclusive_amount: Some(gbp(100.0)),
            tax_inclusive_amount: Some(gbp(117.5)),
            ..MonetaryTotal::payable(gbp(117.5))
        },
        invoice_lines: vec![InvoiceLine {
            id: "1".into(),
            note: None,
            quantity: Some(Quantity::new(4.0, Some("C62"))),
            line_extension_amount: Some(gbp(100.0)),
            tax_total: None,
            item: beeswax(),
            price: Some(Price {
                price_amount: gbp(25.0),
                base_quantity: Some(Quantity::new(1.0, Some("C62"))),
            }),
        }],
    }
}

#[allow(dead_code)]
pub fn sample_credit_note() -> CreditNote {
    CreditNote {
        ubl_version_id: Some("2.0".into()),
        customization_id: None,
        profile_id: None,
        id: "CN-1".into(),
        uuid: None,
        issue_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
        notes: Vec::new(),
        document_currency_code: Some(Currency::GBP),
        billing_references: vec!["INV-1".into()],
        accounting_supplier_party: supplier(),
        accounting_customer_party: customer(),
        tax_totals: Vec::new(),
        legal_monetary_total: MonetaryTotal::payable(gbp(25.0)),
        credit_note_lines: vec![InvoiceLine {
            id: "1".into(),
            note: Some("returned".into()),
            quantity: Some(Quantity::new(1.0, Some("C62"))),
            line_extension_amount: Some(gbp(25.0)),
            tax_total: None,
            item: Item::named("beeswax"),
            price: None,
        }],
    }
}

#[allow(dead_code)]
pub fn sample_order() -> Order {
    Order {
        ubl_version_id: Some("2.0".into()),
        customization_id: None,
        profile_id: None,
        id: "PO-7".into(),
        sales_order_id: None,
        uuid: None,
        issue_date: NaiveDate::from_ymd_opt(2023, 12, 20).expect("valid date"),
        notes: Vec::new(),
        document_currency_code: None,
        buyer_customer_party: customer(),
        seller_supplier_party: supplier(),
        anticipated_monetary_total: Some(MonetaryTotal::payable(gbp(100.0))),
        order_lines: vec![OrderLine {
            id: "1".into(),
            quantity: Some(Quantity::new(4.0, Some("KGM"))),
            line_extension_amount: Some(gbp(100.0)),
            price: Some(Price {
                price_amount: gbp(25.0),
                base_quantity: None,
            }),
            item: beeswax(),
        }],
    }
}
