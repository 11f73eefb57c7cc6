use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DocumentTypeCode;

/// BG-0: Invoice data as read from a CII document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    /// BG-2: Process control.
    pub meta: Meta,
    /// BT-1: Invoice number.
    pub document_id: String,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub document_type: DocumentTypeCode,
    /// BT-2: Invoice issue date.
    pub document_date: NaiveDate,
    /// BG-1: Invoice notes.
    pub notes: Vec<Note>,
    /// BT-10: Buyer reference (Leitweg-ID for XRechnung).
    pub buyer_reference: Option<String>,
    /// BG-4: Seller.
    pub seller: Party,
    /// BG-7: Buyer.
    pub buyer: Party,
    /// Header settlement, absent when the document has none.
    pub transaction: Option<Transaction>,
}

/// BG-2: Process control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// BT-23: Business process type.
    pub business_process_type: String,
    /// BT-24: Specification identifier (profile URN, unclassified).
    pub specification_profile: String,
}

/// BG-1: Invoice note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// BT-22: Note text.
    pub text: String,
    /// BT-21: Subject code.
    pub code: Option<String>,
}

/// BG-4 / BG-7: Trade party (seller or buyer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// BT-29 / BT-46: Party identifier.
    pub id: Option<String>,
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BG-5 / BG-8: Postal address.
    pub postal_address: PostalAddress,
    /// BT-31 / BT-32 / BT-48: Tax registrations.
    pub tax_registrations: Vec<TaxRegistration>,
}

/// BG-5 / BG-8: Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// BT-35 / BT-36 / BT-162: Address lines one to three.
    pub address_lines: [Option<String>; 3],
    /// BT-38 / BT-53: Post code.
    pub post_code: Option<String>,
    /// BT-37 / BT-52: City.
    pub city: Option<String>,
    /// BT-40 / BT-55: Country code (ISO 3166-1 alpha-2).
    pub country_code: String,
    /// BT-39 / BT-54: Country subdivision.
    pub country_subdivision: Option<String>,
}

/// Tax registration of a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRegistration {
    /// Scheme identifier (`VA` for VAT ID, `FC` for tax number).
    #[serde(rename = "type")]
    pub scheme: String,
    /// Registration value.
    pub value: Option<String>,
}

/// Header trade settlement: currency, totals, VAT breakdown and lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// BT-5: Invoice currency code.
    pub currency: String,
    /// BT-112: Invoice total amount with VAT.
    pub total_gross: Decimal,
    /// BT-106: Sum of invoice line net amounts.
    pub total_net: Decimal,
    /// BT-110: Invoice total VAT amount.
    pub total_vat: Decimal,
    /// BT-113: Paid amount. `None` when the document does not state it.
    pub total_prepaid: Option<Decimal>,
    /// BT-115: Amount due for payment. `None` when the document does not state it.
    pub total_payable: Option<Decimal>,
    /// BT-83: Remittance information.
    pub payment_reference: Option<String>,
    /// BG-23: VAT breakdown.
    pub taxes: Vec<TaxLine>,
    /// BG-25: Invoice lines.
    pub positions: Vec<LineItem>,
}

/// BG-23: VAT breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    /// BT-118-0: Always `VAT`.
    pub tax_type: String,
    /// BT-119: Category rate.
    pub tax_percent: Decimal,
    /// BT-117: Category tax amount.
    pub tax_amount: Decimal,
    /// BT-116: Category taxable amount.
    pub total_net: Decimal,
}

/// BG-25: Invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// BT-126: Line identifier.
    pub line_id: String,
    /// BT-157: Item standard identifier (GTIN).
    pub gtin: Option<String>,
    /// BT-153: Item name.
    pub name: String,
    /// BT-154: Item description.
    pub description: Option<String>,
    /// BT-129: Invoiced quantity.
    pub quantity: Decimal,
    /// BT-130: Unit of measure code (UNECE Rec 20).
    pub unit_code: String,
    /// BT-148: Item gross price.
    pub gross_item_price: Option<Decimal>,
    /// BT-146: Item net price.
    pub net_item_price: Option<Decimal>,
    /// BT-131: Line net amount.
    pub total: Decimal,
}

/// The only tax type the CII profiles carry in the VAT breakdown.
pub const TAX_TYPE_VAT: &str = "VAT";
