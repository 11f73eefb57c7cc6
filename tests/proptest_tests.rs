//! Property-based tests and edge case tests for CII extraction.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "cii")]

use chrono::{Datelike, NaiveDate};
use einvoice::EInvoice;
use einvoice::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SAMPLE: &str = include_str!("fixtures/basicwl_one_line.xml");
const LINE_OPEN: &str = "<ram:IncludedSupplyChainTradeLineItem>";
const LINE_CLOSE: &str = "</ram:IncludedSupplyChainTradeLineItem>";

/// The fixture split around its single line item.
fn split_sample() -> (&'static str, &'static str, &'static str) {
    let start = SAMPLE.find(LINE_OPEN).unwrap();
    let end = SAMPLE.find(LINE_CLOSE).unwrap() + LINE_CLOSE.len();
    (&SAMPLE[..start], &SAMPLE[start..end], &SAMPLE[end..])
}

fn line_xml(id: &str, name: &str, qty: Decimal, unit: &str, total: Decimal) -> String {
    format!(
        r#"<ram:IncludedSupplyChainTradeLineItem>
      <ram:AssociatedDocumentLineDocument><ram:LineID>{id}</ram:LineID></ram:AssociatedDocumentLineDocument>
      <ram:SpecifiedTradeProduct><ram:Name>{name}</ram:Name></ram:SpecifiedTradeProduct>
      <ram:SpecifiedLineTradeDelivery><ram:BilledQuantity unitCode="{unit}">{qty}</ram:BilledQuantity></ram:SpecifiedLineTradeDelivery>
      <ram:SpecifiedLineTradeSettlement>
        <ram:SpecifiedTradeSettlementLineMonetarySummation><ram:LineTotalAmount>{total}</ram:LineTotalAmount></ram:SpecifiedTradeSettlementLineMonetarySummation>
      </ram:SpecifiedLineTradeSettlement>
    </ram:IncludedSupplyChainTradeLineItem>"#
    )
}

fn with_lines(lines: &[String]) -> String {
    let (head, _, tail) = split_sample();
    format!("{head}{}{tail}", lines.concat())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate a reasonable amount (0.01 to 99999.99).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a quantity with up to four decimals.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..=2100, 1u32..=366).prop_filter_map("valid ordinal", |(y, d)| {
        NaiveDate::from_yo_opt(y, d)
    })
}

/// A line as (name, quantity, unit, total).
fn arb_line() -> impl Strategy<Value = (String, Decimal, String, Decimal)> {
    (
        "[A-Za-z0-9&<>äöüß][A-Za-z0-9 &<>äöüß.,-]{0,39}",
        arb_quantity(),
        prop_oneof![Just("C62"), Just("HUR"), Just("KGM"), Just("XPP")],
        arb_amount(),
    )
        .prop_map(|(name, qty, unit, total)| (name, qty, unit.to_string(), total))
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// Lines come back in document order with their values intact.
    #[test]
    fn lines_are_preserved(lines in prop::collection::vec(arb_line(), 1..=8)) {
        let xml_lines: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(i, (name, qty, unit, total))| {
                line_xml(&(i + 1).to_string(), &escape(name), *qty, unit, *total)
            })
            .collect();
        let invoice = EInvoice::from_xml(with_lines(&xml_lines).as_bytes()).unwrap();
        let positions = &invoice.data().transaction.as_ref().unwrap().positions;

        prop_assert_eq!(positions.len(), lines.len());
        for (i, (line, (name, qty, unit, total))) in positions.iter().zip(&lines).enumerate() {
            prop_assert_eq!(&line.line_id, &(i + 1).to_string());
            prop_assert_eq!(line.name.as_str(), name.trim());
            prop_assert_eq!(line.quantity, *qty);
            prop_assert_eq!(&line.unit_code, unit);
            prop_assert_eq!(line.total, *total);
            prop_assert_eq!(line.gross_item_price, None);
        }
    }

    /// Any calendar date written as YYYYMMDD reads back unchanged.
    #[test]
    fn issue_date_roundtrip(d in arb_date()) {
        let text = format!("{:04}{:02}{:02}", d.year(), d.month(), d.day());
        let xml = SAMPLE.replace(">20240615<", &format!(">{text}<"));
        let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
        prop_assert_eq!(invoice.data().document_date, d);
    }

    /// Amounts keep their exact decimal value and scale.
    #[test]
    fn amounts_are_exact(gross in arb_amount(), prepaid in arb_amount()) {
        let xml = SAMPLE
            .replace(
                "<ram:GrandTotalAmount>1785.00</ram:GrandTotalAmount>",
                &format!(
                    "<ram:GrandTotalAmount>{gross}</ram:GrandTotalAmount><ram:TotalPrepaidAmount>{prepaid}</ram:TotalPrepaidAmount>"
                ),
            );
        let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
        let tx = invoice.data().transaction.as_ref().unwrap();
        prop_assert_eq!(tx.total_gross, gross);
        prop_assert_eq!(tx.total_gross.scale(), 2);
        prop_assert_eq!(tx.total_prepaid, Some(prepaid));
    }

    /// Arbitrary input never panics; it either extracts or fails with an error.
    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = EInvoice::from_xml(&bytes);
    }

    /// Truncating a valid document anywhere yields an error, never a panic.
    #[test]
    fn truncated_documents_fail_cleanly(cut in 0usize..SAMPLE.trim_end().len()) {
        let cut = (0..=cut).rev().find(|&i| SAMPLE.is_char_boundary(i)).unwrap_or(0);
        prop_assert!(EInvoice::from_xml(&SAMPLE.as_bytes()[..cut]).is_err());
    }

    /// Strings that are not 8-digit dates are rejected with their value.
    #[test]
    fn malformed_dates_are_reported(text in "[0-9-]{1,12}") {
        prop_assume!(!(text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit())));
        let xml = SAMPLE.replace(">20240615<", &format!(">{text}<"));
        let err = EInvoice::from_xml(xml.as_bytes()).unwrap_err();
        let is_malformed_date = matches!(err, ExtractionError::MalformedDate { ref value, .. } if *value == text);
        prop_assert!(is_malformed_date);
    }
}

// ── Edge Cases ──────────────────────────────────────────────────────────────

#[test]
fn every_profile_alias_classifies() {
    for &(urn, level) in profile::PROFILE_URNS {
        let xml = SAMPLE.replace("urn:factur-x.eu:1p0:basicwl", urn);
        let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(invoice.profile().unwrap(), level, "{urn}");
    }
}

#[test]
fn many_line_items() {
    let lines: Vec<String> = (1..=250)
        .map(|i| line_xml(&i.to_string(), &format!("Item {i}"), dec!(1), "C62", dec!(9.99)))
        .collect();
    let invoice = EInvoice::from_xml(with_lines(&lines).as_bytes()).unwrap();
    let positions = &invoice.data().transaction.as_ref().unwrap().positions;
    assert_eq!(positions.len(), 250);
    assert_eq!(positions[249].line_id, "250");
}

#[test]
fn no_line_items_is_allowed() {
    let invoice = EInvoice::from_xml(with_lines(&[]).as_bytes()).unwrap();
    assert!(invoice.data().transaction.as_ref().unwrap().positions.is_empty());
}

#[test]
fn large_and_negative_amounts() {
    let xml = SAMPLE
        .replace(
            "<ram:GrandTotalAmount>1785.00</ram:GrandTotalAmount>",
            "<ram:GrandTotalAmount>999999999999.99</ram:GrandTotalAmount>",
        )
        .replace(
            "<ram:DuePayableAmount>1785.00</ram:DuePayableAmount>",
            "<ram:DuePayableAmount>-1785.00</ram:DuePayableAmount>",
        );
    let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
    let tx = invoice.data().transaction.as_ref().unwrap();
    assert_eq!(tx.total_gross, dec!(999999999999.99));
    assert_eq!(tx.total_payable, Some(dec!(-1785.00)));
}

#[test]
fn whitespace_around_values_is_trimmed() {
    let xml = SAMPLE
        .replace(
            "<ram:ID>RE-2024-001</ram:ID>",
            "<ram:ID>\n      RE-2024-001\n    </ram:ID>",
        )
        .replace(
            "<ram:GrandTotalAmount>1785.00</ram:GrandTotalAmount>",
            "<ram:GrandTotalAmount> 1785.00 </ram:GrandTotalAmount>",
        );
    let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
    assert_eq!(invoice.data().document_id, "RE-2024-001");
    assert_eq!(
        invoice.data().transaction.as_ref().unwrap().total_gross,
        dec!(1785.00)
    );
}

#[test]
fn cdata_and_entities_in_names() {
    let xml = SAMPLE
        .replace(
            "<ram:Name>ACME GmbH</ram:Name>",
            "<ram:Name>Müller &amp; Söhne</ram:Name>",
        )
        .replace(
            "<ram:Name>Kunde AG</ram:Name>",
            "<ram:Name><![CDATA[Kunde <AG>]]></ram:Name>",
        );
    let invoice = EInvoice::from_xml(xml.as_bytes()).unwrap();
    assert_eq!(invoice.data().seller.name, "Müller & Söhne");
    assert_eq!(invoice.data().buyer.name, "Kunde <AG>");
}

#[test]
fn blank_required_value_counts_as_missing() {
    let xml = SAMPLE.replace("<ram:Name>Kunde AG</ram:Name>", "<ram:Name>   </ram:Name>");
    assert_eq!(
        EInvoice::from_xml(xml.as_bytes()).unwrap_err(),
        ExtractionError::MissingRequiredField {
            path: "/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:ApplicableHeaderTradeAgreement/ram:BuyerTradeParty/ram:Name/text()".into()
        }
    );
}

#[test]
fn leap_day_and_impossible_dates() {
    let xml = SAMPLE.replace(">20240615<", ">20240229<");
    assert_eq!(
        EInvoice::from_xml(xml.as_bytes()).unwrap().data().document_date,
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );

    let xml = SAMPLE.replace(">20240615<", ">20230229<");
    assert!(matches!(
        EInvoice::from_xml(xml.as_bytes()),
        Err(ExtractionError::MalformedDate { .. })
    ));
}
