#![no_main]

use libfuzzer_sys::fuzz_target;

const DOC: &str = r#"<rsm:CrossIndustryInvoice xmlns:rsm="urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100" xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100"><rsm:ExchangedDocument><ram:ID schemeID="X">RE-1</ram:ID><ram:ID>RE-2</ram:ID></rsm:ExchangedDocument></rsm:CrossIndustryInvoice>"#;

fuzz_target!(|data: &[u8]| {
    let Ok(expr) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = einvoice::cii::XmlDocument::parse(DOC.as_bytes()) else {
        return;
    };
    // Arbitrary query strings must be rejected or evaluated, never panic.
    let root = doc.root();
    let _ = root.text(expr);
    let _ = root.decimal(expr);
    let _ = root.date(expr);
    let _ = root.locate(expr);
    let _ = root.nodes(expr);
});
