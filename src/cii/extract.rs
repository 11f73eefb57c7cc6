use tracing::debug;

use super::tree::{XmlDocument, XmlNode};
use crate::core::*;

const PROFILE_ID: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocumentContext/ram:GuidelineSpecifiedDocumentContextParameter/ram:ID/text()";
const BUSINESS_PROCESS: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocumentContext/ram:BusinessProcessSpecifiedDocumentContextParameter/ram:ID/text()";
const DOCUMENT_ID: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocument/ram:ID/text()";
const TYPE_CODE: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocument/ram:TypeCode/text()";
const ISSUE_DATE: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocument/ram:IssueDateTime/udt:DateTimeString/text()";
const NOTES: &str = "/rsm:CrossIndustryInvoice/rsm:ExchangedDocument/ram:IncludedNote";
const BUYER_REFERENCE: &str = "/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:ApplicableHeaderTradeAgreement/ram:BuyerReference/text()";
const AGREEMENT: &str =
    "/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:ApplicableHeaderTradeAgreement";
const SETTLEMENT: &str =
    "/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:ApplicableHeaderTradeSettlement";
const LINE_ITEMS: &str =
    "/rsm:CrossIndustryInvoice/rsm:SupplyChainTradeTransaction/ram:IncludedSupplyChainTradeLineItem";

/// Element name of the seller block inside the header trade agreement.
pub const SELLER_TAG: &str = "ram:SellerTradeParty";
/// Element name of the buyer block inside the header trade agreement.
pub const BUYER_TAG: &str = "ram:BuyerTradeParty";

/// BT-23 when the document does not state a business process.
pub const DEFAULT_BUSINESS_PROCESS: &str = "A1";

/// Read a complete invoice from a parsed CII document.
///
/// All-or-nothing: the first missing required field, malformed value or
/// unknown code aborts the whole extraction.
pub fn extract(doc: &XmlDocument) -> Result<InvoiceData, ExtractionError> {
    let root = doc.root();

    let meta = Meta {
        business_process_type: root
            .text(BUSINESS_PROCESS)?
            .unwrap_or_else(|| DEFAULT_BUSINESS_PROCESS.to_string()),
        specification_profile: root.required_identifier(PROFILE_ID)?,
    };

    let document_id = root.required_identifier(DOCUMENT_ID)?;
    let type_code = root.required_code(TYPE_CODE)?;
    let document_date = root.required_date(ISSUE_DATE)?;
    let notes = root
        .nodes(NOTES)?
        .into_iter()
        .map(|node| -> Result<Note, ExtractionError> {
            Ok(Note {
                text: node.required_text("/ram:IncludedNote/ram:Content/text()")?,
                code: node.code("/ram:IncludedNote/ram:SubjectCode/text()")?,
            })
        })
        .collect::<Result<Vec<_>, ExtractionError>>()?;
    let buyer_reference = root.text(BUYER_REFERENCE)?;

    let seller = trade_party(root, SELLER_TAG)?;
    let buyer = trade_party(root, BUYER_TAG)?;

    // Lines are read through the settlement; without it they would be lost.
    let transaction = match root.first_node(SETTLEMENT)? {
        Some(settlement) => Some(extract_transaction(root, settlement)?),
        None if !root.nodes(LINE_ITEMS)?.is_empty() => {
            return Err(ExtractionError::missing(root.locate(SETTLEMENT)?));
        }
        None => None,
    };

    // Sanity checks
    let document_type = DocumentTypeCode::from_code(&type_code)
        .ok_or_else(|| ExtractionError::invalid_code("documentType", &type_code))?;
    let seller = seller.ok_or_else(|| ExtractionError::MissingEntity("seller".into()))?;
    let buyer = buyer.ok_or_else(|| ExtractionError::MissingEntity("buyer".into()))?;

    debug!(
        document_id = %document_id,
        profile = %meta.specification_profile,
        lines = transaction.as_ref().map_or(0, |t| t.positions.len()),
        "extracted CII invoice"
    );

    Ok(InvoiceData {
        meta,
        document_id,
        document_type,
        document_date,
        notes,
        buyer_reference,
        seller,
        buyer,
        transaction,
    })
}

/// First `tag` block inside the header trade agreement, if any.
fn trade_party(root: XmlNode<'_>, tag: &str) -> Result<Option<Party>, ExtractionError> {
    root.first_node(&format!("{AGREEMENT}/{tag}"))?
        .map(|node| extract_party(node, tag))
        .transpose()
}

/// Read a seller or buyer block. `node` must be the `tag` element itself.
pub fn extract_party(node: XmlNode<'_>, tag: &str) -> Result<Party, ExtractionError> {
    let address_path = format!("/{tag}/ram:PostalTradeAddress");
    let postal_address = match node.first_node(&address_path)? {
        Some(address) => extract_postal_address(address)?,
        None => return Err(ExtractionError::missing(node.locate(&address_path)?)),
    };

    let tax_registrations = node
        .nodes(&format!("/{tag}/ram:SpecifiedTaxRegistration"))?
        .into_iter()
        .map(|reg| -> Result<TaxRegistration, ExtractionError> {
            Ok(TaxRegistration {
                scheme: reg.required_identifier(
                    "string(/ram:SpecifiedTaxRegistration/ram:ID/@schemeID)",
                )?,
                value: reg.identifier("/ram:SpecifiedTaxRegistration/ram:ID/text()")?,
            })
        })
        .collect::<Result<Vec<_>, ExtractionError>>()?;

    Ok(Party {
        id: node.identifier(&format!("/{tag}/ram:ID/text()"))?,
        name: node.required_text(&format!("/{tag}/ram:Name/text()"))?,
        postal_address,
        tax_registrations,
    })
}

fn extract_postal_address(node: XmlNode<'_>) -> Result<PostalAddress, ExtractionError> {
    Ok(PostalAddress {
        address_lines: [
            node.text("/ram:PostalTradeAddress/ram:LineOne/text()")?,
            node.text("/ram:PostalTradeAddress/ram:LineTwo/text()")?,
            node.text("/ram:PostalTradeAddress/ram:LineThree/text()")?,
        ],
        post_code: node.text("/ram:PostalTradeAddress/ram:PostcodeCode/text()")?,
        city: node.text("/ram:PostalTradeAddress/ram:CityName/text()")?,
        country_code: node.required_code("/ram:PostalTradeAddress/ram:CountryID/text()")?,
        country_subdivision: node
            .code("/ram:PostalTradeAddress/ram:CountrySubDivisionName/text()")?,
    })
}

fn extract_transaction(
    root: XmlNode<'_>,
    settlement: XmlNode<'_>,
) -> Result<Transaction, ExtractionError> {
    const SUMMATION: &str = "/ram:ApplicableHeaderTradeSettlement/ram:SpecifiedTradeSettlementHeaderMonetarySummation";

    let currency = settlement
        .required_code("/ram:ApplicableHeaderTradeSettlement/ram:InvoiceCurrencyCode/text()")?;
    let total_gross =
        settlement.required_decimal(&format!("{SUMMATION}/ram:GrandTotalAmount/text()"))?;
    let total_net =
        settlement.required_decimal(&format!("{SUMMATION}/ram:LineTotalAmount/text()"))?;
    let total_vat =
        settlement.required_decimal(&format!("{SUMMATION}/ram:TaxTotalAmount/text()"))?;
    let total_prepaid =
        settlement.decimal(&format!("{SUMMATION}/ram:TotalPrepaidAmount/text()"))?;
    let total_payable = settlement.decimal(&format!("{SUMMATION}/ram:DuePayableAmount/text()"))?;
    let payment_reference =
        settlement.text("/ram:ApplicableHeaderTradeSettlement/ram:PaymentReference/text()")?;

    let taxes = settlement
        .nodes("/ram:ApplicableHeaderTradeSettlement/ram:ApplicableTradeTax")?
        .into_iter()
        .map(extract_tax_line)
        .collect::<Result<Vec<_>, ExtractionError>>()?;

    let positions = root
        .nodes(LINE_ITEMS)?
        .into_iter()
        .map(extract_line_item)
        .collect::<Result<Vec<_>, ExtractionError>>()?;

    Ok(Transaction {
        currency,
        total_gross,
        total_net,
        total_vat,
        total_prepaid,
        total_payable,
        payment_reference,
        taxes,
        positions,
    })
}

fn extract_tax_line(node: XmlNode<'_>) -> Result<TaxLine, ExtractionError> {
    Ok(TaxLine {
        tax_type: TAX_TYPE_VAT.to_string(),
        tax_percent: node
            .required_decimal("/ram:ApplicableTradeTax/ram:RateApplicablePercent/text()")?,
        tax_amount: node.required_decimal("/ram:ApplicableTradeTax/ram:CalculatedAmount/text()")?,
        total_net: node.required_decimal("/ram:ApplicableTradeTax/ram:BasisAmount/text()")?,
    })
}

fn extract_line_item(node: XmlNode<'_>) -> Result<LineItem, ExtractionError> {
    const LINE: &str = "/ram:IncludedSupplyChainTradeLineItem";

    Ok(LineItem {
        line_id: node.required_code(&format!(
            "{LINE}/ram:AssociatedDocumentLineDocument/ram:LineID/text()"
        ))?,
        gtin: node.code(&format!("{LINE}/ram:SpecifiedTradeProduct/ram:GlobalID/text()"))?,
        name: node.required_text(&format!("{LINE}/ram:SpecifiedTradeProduct/ram:Name/text()"))?,
        description: node.text(&format!(
            "{LINE}/ram:SpecifiedTradeProduct/ram:Description/text()"
        ))?,
        quantity: node.required_decimal(&format!(
            "{LINE}/ram:SpecifiedLineTradeDelivery/ram:BilledQuantity/text()"
        ))?,
        unit_code: node.required_code(&format!(
            "{LINE}/ram:SpecifiedLineTradeDelivery/ram:BilledQuantity/@unitCode"
        ))?,
        gross_item_price: node.decimal(&format!(
            "{LINE}/ram:SpecifiedLineTradeAgreement/ram:GrossPriceProductTradePrice/ram:ChargeAmount/text()"
        ))?,
        net_item_price: node.decimal(&format!(
            "{LINE}/ram:SpecifiedLineTradeAgreement/ram:NetPriceProductTradePrice/ram:ChargeAmount/text()"
        ))?,
        total: node.required_decimal(&format!(
            "{LINE}/ram:SpecifiedLineTradeSettlement/ram:SpecifiedTradeSettlementLineMonetarySummation/ram:LineTotalAmount/text()"
        ))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn party_fragment(tag: &str) -> String {
        format!(
            r#"<{tag} xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100">
  <ram:ID>P-1</ram:ID>
  <ram:Name>ACME GmbH</ram:Name>
  <ram:PostalTradeAddress>
    <ram:PostcodeCode>10115</ram:PostcodeCode>
    <ram:LineOne>Friedrichstraße 123</ram:LineOne>
    <ram:LineThree>Hinterhaus</ram:LineThree>
    <ram:CityName>Berlin</ram:CityName>
    <ram:CountryID>DE</ram:CountryID>
  </ram:PostalTradeAddress>
  <ram:SpecifiedTaxRegistration><ram:ID schemeID="VA">DE123456789</ram:ID></ram:SpecifiedTaxRegistration>
  <ram:SpecifiedTaxRegistration><ram:ID schemeID="FC">201/113/40209</ram:ID></ram:SpecifiedTaxRegistration>
</{tag}>"#
        )
    }

    #[test]
    fn party_extraction_is_tag_parameterized() {
        let seller_doc = XmlDocument::parse(party_fragment(SELLER_TAG).as_bytes()).unwrap();
        let buyer_doc = XmlDocument::parse(party_fragment(BUYER_TAG).as_bytes()).unwrap();

        let seller = extract_party(seller_doc.root(), SELLER_TAG).unwrap();
        let buyer = extract_party(buyer_doc.root(), BUYER_TAG).unwrap();
        assert_eq!(seller, buyer);

        assert_eq!(seller.id.as_deref(), Some("P-1"));
        assert_eq!(seller.name, "ACME GmbH");
        assert_eq!(
            seller.postal_address.address_lines,
            [
                Some("Friedrichstraße 123".to_string()),
                None,
                Some("Hinterhaus".to_string())
            ]
        );
        assert_eq!(seller.postal_address.country_code, "DE");
        assert_eq!(seller.tax_registrations.len(), 2);
        assert_eq!(seller.tax_registrations[1].scheme, "FC");
    }

    #[test]
    fn party_without_address_fails() {
        let xml = r#"<ram:BuyerTradeParty xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100"><ram:Name>Kunde AG</ram:Name></ram:BuyerTradeParty>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let err = extract_party(doc.root(), BUYER_TAG).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MissingRequiredField {
                path: "/ram:BuyerTradeParty/ram:PostalTradeAddress".into()
            }
        );
    }

    #[test]
    fn tax_registration_requires_scheme() {
        let xml = r#"<ram:SellerTradeParty xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100">
  <ram:Name>ACME</ram:Name>
  <ram:PostalTradeAddress><ram:CountryID>DE</ram:CountryID></ram:PostalTradeAddress>
  <ram:SpecifiedTaxRegistration><ram:ID>DE123456789</ram:ID></ram:SpecifiedTaxRegistration>
</ram:SellerTradeParty>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let err = extract_party(doc.root(), SELLER_TAG).unwrap_err();
        assert_eq!(
            err.location(),
            Some("/ram:SellerTradeParty/ram:SpecifiedTaxRegistration/ram:ID/@schemeID")
        );
    }

    #[test]
    fn tax_line_values() {
        let xml = r#"<ram:ApplicableTradeTax xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100">
  <ram:CalculatedAmount>285.00</ram:CalculatedAmount>
  <ram:TypeCode>VAT</ram:TypeCode>
  <ram:BasisAmount>1500.00</ram:BasisAmount>
  <ram:CategoryCode>S</ram:CategoryCode>
  <ram:RateApplicablePercent>19</ram:RateApplicablePercent>
</ram:ApplicableTradeTax>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let line = extract_tax_line(doc.root()).unwrap();
        assert_eq!(line.tax_type, "VAT");
        assert_eq!(line.tax_percent, dec!(19));
        assert_eq!(line.tax_amount, dec!(285.00));
        assert_eq!(line.total_net, dec!(1500.00));
    }
}
