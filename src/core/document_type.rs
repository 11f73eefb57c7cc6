use serde::{Deserialize, Serialize};

/// Declares the closed code list once; `code()`, `from_code()` and `ALL`
/// are generated from the same table so they cannot drift apart.
macro_rules! document_types {
    ($($(#[$doc:meta])* $variant:ident = $code:literal,)+) => {
        /// UNTDID 1001 document type codes accepted by Factur-X / ZUGFeRD.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum DocumentTypeCode {
            $($(#[$doc])* $variant,)+
        }

        impl DocumentTypeCode {
            /// Every known code, in ascending numeric order.
            pub const ALL: &'static [DocumentTypeCode] = &[$(Self::$variant,)+];

            /// UNTDID 1001 code as it appears in `ram:TypeCode`.
            pub fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Parse from the UNTDID 1001 code string.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

document_types! {
    /// 71 — Request for payment.
    RequestForPayment = "71",
    /// 80 — Debit note related to goods or services.
    DebitNoteGoodsServices = "80",
    /// 81 — Credit note related to goods or services.
    CreditNoteGoodsServices = "81",
    /// 82 — Metered services invoice.
    MeteredServicesInvoice = "82",
    /// 83 — Credit note related to financial adjustments.
    CreditNoteFinancialAdjustments = "83",
    /// 84 — Debit note related to financial adjustments.
    DebitNoteFinancialAdjustments = "84",
    /// 102 — Tax notification.
    TaxNotification = "102",
    /// 130 — Invoicing data sheet.
    InvoicingDataSheet = "130",
    /// 202 — Direct payment valuation.
    DirectPaymentValuation = "202",
    /// 203 — Provisional payment valuation.
    ProvisionalPaymentValuation = "203",
    /// 204 — Payment valuation.
    PaymentValuation = "204",
    /// 211 — Interim application for payment.
    InterimApplicationForPayment = "211",
    /// 261 — Self billed credit note.
    SelfBilledCreditNote = "261",
    /// 262 — Consolidated credit note, goods and services.
    ConsolidatedCreditNote = "262",
    /// 295 — Price variation invoice.
    PriceVariationInvoice = "295",
    /// 296 — Credit note for price variation.
    PriceVariationCreditNote = "296",
    /// 308 — Delcredere credit note.
    DelcredereCreditNote = "308",
    /// 325 — Proforma invoice.
    ProformaInvoice = "325",
    /// 326 — Partial invoice.
    PartialInvoice = "326",
    /// 331 — Commercial invoice which includes a packing list.
    CommercialInvoiceWithPackingList = "331",
    /// 380 — Commercial invoice.
    CommercialInvoice = "380",
    /// 381 — Credit note.
    CreditNote = "381",
    /// 382 — Commission note.
    CommissionNote = "382",
    /// 383 — Debit note.
    DebitNote = "383",
    /// 384 — Corrected invoice.
    CorrectedInvoice = "384",
    /// 385 — Consolidated invoice.
    ConsolidatedInvoice = "385",
    /// 386 — Prepayment invoice.
    PrepaymentInvoice = "386",
    /// 387 — Hire invoice.
    HireInvoice = "387",
    /// 388 — Tax invoice.
    TaxInvoice = "388",
    /// 389 — Self-billed invoice.
    SelfBilledInvoice = "389",
    /// 390 — Delcredere invoice.
    DelcredereInvoice = "390",
    /// 393 — Factored invoice.
    FactoredInvoice = "393",
    /// 394 — Lease invoice.
    LeaseInvoice = "394",
    /// 395 — Consignment invoice.
    ConsignmentInvoice = "395",
    /// 396 — Factored credit note.
    FactoredCreditNote = "396",
    /// 420 — Optical character reading (OCR) payment credit note.
    OcrPaymentCreditNote = "420",
    /// 456 — Debit advice.
    DebitAdvice = "456",
    /// 457 — Reversal of debit.
    ReversalOfDebit = "457",
    /// 458 — Reversal of credit.
    ReversalOfCredit = "458",
    /// 527 — Self billed debit note.
    SelfBilledDebitNote = "527",
    /// 532 — Forwarder's credit note.
    ForwardersCreditNote = "532",
    /// 575 — Insurer's invoice.
    InsurersInvoice = "575",
    /// 623 — Forwarder's invoice.
    ForwardersInvoice = "623",
    /// 633 — Port charges documents.
    PortChargesDocuments = "633",
    /// 751 — Invoice information for accounting purposes.
    AccountingInvoiceInformation = "751",
    /// 780 — Freight invoice.
    FreightInvoice = "780",
    /// 817 — Claim notification.
    ClaimNotification = "817",
    /// 870 — Consular invoice.
    ConsularInvoice = "870",
    /// 875 — Partial construction invoice.
    PartialConstructionInvoice = "875",
    /// 876 — Partial final construction invoice.
    PartialFinalConstructionInvoice = "876",
    /// 877 — Final construction invoice.
    FinalConstructionInvoice = "877",
    /// 935 — Customs invoice.
    CustomsInvoice = "935",
}

impl std::fmt::Display for DocumentTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for DocumentTypeCode {
    type Err = super::ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| super::ExtractionError::invalid_code("documentType", s))
    }
}

impl TryFrom<String> for DocumentTypeCode {
    type Error = super::ExtractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentTypeCode> for String {
    fn from(value: DocumentTypeCode) -> Self {
        value.code().to_string()
    }
}
