#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must not panic; errors are fine.
    if let Ok(invoice) = einvoice::EInvoice::from_xml(data) {
        let _ = invoice.profile();
    }
});
