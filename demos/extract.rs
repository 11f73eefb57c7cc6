//! Print the invoice contained in a CII XML file or a hybrid PDF.
//!
//! ```text
//! RUST_LOG=einvoice=debug cargo run --example extract -- invoice.pdf
//! ```

use einvoice::{EInvoice, ExtractionError};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: extract <invoice.xml|invoice.pdf>");
        std::process::exit(2);
    };
    let bytes = std::fs::read(&path).expect("read input file");

    let result = if bytes.starts_with(b"%PDF") {
        EInvoice::from_pdf(&bytes)
    } else {
        EInvoice::from_xml(&bytes)
    };

    let invoice = match result {
        Ok(invoice) => invoice,
        Err(ExtractionError::AttachmentNotFound) => {
            eprintln!("{path}: PDF carries no invoice XML");
            std::process::exit(1);
        }
        Err(e) => {
            match e.location() {
                Some(at) => eprintln!("{path}: {e} (at {at})"),
                None => eprintln!("{path}: {e}"),
            }
            std::process::exit(1);
        }
    };

    let data = invoice.data();
    match invoice.profile() {
        Ok(profile) => println!("Profile:   {profile}"),
        Err(_) => println!("Profile:   {} (unknown)", data.meta.specification_profile),
    }
    println!("Invoice:   {} ({}) of {}", data.document_id, data.document_type, data.document_date);
    println!("Seller:    {}", data.seller.name);
    println!("Buyer:     {}", data.buyer.name);

    if let Some(tx) = &data.transaction {
        for line in &tx.positions {
            println!(
                "  {:>4}  {:<30} {:>10} {:<4} {:>12}",
                line.line_id, line.name, line.quantity, line.unit_code, line.total
            );
        }
        for tax in &tx.taxes {
            println!("  {} {}% on {}: {}", tax.tax_type, tax.tax_percent, tax.total_net, tax.tax_amount);
        }
        println!("Net:       {} {}", tx.total_net, tx.currency);
        println!("VAT:       {} {}", tx.total_vat, tx.currency);
        println!("Gross:     {} {}", tx.total_gross, tx.currency);
        if let Some(payable) = tx.total_payable {
            println!("Payable:   {payable} {}", tx.currency);
        }
    }

    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(data).expect("serialize invoice data")
    );
}
