use factuur::core::*;
use factuur::engine::Engine;
use factuur::retry::{RetryPolicy, extract_with_retries};
use rust_decimal_macros::dec;

const RECEIPT: &str = "\
HORECA GROOTHANDEL
Subtotaal excl. BTW               89,55
BTW 9%                             8,05
Emballage                          3,20
Totaal €  100,80
";

#[derive(Debug, thiserror::Error)]
#[error("generator offline")]
struct Offline;

fn main() {
    let engine = Engine::default();

    // A generator that misreads the subtotal as the payable amount on its
    // first try and corrects itself once it sees the diagnostics.
    let mut attempts = 0;
    let mut generator = |_: &str, feedback: Option<&str>| -> Result<InvoiceRecord, Offline> {
        attempts += 1;
        if let Some(text) = feedback {
            println!("feedback for attempt {attempts}:\n{text}\n");
        }
        let (payable, citation) = match feedback {
            None => (dec!(89.55), "Subtotaal excl. BTW               89,55"),
            Some(_) => (dec!(100.80), "Totaal €  100,80"),
        };
        Ok(InvoiceRecordBuilder::new("0042", "2024-06-15", payable)
            .currency("EURO")
            .recipient("step into liquid")
            .payment_method(PaymentMethod::PaymentTerminal)
            .primary_supplier("HORECA GROOTHANDEL b.v.")
            .add_supplier(SupplierLedgerBuilder::new().low_base(dec!(89.55)).build())
            .packaging_deposit(dec!(3.20))
            .citation(citation)
            .build())
    };

    match extract_with_retries(&engine, &mut generator, RECEIPT, RetryPolicy::default()) {
        Ok(accepted) => {
            println!("Accepted invoice {}", accepted.record.invoice_number);
            println!("  supplier:  {}", accepted.record.primary_supplier);
            println!("  recipient: {}", accepted.record.recipient);
            println!(
                "  low VAT:   {}",
                accepted.record.suppliers[0].low_tax.unwrap_or_default()
            );
            println!(
                "  matched:   {} (difference {})",
                accepted.reconciliation.tier, accepted.reconciliation.difference
            );
            for warning in &accepted.warnings {
                println!("  warning:   {}", warning.analysis);
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
