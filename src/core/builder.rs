use rust_decimal::Decimal;

use super::error::Diagnostics;
use super::types::*;

/// Builder for candidate invoice records.
///
/// The builder performs no validation; hand the result to
/// [`Engine::validate`](crate::engine::Engine::validate).
///
/// ```
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
///
/// let candidate = InvoiceRecordBuilder::new("F-2024-001", "2024-06-15", dec!(97.55))
///     .recipient("Louisiana Lobstershack BV")
///     .primary_supplier("Acme B.V.")
///     .citation("Totaal €  97,55")
///     .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
///     .build();
///
/// assert_eq!(candidate.suppliers.len(), 1);
/// ```
pub struct InvoiceRecordBuilder {
    invoice_number: String,
    invoice_date: String,
    due_date: Option<String>,
    currency: String,
    recipient: String,
    method_of_payment: PaymentMethod,
    primary_supplier: String,
    details_supplier: IssuerDetails,
    suppliers: Vec<SupplierLedger>,
    null_tax_base: Option<Decimal>,
    low_tax_base: Option<Decimal>,
    high_tax_base: Option<Decimal>,
    low_tax: Option<Decimal>,
    high_tax: Option<Decimal>,
    amount_excl_tax: Option<Decimal>,
    packaging_deposit: Option<Decimal>,
    adjustment: Option<Adjustment>,
    citation: String,
    amount_payable: Decimal,
    error_handling: Diagnostics,
}

impl InvoiceRecordBuilder {
    pub fn new(
        invoice_number: impl Into<String>,
        invoice_date: impl Into<String>,
        amount_payable: Decimal,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            invoice_date: invoice_date.into(),
            due_date: None,
            currency: "EUR".to_string(),
            recipient: String::new(),
            method_of_payment: PaymentMethod::OnlineBanking,
            primary_supplier: String::new(),
            details_supplier: IssuerDetails::default(),
            suppliers: Vec::new(),
            null_tax_base: None,
            low_tax_base: None,
            high_tax_base: None,
            low_tax: None,
            high_tax: None,
            amount_excl_tax: None,
            packaging_deposit: None,
            adjustment: None,
            citation: String::new(),
            amount_payable,
            error_handling: Diagnostics::default(),
        }
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn recipient(mut self, name: impl Into<String>) -> Self {
        self.recipient = name.into();
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.method_of_payment = method;
        self
    }

    pub fn primary_supplier(mut self, name: impl Into<String>) -> Self {
        self.primary_supplier = name.into();
        self
    }

    pub fn issuer(mut self, details: IssuerDetails) -> Self {
        self.details_supplier = details;
        self
    }

    pub fn add_supplier(mut self, ledger: SupplierLedger) -> Self {
        self.suppliers.push(ledger);
        self
    }

    /// Aggregate bases over all suppliers (null, low, high).
    pub fn aggregate_bases(
        mut self,
        null: Option<Decimal>,
        low: Option<Decimal>,
        high: Option<Decimal>,
    ) -> Self {
        self.null_tax_base = null;
        self.low_tax_base = low;
        self.high_tax_base = high;
        self
    }

    /// Aggregate tax amounts over all suppliers (low, high).
    pub fn aggregate_taxes(mut self, low: Option<Decimal>, high: Option<Decimal>) -> Self {
        self.low_tax = low;
        self.high_tax = high;
        self
    }

    pub fn amount_excl_tax(mut self, amount: Decimal) -> Self {
        self.amount_excl_tax = Some(amount);
        self
    }

    pub fn packaging_deposit(mut self, amount: Decimal) -> Self {
        self.packaging_deposit = Some(amount);
        self
    }

    pub fn adjustment(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }

    pub fn error_handling(mut self, diagnostics: Diagnostics) -> Self {
        self.error_handling = diagnostics;
        self
    }

    pub fn build(self) -> InvoiceRecord {
        InvoiceRecord {
            error_handling: self.error_handling,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            currency: self.currency,
            recipient: self.recipient,
            method_of_payment: self.method_of_payment,
            primary_supplier: self.primary_supplier,
            details_supplier: self.details_supplier,
            suppliers: self.suppliers,
            null_tax_base: self.null_tax_base,
            low_tax_base: self.low_tax_base,
            high_tax_base: self.high_tax_base,
            low_tax: self.low_tax,
            high_tax: self.high_tax,
            amount_excl_tax: self.amount_excl_tax,
            packaging_deposit: self.packaging_deposit,
            adjustment: self.adjustment,
            amount_payable_citation: self.citation,
            amount_payable: self.amount_payable,
        }
    }
}

/// Builder for per-supplier ledgers.
#[derive(Default)]
pub struct SupplierLedgerBuilder {
    ledger: SupplierLedger,
}

impl SupplierLedgerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.ledger.supplier = Some(name.into());
        self
    }

    pub fn null_base(mut self, base: Decimal) -> Self {
        self.ledger.null_tax_base = Some(base);
        self
    }

    /// Low-rate base and tax.
    pub fn low(mut self, base: Decimal, tax: Decimal) -> Self {
        self.ledger.low_tax_base = Some(base);
        self.ledger.low_tax = Some(tax);
        self
    }

    pub fn low_base(mut self, base: Decimal) -> Self {
        self.ledger.low_tax_base = Some(base);
        self
    }

    pub fn low_tax(mut self, tax: Decimal) -> Self {
        self.ledger.low_tax = Some(tax);
        self
    }

    /// High-rate base and tax.
    pub fn high(mut self, base: Decimal, tax: Decimal) -> Self {
        self.ledger.high_tax_base = Some(base);
        self.ledger.high_tax = Some(tax);
        self
    }

    pub fn high_base(mut self, base: Decimal) -> Self {
        self.ledger.high_tax_base = Some(base);
        self
    }

    pub fn high_tax(mut self, tax: Decimal) -> Self {
        self.ledger.high_tax = Some(tax);
        self
    }

    pub fn amount_excl_tax(mut self, amount: Decimal) -> Self {
        self.ledger.amount_excl_tax = Some(amount);
        self
    }

    pub fn rationale(mut self, text: impl Into<String>) -> Self {
        self.ledger.rationale = Some(text.into());
        self
    }

    pub fn build(self) -> SupplierLedger {
        self.ledger
    }
}
