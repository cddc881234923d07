use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::Diagnostics;
use super::money::sum_present;

/// ISO-8601 calendar date format accepted for invoice dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extracted invoice: the candidate proposed by the upstream generator and,
/// once accepted, the validated record.
///
/// Field names serialize to the candidate schema the generator fills in, so a
/// record round-trips through the same JSON shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Errors the generator reported about its own attempt.
    #[serde(default)]
    pub error_handling: Diagnostics,
    /// Invoice identifier as printed on the document.
    pub invoice_number: String,
    /// Issuance date, ISO-8601 (`YYYY-MM-DD`).
    pub invoice_date: String,
    /// Due date, ISO-8601 (`YYYY-MM-DD`).
    #[serde(default)]
    pub due_date: Option<String>,
    /// Currency code (ISO 4217, e.g. "EUR").
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Name of the invoice recipient.
    pub recipient: String,
    /// How the invoice is (to be) paid.
    pub method_of_payment: PaymentMethod,
    /// Name of the issuer of the invoice.
    pub primary_supplier: String,
    /// Key information about the issuer.
    #[serde(default)]
    pub details_supplier: IssuerDetails,
    /// Per-supplier financial facts.
    #[serde(default)]
    pub suppliers: Vec<SupplierLedger>,
    /// Aggregate base for the 0% rate.
    #[serde(default)]
    pub null_tax_base: Option<Decimal>,
    /// Aggregate base for the 9% rate.
    #[serde(default)]
    pub low_tax_base: Option<Decimal>,
    /// Aggregate base for the 21% rate.
    #[serde(default)]
    pub high_tax_base: Option<Decimal>,
    /// Aggregate 9% VAT amount.
    #[serde(default)]
    pub low_tax: Option<Decimal>,
    /// Aggregate 21% VAT amount.
    #[serde(default)]
    pub high_tax: Option<Decimal>,
    /// Aggregate amount excluding tax.
    #[serde(default)]
    pub amount_excl_tax: Option<Decimal>,
    /// Net packaging deposit (emballage/statiegeld) added to or deducted from the payable amount.
    #[serde(default, rename = "total_emballage")]
    pub packaging_deposit: Option<Decimal>,
    /// Discount, credit, deduction or deposit adjustment.
    #[serde(default, rename = "discount")]
    pub adjustment: Option<Adjustment>,
    /// Verbatim quote from the document showing the payable amount.
    pub amount_payable_citation: String,
    /// Declared amount payable.
    pub amount_payable: Decimal,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl InvoiceRecord {
    /// Parsed issuance date, if it is well-formed.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.invoice_date, DATE_FORMAT).ok()
    }

    /// Parsed due date, if present and well-formed.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
    }
}

/// Financial facts for one supplier on the invoice.
///
/// Two fixed VAT rates apply: low = 9%, high = 21%. The null base is exempt
/// and never taxed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierLedger {
    /// Supplier name, when the invoice distinguishes several.
    #[serde(default)]
    pub supplier: Option<String>,
    /// Base amount for the 0% rate.
    #[serde(default)]
    pub null_tax_base: Option<Decimal>,
    /// Base amount for the 9% rate.
    #[serde(default)]
    pub low_tax_base: Option<Decimal>,
    /// 9% VAT amount.
    #[serde(default)]
    pub low_tax: Option<Decimal>,
    /// Base amount for the 21% rate.
    #[serde(default)]
    pub high_tax_base: Option<Decimal>,
    /// 21% VAT amount.
    #[serde(default)]
    pub high_tax: Option<Decimal>,
    /// Total amount excluding tax.
    #[serde(default)]
    pub amount_excl_tax: Option<Decimal>,
    /// Free-text reasoning; soft consistency warnings are appended here.
    #[serde(default, rename = "observation", alias = "rationale")]
    pub rationale: Option<String>,
}

impl SupplierLedger {
    /// Display label used in diagnostics.
    pub fn label(&self, index: usize) -> String {
        match &self.supplier {
            Some(name) if !name.trim().is_empty() => format!("'{name}'"),
            _ => format!("#{}", index + 1),
        }
    }

    /// Every financial field with its schema name.
    pub fn amounts(&self) -> [(&'static str, Option<Decimal>); 6] {
        [
            ("null_tax_base", self.null_tax_base),
            ("low_tax_base", self.low_tax_base),
            ("low_tax", self.low_tax),
            ("high_tax_base", self.high_tax_base),
            ("high_tax", self.high_tax),
            ("amount_excl_tax", self.amount_excl_tax),
        ]
    }

    /// True when no financial field carries a value.
    pub fn is_empty(&self) -> bool {
        self.amounts().iter().all(|(_, v)| v.is_none())
    }

    /// Sum of the null, low and high bases (absent bases count as zero).
    pub fn base_total(&self) -> Decimal {
        sum_present([self.null_tax_base, self.low_tax_base, self.high_tax_base])
    }

    /// Sum of the low and high tax amounts (absent amounts count as zero).
    pub fn tax_total(&self) -> Decimal {
        sum_present([self.low_tax, self.high_tax])
    }

    /// Append a line to the rationale, returning the updated ledger.
    pub fn with_note(mut self, note: &str) -> Self {
        self.rationale = Some(match self.rationale.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{note}"),
            _ => note.to_string(),
        });
        self
    }
}

/// Business details of the invoice issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDetails {
    /// Issuer email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Physical address.
    #[serde(default)]
    pub address: Option<String>,
    /// Issuer IBAN.
    #[serde(default)]
    pub iban: Option<String>,
    /// VAT (BTW) identifier, e.g. "NL123456789B01".
    #[serde(default)]
    pub vat_id: Option<String>,
    /// Chamber of Commerce (KvK) registration number.
    #[serde(default)]
    pub kvk: Option<String>,
}

/// Fixed set of payment methods the downstream bookkeeping understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// "Diversen", anything not covered below.
    #[serde(rename = "Diversen")]
    Miscellaneous,
    /// "Ideal".
    #[serde(rename = "Ideal")]
    Ideal,
    /// "Incasso" (direct debit).
    #[serde(rename = "Incasso")]
    DirectDebit,
    /// "Online Bankieren".
    #[serde(rename = "Online Bankieren")]
    OnlineBanking,
    /// "Betaalautomaat" (card terminal).
    #[serde(rename = "Betaalautomaat")]
    PaymentTerminal,
    /// "Paypal".
    #[serde(rename = "Paypal")]
    Paypal,
    /// "Credit Card".
    #[serde(rename = "Credit Card")]
    CreditCard,
}

impl PaymentMethod {
    /// Label as it appears in the candidate schema.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Miscellaneous => "Diversen",
            Self::Ideal => "Ideal",
            Self::DirectDebit => "Incasso",
            Self::OnlineBanking => "Online Bankieren",
            Self::PaymentTerminal => "Betaalautomaat",
            Self::Paypal => "Paypal",
            Self::CreditCard => "Credit Card",
        }
    }

    /// Parse from the schema label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::Miscellaneous,
            Self::Ideal,
            Self::DirectDebit,
            Self::OnlineBanking,
            Self::PaymentTerminal,
            Self::Paypal,
            Self::CreditCard,
        ]
        .into_iter()
        .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// Document-level adjustment to the payable amount.
///
/// The amount is always strictly negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// What kind of adjustment this is.
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    /// Amount of the adjustment (< 0).
    #[serde(rename = "discount_amount")]
    pub amount: Decimal,
    /// Reason given on the invoice.
    #[serde(default)]
    pub reason: Option<String>,
}

impl Adjustment {
    pub fn new(kind: AdjustmentKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Kind of [`Adjustment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Price discount.
    Discount,
    /// Credit from an earlier invoice.
    Credit,
    /// Other deduction.
    Deduction,
    /// Packaging returned (emballage).
    #[serde(rename = "emballage", alias = "packaging_deposit")]
    PackagingDeposit,
    /// Container deposit refund (statiegeld).
    #[serde(rename = "statiegeld", alias = "deposit_refund")]
    DepositRefund,
}

impl AdjustmentKind {
    /// Schema tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discount => "discount",
            Self::Credit => "credit",
            Self::Deduction => "deduction",
            Self::PackagingDeposit => "emballage",
            Self::DepositRefund => "statiegeld",
        }
    }

    /// Deposit-type adjustments belong to the packaging-deposit slot, not the discount slot.
    pub fn is_deposit(&self) -> bool {
        match self {
            Self::Discount | Self::Credit | Self::Deduction => false,
            Self::PackagingDeposit | Self::DepositRefund => true,
        }
    }
}
