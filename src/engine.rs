//! The consistency pipeline.
//!
//! [`Engine::validate`] takes the source document text and a candidate
//! record and either returns the normalized, resolved record or a
//! [`Rejection`] carrying exactly one framed finding. Stages run in a fixed
//! order and the first hard failure stops the pipeline:
//!
//! 1. self-reported diagnostics consistency
//! 2. amount magnitudes, date formats, adjustment sign
//! 3. field normalization
//! 4. issuer identifiers
//! 5. per-supplier ledgers: non-negativity, tax pairs, excl.-tax amount
//! 6. empty suppliers dropped, aggregate excl.-tax amount checked
//! 7. citation
//! 8. payable reconciliation
//!
//! The engine is stateless; one instance can be shared across threads.

use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;

use crate::citation::{CitationMatch, verify_citation};
use crate::core::money::MAX_AMOUNT;
use crate::core::{
    DATE_FORMAT, Diagnostics, EngineConfig, Finding, InvoiceRecord, Rejection, SupplierLedger,
    ValueError,
};
use crate::identifier::validate_issuer;
use crate::normalize::{
    normalize_currency, normalize_entity_name, normalize_primary_supplier, normalize_recipient,
};
use crate::reconcile::{Reconciliation, check_aggregate_excl_tax, check_non_negative, reconcile};
use crate::tax::{resolve_ledger, settle_excl_tax};

/// A record that passed every hard rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    /// The normalized and resolved record; `error_handling` is empty.
    pub record: InvoiceRecord,
    /// Soft findings: the generator's own reports first, then tax-pair
    /// mismatches. The same mismatch text is also in the supplier rationale.
    pub warnings: Vec<Finding>,
    /// How the citation was found.
    pub citation: CitationMatch,
    /// Which candidate sum explained the payable amount.
    pub reconciliation: Reconciliation,
}

/// Invoice financial consistency engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `candidate` against `source_text`.
    ///
    /// ```
    /// use factuur::core::*;
    /// use factuur::engine::Engine;
    /// use rust_decimal_macros::dec;
    ///
    /// let candidate = InvoiceRecordBuilder::new("F-1", "2024-06-15", dec!(97.55))
    ///     .recipient("lobstershack")
    ///     .primary_supplier("acme b.v.")
    ///     .citation("Totaal €  97,55")
    ///     .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
    ///     .build();
    ///
    /// let accepted = Engine::default()
    ///     .validate("Subtotaal 89,55\nBTW 8,05\nTotaal €  97,55", candidate)
    ///     .unwrap();
    /// assert_eq!(accepted.record.primary_supplier, "Acme BV");
    /// assert_eq!(accepted.record.recipient, "Louisiana Lobstershack BV");
    /// ```
    pub fn validate(
        &self,
        source_text: &str,
        candidate: InvoiceRecord,
    ) -> Result<Accepted, Rejection> {
        debug!(
            "validating invoice '{}' with {} supplier(s)",
            candidate.invoice_number,
            candidate.suppliers.len()
        );
        self.run(source_text, candidate).map_err(|err| {
            debug!("invoice rejected by rule '{}' on '{}'", err.id, err.field);
            Rejection::from(err)
        })
    }

    fn run(&self, source_text: &str, candidate: InvoiceRecord) -> Result<Accepted, ValueError> {
        let config = &self.config;

        let mut warnings = self_reported(&candidate.error_handling)?;
        check_magnitudes(&candidate)?;
        check_dates(&candidate)?;
        check_adjustment(&candidate)?;

        let details_supplier = validate_issuer(&candidate.details_supplier, config)?;

        check_non_negative(&candidate.suppliers)?;
        let mut suppliers = Vec::with_capacity(candidate.suppliers.len());
        for (index, ledger) in candidate.suppliers.iter().enumerate() {
            let resolution = resolve_ledger(ledger, config);
            for (tier, mismatch) in &resolution.mismatches {
                let warning = ValueError::new(
                    "tax_rate_mismatch",
                    format!("suppliers[{index}].{}_tax", tier.name()),
                    mismatch.warning(tier.name()),
                );
                warnings.push(Finding::from(warning));
            }
            let mut settled = settle_excl_tax(resolution.ledger, index, config.excl_tax_tolerance)?;
            settled.supplier = settled.supplier.as_deref().map(normalize_entity_name);
            suppliers.push(settled);
        }
        suppliers.retain(|s: &SupplierLedger| !s.is_empty());

        let record = InvoiceRecord {
            error_handling: Diagnostics::new(),
            currency: normalize_currency(&candidate.currency),
            recipient: normalize_recipient(&candidate.recipient, config),
            primary_supplier: normalize_primary_supplier(&candidate.primary_supplier, config),
            details_supplier,
            suppliers,
            ..candidate
        };

        check_aggregate_excl_tax(&record, config.aggregate_excl_tax_tolerance)?;

        let citation = verify_citation(
            &record.amount_payable_citation,
            source_text,
            record.amount_payable,
            config,
        )?;

        let reconciliation = reconcile(&record, config.payable_tolerance)?;
        debug!(
            "amount payable {} reconciled via tier {} (sum {}, difference {})",
            record.amount_payable,
            reconciliation.tier,
            reconciliation.sum,
            reconciliation.difference
        );

        info!(
            "invoice '{}' accepted with {} warning(s)",
            record.invoice_number,
            warnings.len()
        );
        Ok(Accepted {
            record,
            warnings,
            citation,
            reconciliation,
        })
    }
}

/// Validate with the default configuration.
pub fn validate_invoice(
    source_text: &str,
    candidate: InvoiceRecord,
) -> Result<Accepted, Rejection> {
    Engine::default().validate(source_text, candidate)
}

// The generator's own error report must be internally consistent. Reported
// findings are carried forward as warnings.
fn self_reported(diagnostics: &Diagnostics) -> Result<Vec<Finding>, ValueError> {
    match (diagnostics.has_errors, diagnostics.findings.is_empty()) {
        (true, true) => Err(ValueError::new(
            "missing_error_details",
            "error_handling",
            "'has_errors' is true but no errors were provided.\n\
             When 'has_errors' is true, at least one error must be provided.",
        )
        .with_remedy("Provide the exact error message and an analysis for every error raised.")),
        (false, false) => Err(ValueError::new(
            "inconsistent_error_handling",
            "error_handling",
            format!(
                "'has_errors' is false but {} error(s) were provided.\n\
                 Set 'has_errors' to true whenever an error is reported.",
                diagnostics.findings.len()
            ),
        )),
        _ => Ok(diagnostics.findings.clone()),
    }
}

fn check_magnitudes(record: &InvoiceRecord) -> Result<(), ValueError> {
    let mut amounts: Vec<(String, Decimal)> =
        vec![("amount_payable".to_string(), record.amount_payable)];
    let aggregates = [
        ("null_tax_base", record.null_tax_base),
        ("low_tax_base", record.low_tax_base),
        ("high_tax_base", record.high_tax_base),
        ("low_tax", record.low_tax),
        ("high_tax", record.high_tax),
        ("amount_excl_tax", record.amount_excl_tax),
        ("total_emballage", record.packaging_deposit),
        ("discount.discount_amount", record.adjustment.as_ref().map(|a| a.amount)),
    ];
    amounts.extend(
        aggregates
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field.to_string(), v))),
    );
    for (index, ledger) in record.suppliers.iter().enumerate() {
        amounts.extend(ledger.amounts().into_iter().filter_map(|(field, value)| {
            value.map(|v| (format!("suppliers[{index}].{field}"), v))
        }));
    }

    match amounts.into_iter().find(|(_, v)| v.abs() > MAX_AMOUNT) {
        Some((field, value)) => Err(ValueError::new(
            "amount_out_of_range",
            field.clone(),
            format!(
                "The value {value} for {field} is not a plausible invoice amount \
                 (limit {MAX_AMOUNT})."
            ),
        )),
        None => Ok(()),
    }
}

fn check_dates(record: &InvoiceRecord) -> Result<(), ValueError> {
    let dates = [
        ("invoice_date", Some(record.invoice_date.as_str())),
        ("due_date", record.due_date.as_deref()),
    ];
    for (field, value) in dates {
        let Some(value) = value else { continue };
        if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
            return Err(ValueError::new(
                "invalid_date_format",
                field,
                format!("Date {value} is not in ISO 8601 format (YYYY-MM-DD)."),
            ));
        }
    }
    Ok(())
}

fn check_adjustment(record: &InvoiceRecord) -> Result<(), ValueError> {
    match &record.adjustment {
        Some(adj) if adj.amount >= Decimal::ZERO => Err(ValueError::new(
            "invalid_adjustment_amount",
            "discount.discount_amount",
            format!(
                "The {} amount {} must be negative. Adjustments always reduce the amount payable.",
                adj.kind.as_str(),
                adj.amount
            ),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Adjustment, AdjustmentKind, InvoiceRecordBuilder, SupplierLedgerBuilder};
    use crate::reconcile::Tier;
    use rust_decimal_macros::dec;

    const DOC: &str = "Factuur F-1\nSubtotaal 89,55\nBTW 9% 8,05\nTotaal €  97,55";

    fn candidate() -> InvoiceRecordBuilder {
        InvoiceRecordBuilder::new("F-1", "2024-06-15", dec!(97.55))
            .recipient("Bar Bonds")
            .primary_supplier("acme b.v.")
            .citation("Totaal €  97,55")
            .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
    }

    fn rejected_id(record: InvoiceRecord) -> String {
        Engine::default().validate(DOC, record).unwrap_err().id().to_string()
    }

    #[test]
    fn accepts_consistent_record() {
        let accepted = Engine::default().validate(DOC, candidate().build()).unwrap();
        assert_eq!(accepted.reconciliation.tier, Tier::BaseAndTax);
        assert!(accepted.warnings.is_empty());
        assert!(!accepted.record.error_handling.has_errors);
        assert_eq!(accepted.record.suppliers[0].amount_excl_tax, Some(dec!(89.55)));
    }

    #[test]
    fn magnitude_guard() {
        let rec = candidate()
            .add_supplier(SupplierLedgerBuilder::new().high_base(dec!(10000000000000000)).build())
            .build();
        let err = Engine::default().validate(DOC, rec).unwrap_err();
        assert_eq!(err.id(), "amount_out_of_range");
        assert!(err.feedback().contains("suppliers[1].high_tax_base"));
    }

    #[test]
    fn bad_dates() {
        assert_eq!(
            rejected_id(InvoiceRecordBuilder::new("F-1", "15-06-2024", dec!(97.55)).build()),
            "invalid_date_format"
        );
        assert_eq!(rejected_id(candidate().due_date("2024-02-30").build()), "invalid_date_format");
    }

    #[test]
    fn positive_adjustment_rejected() {
        let rec = candidate()
            .adjustment(Adjustment::new(AdjustmentKind::Discount, dec!(5)))
            .build();
        assert_eq!(rejected_id(rec), "invalid_adjustment_amount");
    }

    #[test]
    fn self_reported_findings_become_warnings() {
        let mut reported = Diagnostics::new();
        reported.push(ValueError::new("unclear_total", "amount_payable", "Total is smudged."));
        let accepted = Engine::default()
            .validate(DOC, candidate().error_handling(reported).build())
            .unwrap();
        assert_eq!(accepted.warnings.len(), 1);
        assert_eq!(accepted.warnings[0].id, "unclear_total");
        assert_eq!(accepted.record.error_handling, Diagnostics::new());
    }

    #[test]
    fn inconsistent_self_report_rejected() {
        let missing = Diagnostics {
            has_errors: true,
            findings: Vec::new(),
        };
        assert_eq!(
            rejected_id(candidate().error_handling(missing).build()),
            "missing_error_details"
        );

        let mut unflagged = Diagnostics::new();
        unflagged.push(ValueError::new("x", "y", "z"));
        unflagged.has_errors = false;
        assert_eq!(
            rejected_id(candidate().error_handling(unflagged).build()),
            "inconsistent_error_handling"
        );
    }

    #[test]
    fn empty_suppliers_dropped() {
        let rec = candidate()
            .add_supplier(SupplierLedgerBuilder::new().name("Ghost").rationale("nothing").build())
            .build();
        let accepted = Engine::default().validate(DOC, rec).unwrap();
        assert_eq!(accepted.record.suppliers.len(), 1);
    }

    #[test]
    fn supplier_names_normalized() {
        let rec = InvoiceRecordBuilder::new("F-1", "2024-06-15", dec!(97.55))
            .citation("Totaal €  97,55")
            .add_supplier(
                SupplierLedgerBuilder::new()
                    .name("bakkerij de graaf b.v.")
                    .low(dec!(89.55), dec!(8.05))
                    .build(),
            )
            .build();
        let accepted = Engine::default().validate(DOC, rec).unwrap();
        assert_eq!(accepted.record.suppliers[0].supplier.as_deref(), Some("Bakkerij De Graaf BV"));
    }
}
