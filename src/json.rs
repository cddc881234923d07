//! JSON input and output contract.
//!
//! Requests arrive as `{ "source_document_text": .., "candidate": {..} }`
//! where the candidate uses the extraction schema field names
//! (`total_emballage`, `discount`, `observation`, `error_handling.errors`).
//! Accepted records are returned in the same shape.
//!
//! ```
//! use factuur::engine::Engine;
//! use factuur::json::validate_json;
//!
//! let request = r#"{
//!   "source_document_text": "Totaal €  97,55",
//!   "candidate": {
//!     "invoice_number": "F-1",
//!     "invoice_date": "2024-06-15",
//!     "currency": "EURO",
//!     "recipient": "Louisiana",
//!     "method_of_payment": "Ideal",
//!     "primary_supplier": "acme b.v.",
//!     "suppliers": [{ "low_tax_base": "89.55", "low_tax": "8.05" }],
//!     "amount_payable_citation": "Totaal €  97,55",
//!     "amount_payable": "97.55"
//!   }
//! }"#;
//!
//! let accepted = validate_json(&Engine::default(), request).unwrap();
//! assert!(accepted.contains(r#""currency":"EUR""#));
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, InvoiceRecord};
use crate::engine::{Accepted, Engine};

/// Input contract of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Text of the source document as produced by the OCR layer.
    pub source_document_text: String,
    /// Candidate record proposed by the generator.
    pub candidate: InvoiceRecord,
}

impl ExtractionRequest {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the request through `engine`.
    pub fn validate(self, engine: &Engine) -> Result<Accepted, EngineError> {
        Ok(engine.validate(&self.source_document_text, self.candidate)?)
    }
}

/// Parse `json` as an [`ExtractionRequest`], validate it and return the
/// accepted record as JSON.
pub fn validate_json(engine: &Engine, json: &str) -> Result<String, EngineError> {
    let accepted = ExtractionRequest::from_json(json)?.validate(engine)?;
    Ok(serde_json::to_string(&accepted.record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_is_json_error() {
        let err = validate_json(&Engine::default(), "{").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn rejection_passes_through() {
        let request = r#"{
            "source_document_text": "Totaal 10,00",
            "candidate": {
                "invoice_number": "F-1",
                "invoice_date": "2024/06/15",
                "recipient": "x",
                "method_of_payment": "Diversen",
                "primary_supplier": "y",
                "amount_payable_citation": "Totaal 10,00",
                "amount_payable": "10.00"
            }
        }"#;
        let err = validate_json(&Engine::default(), request).unwrap_err();
        let EngineError::Rejected(rejection) = err else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.id(), "invalid_date_format");
    }
}
