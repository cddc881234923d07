//! # factuur
//!
//! Financial consistency engine for invoice data proposed by an upstream
//! extraction step (OCR plus a generative model). Given the source document
//! text and a candidate record, the engine normalizes names and identifiers,
//! cross-checks VAT bases against taxes, verifies that the cited total is a
//! genuine quote showing the payable amount, and reconciles the payable
//! amount against the resolved ledgers.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Failures are returned as framed diagnostics that can be fed back to the
//! generator verbatim.
//!
//! ## Quick Start
//!
//! ```rust
//! use factuur::core::*;
//! use factuur::engine::Engine;
//! use rust_decimal_macros::dec;
//!
//! let document = "Subtotaal 89,55\nBTW 9% 8,05\nTotaal €  97,55";
//! let candidate = InvoiceRecordBuilder::new("F-2024-001", "2024-06-15", dec!(97.55))
//!     .recipient("louisiana")
//!     .primary_supplier("acme b.v.")
//!     .citation("Totaal €  97,55")
//!     .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
//!     .build();
//!
//! let accepted = Engine::default().validate(document, candidate).unwrap();
//! assert_eq!(accepted.record.primary_supplier, "Acme BV");
//!
//! let rejected = InvoiceRecordBuilder::new("F-2024-001", "2024-06-15", dec!(120.00))
//!     .citation("Totaal €  97,55")
//!     .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
//!     .build();
//! let rejection = Engine::default().validate(document, rejected).unwrap_err();
//! assert_eq!(rejection.id(), "amount_payable_mismatch");
//! assert!(rejection.feedback().starts_with("#####START_VALUE_ERROR_MESSAGE#####"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, diagnostics, every validation stage, retry driver |
//! | `json` | JSON request/response contract |
//! | `gate` | Async admission gate for in-flight attempts |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod normalize;

#[cfg(feature = "core")]
pub mod identifier;

#[cfg(feature = "core")]
pub mod tax;

#[cfg(feature = "core")]
pub mod citation;

#[cfg(feature = "core")]
pub mod reconcile;

#[cfg(feature = "core")]
pub mod engine;

#[cfg(feature = "core")]
pub mod retry;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "gate")]
pub mod gate;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
