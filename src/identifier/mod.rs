//! Issuer identifier validation: IBAN exclusion, VAT identifier formats,
//! email and KvK number.
//!
//! # Example
//!
//! ```
//! use factuur::core::{EngineConfig, IssuerDetails};
//! use factuur::identifier::validate_issuer;
//!
//! let details = IssuerDetails {
//!     vat_id: Some("nl 123456789 b01".into()),
//!     iban: Some("NL91ABNA0417164300".into()),
//!     ..Default::default()
//! };
//! let checked = validate_issuer(&details, &EngineConfig::default()).unwrap();
//! assert_eq!(checked.vat_id.as_deref(), Some("NL123456789B01"));
//! ```

mod contact;
mod iban;
mod vat_id;

pub use contact::{validate_email, validate_kvk};
pub use iban::check_iban;
pub use vat_id::{clean_vat_id, known_vat_countries, validate_vat_id};

use crate::core::{EngineConfig, IssuerDetails, ValueError};

/// Validate every present issuer identifier, returning the details with
/// normalized identifiers. Blank values are left as they are.
pub fn validate_issuer(
    details: &IssuerDetails,
    config: &EngineConfig,
) -> Result<IssuerDetails, ValueError> {
    if let Some(iban) = present(&details.iban) {
        check_iban(iban, &config.excluded_ibans)?;
    }

    let vat_id = match present(&details.vat_id) {
        Some(v) => Some(validate_vat_id(v)?),
        None => details.vat_id.clone(),
    };
    let email = match present(&details.email) {
        Some(e) => Some(validate_email(e)?),
        None => details.email.clone(),
    };
    let kvk = match present(&details.kvk) {
        Some(k) => Some(validate_kvk(k)?),
        None => details.kvk.clone(),
    };

    Ok(IssuerDetails {
        email,
        address: details.address.clone(),
        iban: details.iban.clone(),
        vat_id,
        kvk,
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
