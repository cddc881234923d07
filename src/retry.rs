//! Retry driver around the candidate generator.
//!
//! The engine has no memory between attempts. When a candidate is rejected,
//! the diagnostics text is handed back to the generator as corrective
//! context and a fresh candidate is validated, up to a fixed budget.

use log::warn;

use crate::core::{EngineError, InvoiceRecord};
use crate::engine::{Accepted, Engine};

/// Proposes candidate records for a source document.
///
/// `feedback` is `None` on the first attempt and the framed diagnostics of
/// the previous rejection afterwards.
pub trait CandidateSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn propose(
        &mut self,
        source_text: &str,
        feedback: Option<&str>,
    ) -> Result<InvoiceRecord, Self::Error>;
}

impl<F, E> CandidateSource for F
where
    F: FnMut(&str, Option<&str>) -> Result<InvoiceRecord, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn propose(&mut self, source_text: &str, feedback: Option<&str>) -> Result<InvoiceRecord, E> {
        self(source_text, feedback)
    }
}

/// How many candidates to validate before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

/// Ask `source` for candidates until one is accepted or the budget runs out.
///
/// A generator failure is returned immediately as [`EngineError::Source`];
/// only rejections are retried.
pub fn extract_with_retries<S: CandidateSource>(
    engine: &Engine,
    source: &mut S,
    source_text: &str,
    policy: RetryPolicy,
) -> Result<Accepted, EngineError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut feedback: Option<String> = None;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let candidate = source
            .propose(source_text, feedback.as_deref())
            .map_err(|e| EngineError::Source(Box::new(e)))?;

        match engine.validate(source_text, candidate) {
            Ok(accepted) => return Ok(accepted),
            Err(rejection) if attempt >= max_attempts => {
                warn!(
                    "attempt {attempt}/{max_attempts} rejected by '{}', giving up",
                    rejection.id()
                );
                return Err(EngineError::Exhausted {
                    attempts: attempt,
                    last: rejection,
                });
            }
            Err(rejection) => {
                warn!(
                    "attempt {attempt}/{max_attempts} rejected by '{}', retrying",
                    rejection.id()
                );
                feedback = Some(rejection.feedback());
            }
        }
    }
}
