//! Identifier generation and wall-clock capture.
//!
//! Both are injected into the transcoder so a run can be reproduced with a
//! seeded generator and a fixed clock.

use std::collections::HashSet;

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{PackError, Result};
use crate::model::Namespace;

/// Length of every document identifier the runtime issues.
pub const ID_LENGTH: usize = 16;

/// Draws before giving up on finding an unused identifier.
pub const MAX_ID_ATTEMPTS: usize = 64;

// ============================================================================
// ID Generation
// ============================================================================

/// Source of fresh document identifiers.
pub trait IdGenerator {
    fn generate(&mut self) -> String;
}

/// Produces 16-character alphanumeric identifiers from a random source.
#[derive(Debug, Clone, Default)]
pub struct RandomIdGenerator<R = ThreadRng> {
    rng: R,
}

impl RandomIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl<R: Rng> RandomIdGenerator<R> {
    /// Use a specific random source, e.g. a seeded `StdRng`.
    #[must_use]
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> IdGenerator for RandomIdGenerator<R> {
    fn generate(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn generate(&mut self) -> String {
        (**self).generate()
    }
}

/// Whether `id` has the shape of a runtime identifier.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Draw identifiers until one is not in `taken`, then claim it.
///
/// # Errors
///
/// Returns `IdExhausted` if `MAX_ID_ATTEMPTS` draws all collided.
pub fn unique_id<G: IdGenerator + ?Sized>(
    generator: &mut G,
    taken: &mut HashSet<String>,
    namespace: Namespace,
) -> Result<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generator.generate();
        if taken.insert(id.clone()) {
            return Ok(id);
        }
        tracing::debug!(%namespace, id = %id, "Generated id already taken, drawing again");
    }
    Err(PackError::IdExhausted {
        namespace,
        attempts: MAX_ID_ATTEMPTS,
    })
}

// ============================================================================
// Clock
// ============================================================================

/// Wall-clock source in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
