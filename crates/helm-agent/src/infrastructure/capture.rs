//! Screen capture implementations.
//!
//! Real capture backends are platform work outside this crate; the counting
//! capturer stands in for tests and dry runs, and demonstrates the contract:
//! the capture sequence number is state owned by the implementation, not a
//! module-level static.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::application::control::{ActionError, ScreenCapturer};

/// Capture implementation that numbers each shot without producing an image.
#[derive(Debug, Default)]
pub struct CountingCapturer {
    sequence: Arc<AtomicU64>,
}

impl CountingCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the capture count, for observers and tests.
    pub fn sequence_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.sequence)
    }
}

impl ScreenCapturer for CountingCapturer {
    fn capture(&mut self) -> Result<(), ActionError> {
        let shot = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(sequence = shot, "screen capture");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
