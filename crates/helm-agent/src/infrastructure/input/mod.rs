//! Platform-specific input synthesis implementations.
//!
//! The real implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`. Targets without one fall back to the recording
//! mock so the agent still runs end-to-end (commands are accepted and the
//! sequence is recorded instead of injected).

use std::sync::Arc;

use crate::application::input::InputSynthesizer;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Returns the input synthesizer for the compilation target.
pub fn native_synthesizer() -> Arc<dyn InputSynthesizer> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsInputSynthesizer::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("no input synthesizer for this platform; input events will only be recorded");
        Arc::new(mock::MockInputSynthesizer::new())
    }
}
