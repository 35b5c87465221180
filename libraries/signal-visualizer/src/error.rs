//! Error types for spectrum analysis

use signal_core::BackendId;
use thiserror::Error;

/// Why a backend cannot be analysed
///
/// Never shown to listeners: the sampler falls back to a silent,
/// non-reactive display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisUnavailable {
    /// The platform offers no analysis support at all
    #[error("Audio analysis is not supported on this platform")]
    Unsupported,

    /// Tapping the backend's output failed
    #[error("Failed to tap {backend}: {reason}")]
    TapFailed { backend: BackendId, reason: String },
}
