//! Frequency analyser abstraction
//!
//! An analyser is tapped off a single backend's output and reports the
//! current spectrum as bytes in `0..=255`, one per frequency bin.

use crate::error::AnalysisUnavailable;
use signal_core::BackendId;

/// FFT window length used for every analyser
pub const FFT_SIZE: usize = 256;

/// Temporal smoothing applied inside the analyser
pub const ANALYSER_SMOOTHING: f32 = 0.82;

/// Spectrum reader attached to one backend
pub trait FrequencyAnalyser {
    /// Number of bins `byte_frequency_data` fills (half the FFT size)
    fn frequency_bin_count(&self) -> usize;

    /// Write the current spectrum into `out`
    ///
    /// Fills `min(out.len(), frequency_bin_count())` bytes.
    fn byte_frequency_data(&mut self, out: &mut [u8]);

    /// Wake the underlying audio context if the platform suspended it
    fn resume_if_suspended(&mut self) {}

    /// Feed mono PCM rendered by the backend
    ///
    /// Platforms where the analyser taps the output graph directly ignore
    /// this.
    fn observe(&mut self, _pcm: &[f32]) {}
}

/// Creates analysers for backends
pub trait AnalysisProvider {
    fn create_analyser(
        &mut self,
        backend: BackendId,
    ) -> Result<Box<dyn FrequencyAnalyser>, AnalysisUnavailable>;
}

/// Provider for platforms without analysis support
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAnalysis;

impl AnalysisProvider for UnavailableAnalysis {
    fn create_analyser(
        &mut self,
        _backend: BackendId,
    ) -> Result<Box<dyn FrequencyAnalyser>, AnalysisUnavailable> {
        Err(AnalysisUnavailable::Unsupported)
    }
}
