//! Property-based tests for the spectrum sampler
//!
//! Uses proptest to verify the output shape and range for arbitrary spectra
//! and frame sequences.

use proptest::prelude::*;
use signal_core::BackendId;
use signal_visualizer::{
    downsample_frequency_data, smooth_samples, AnalysisProvider, AnalysisUnavailable,
    FrequencyAnalyser, SpectrumSampler, SAMPLE_COUNT,
};
use std::collections::VecDeque;

// ===== Helpers =====

/// Analyser that replays a queue of spectra, then repeats the last one
struct ReplayAnalyser {
    frames: VecDeque<Vec<u8>>,
    bins: usize,
}

impl FrequencyAnalyser for ReplayAnalyser {
    fn frequency_bin_count(&self) -> usize {
        self.bins
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let frame = if self.frames.len() > 1 {
            self.frames.pop_front()
        } else {
            self.frames.front().cloned()
        };
        if let Some(frame) = frame {
            for (byte, value) in out.iter_mut().zip(frame) {
                *byte = value;
            }
        }
    }
}

struct ReplayProvider {
    frames: Option<VecDeque<Vec<u8>>>,
    bins: usize,
}

impl AnalysisProvider for ReplayProvider {
    fn create_analyser(
        &mut self,
        _backend: BackendId,
    ) -> Result<Box<dyn FrequencyAnalyser>, AnalysisUnavailable> {
        Ok(Box::new(ReplayAnalyser {
            frames: self.frames.take().unwrap_or_default(),
            bins: self.bins,
        }))
    }
}

fn in_unit_range(samples: &[f32]) -> bool {
    samples.iter().all(|value| (0.0..=1.0).contains(value))
}

// ===== Property Tests =====

proptest! {
    /// Property: downsampling any spectrum yields 48 values in [0, 1]
    #[test]
    fn downsample_shape_and_range(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let samples = downsample_frequency_data(&data);
        prop_assert_eq!(samples.len(), SAMPLE_COUNT);
        prop_assert!(in_unit_range(&samples));
    }

    /// Property: smoothing two unit-range frames stays in range
    #[test]
    fn smoothing_stays_in_range(
        previous in prop::array::uniform32(0.0f32..=1.0),
        next in prop::array::uniform32(0.0f32..=1.0),
    ) {
        let mut a = [0.0; SAMPLE_COUNT];
        let mut b = [0.0; SAMPLE_COUNT];
        a[..32].copy_from_slice(&previous);
        b[..32].copy_from_slice(&next);

        prop_assert!(in_unit_range(&smooth_samples(&a, &b)));
    }

    /// Property: any sequence of active/inactive frames keeps the vector at
    /// 48 values in [0, 1]
    #[test]
    fn frames_stay_in_range(
        bins in 1usize..512,
        spectra in prop::collection::vec(prop::collection::vec(any::<u8>(), 512), 1..8),
        frames in prop::collection::vec((0.0f64..100.0, any::<bool>()), 1..64),
    ) {
        let provider = ReplayProvider {
            frames: Some(spectra.into_iter().collect()),
            bins,
        };
        let mut sampler = SpectrumSampler::new(provider);
        sampler.bind(BackendId::allocate());

        let mut timestamp = 0.0;
        for (step, is_active) in frames {
            timestamp += step;
            let samples = sampler.on_frame(timestamp, is_active);
            prop_assert_eq!(samples.len(), SAMPLE_COUNT);
            prop_assert!(in_unit_range(samples));
        }
    }
}
