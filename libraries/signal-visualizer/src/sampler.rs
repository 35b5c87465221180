//! Spectrum sampler
//!
//! Turns analyser bins into a fixed vector of [`SAMPLE_COUNT`] bar heights in
//! `[0, 1]`. While audio is active the vector tracks the spectrum at most
//! once per [`FRAME_THROTTLE_MS`]; while inactive it decays toward silence.

use crate::analyser::AnalysisProvider;
use crate::graph::GraphRegistry;
use signal_core::BackendId;
use tracing::debug;

/// Number of bars produced
pub const SAMPLE_COUNT: usize = 48;

/// Decay stops once every value is at or below this level
pub const MIN_SAMPLE_FLOOR: f32 = 0.03;

/// Per-frame multiplier while inactive
pub const DECAY_FACTOR: f32 = 0.88;

/// Minimum spacing between spectrum reads
pub const FRAME_THROTTLE_MS: f64 = 33.0;

/// Weight of the previous value in the moving average
pub const SMOOTHING_RETAIN: f32 = 0.72;

/// Extra gain applied to the lowest band, tapering to none at the top
pub const LOW_END_EMPHASIS: f32 = 0.35;

/// One frame of bar heights
pub type Samples = [f32; SAMPLE_COUNT];

/// Average bins into [`SAMPLE_COUNT`] buckets with low-end emphasis
///
/// Each bucket spans `max(1, len / SAMPLE_COUNT)` bins; the last bucket also
/// takes the remainder. Buckets past the end of `data` are zero.
pub fn downsample_frequency_data(data: &[u8]) -> Samples {
    let bins_per_sample = (data.len() / SAMPLE_COUNT).max(1);
    let mut samples = [0.0; SAMPLE_COUNT];

    for (index, sample) in samples.iter_mut().enumerate() {
        let start = index * bins_per_sample;
        let end = if index == SAMPLE_COUNT - 1 {
            data.len()
        } else {
            data.len().min(start + bins_per_sample)
        };

        let bucket = data.get(start..end).unwrap_or(&[]);
        let average = if bucket.is_empty() {
            0.0
        } else {
            bucket.iter().map(|&b| f32::from(b)).sum::<f32>() / bucket.len() as f32
        };

        let normalized = (average / 255.0).clamp(0.0, 1.0);
        let weighting = 1.0 + (1.0 - index as f32 / SAMPLE_COUNT as f32) * LOW_END_EMPHASIS;
        *sample = (normalized * weighting).min(1.0);
    }

    samples
}

/// Exponential moving average of two frames
pub fn smooth_samples(previous: &Samples, next: &Samples) -> Samples {
    let mut smoothed = [0.0; SAMPLE_COUNT];
    for ((out, last), new) in smoothed.iter_mut().zip(previous).zip(next) {
        *out = last * SMOOTHING_RETAIN + new * (1.0 - SMOOTHING_RETAIN);
    }
    smoothed
}

/// One decay step; `None` once every value is at or below the floor
pub fn decay_samples(samples: &Samples) -> Option<Samples> {
    if samples.iter().all(|&value| value <= MIN_SAMPLE_FLOOR) {
        return None;
    }
    Some(samples.map(|value| value * DECAY_FACTOR))
}

/// Samples the spectrum of one bound backend per frame
pub struct SpectrumSampler<P: AnalysisProvider> {
    provider: P,
    registry: GraphRegistry,
    bound: Option<BackendId>,
    reactive: bool,
    samples: Samples,
    last_render_ms: Option<f64>,
}

impl<P: AnalysisProvider> SpectrumSampler<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            registry: GraphRegistry::new(),
            bound: None,
            reactive: false,
            samples: [0.0; SAMPLE_COUNT],
            last_render_ms: None,
        }
    }

    /// Attach to a backend, building its graph on first use
    ///
    /// Returns whether the display is reactive. When it is not, the vector is
    /// reset to silence.
    pub fn bind(&mut self, backend: BackendId) -> bool {
        self.reactive = self
            .registry
            .get_or_create(backend, &mut self.provider)
            .is_some();
        self.bound = Some(backend);
        self.last_render_ms = None;

        if !self.reactive {
            self.samples = [0.0; SAMPLE_COUNT];
        }
        debug!("Spectrum sampler bound to {} (reactive: {})", backend, self.reactive);
        self.reactive
    }

    /// Tear down the graph for a discarded backend
    pub fn release(&mut self, backend: BackendId) {
        self.registry.release(backend);

        if self.bound == Some(backend) {
            self.bound = None;
            self.reactive = false;
            self.samples = [0.0; SAMPLE_COUNT];
        }
    }

    /// Advance one display frame
    ///
    /// `timestamp_ms` is the host's monotonic frame time; `is_active` is
    /// whether audio is currently playing.
    pub fn on_frame(&mut self, timestamp_ms: f64, is_active: bool) -> &Samples {
        if !self.reactive {
            return &self.samples;
        }

        if !is_active {
            if let Some(decayed) = decay_samples(&self.samples) {
                self.samples = decayed;
            }
            return &self.samples;
        }

        if let Some(last) = self.last_render_ms {
            if timestamp_ms - last < FRAME_THROTTLE_MS {
                return &self.samples;
            }
        }

        let graph = match self.bound {
            Some(backend) => self.registry.get_mut(backend),
            None => None,
        };
        let Some(graph) = graph else {
            return &self.samples;
        };

        self.last_render_ms = Some(timestamp_ms);
        let next = downsample_frequency_data(graph.read_frequency_data());
        self.samples = smooth_samples(&self.samples, &next);
        &self.samples
    }

    /// Feed PCM rendered by the bound backend to its analyser
    pub fn observe_output(&mut self, pcm: &[f32]) {
        if let Some(backend) = self.bound {
            if let Some(graph) = self.registry.get_mut(backend) {
                graph.observe(pcm);
            }
        }
    }

    /// Current bar heights
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Whether the bound backend is being analysed
    pub fn is_reactive(&self) -> bool {
        self.reactive
    }

    pub fn bound_backend(&self) -> Option<BackendId> {
        self.bound
    }

    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_bins_saturate() {
        let samples = downsample_frequency_data(&[255; 128]);
        assert!(samples.iter().all(|&value| value == 1.0));
    }

    #[test]
    fn top_band_is_unweighted() {
        let data = [51u8; 96];
        let samples = downsample_frequency_data(&data);

        // 51/255 = 0.2; the last band gets 1 + (1/48)*0.35
        let expected_last = 0.2 * (1.0 + (1.0 / 48.0) * 0.35);
        assert!((samples[47] - expected_last).abs() < 1e-6);
        assert!((samples[0] - 0.2 * 1.35).abs() < 1e-6);
    }

    #[test]
    fn last_bucket_takes_remainder() {
        // 100 bins: 2 per bucket, last bucket gets bins 94..100
        let mut data = vec![0u8; 100];
        for value in &mut data[96..] {
            *value = 255;
        }

        let samples = downsample_frequency_data(&data);
        assert_eq!(samples[46], 0.0);
        assert!(samples[47] > 0.0);
        // (4 * 255) / 6 bins
        let average = 4.0 * 255.0 / 6.0 / 255.0;
        assert!((samples[47] - average * (1.0 + 0.35 / 48.0)).abs() < 1e-6);
    }

    #[test]
    fn short_input_leaves_empty_buckets() {
        let samples = downsample_frequency_data(&[255; 10]);
        assert!(samples[..10].iter().all(|&value| value == 1.0));
        assert!(samples[10..].iter().all(|&value| value == 0.0));
    }

    #[test]
    fn empty_input_is_silence() {
        assert_eq!(downsample_frequency_data(&[]), [0.0; SAMPLE_COUNT]);
    }

    #[test]
    fn smoothing_blends() {
        let previous = [1.0; SAMPLE_COUNT];
        let next = [0.0; SAMPLE_COUNT];
        let smoothed = smooth_samples(&previous, &next);
        assert!(smoothed.iter().all(|&value| (value - 0.72).abs() < 1e-6));
    }

    #[test]
    fn decay_stops_at_floor() {
        let mut samples = [0.0; SAMPLE_COUNT];
        samples[3] = 0.5;

        let decayed = decay_samples(&samples).unwrap();
        assert!((decayed[3] - 0.44).abs() < 1e-6);

        samples[3] = MIN_SAMPLE_FLOOR;
        assert_eq!(decay_samples(&samples), None);
    }
}
