//! FFT-based frequency analyser
//!
//! A software analyser for backends that hand over rendered PCM. Output
//! follows the usual browser analyser conventions so the sampler behaves the
//! same on every platform:
//! - Blackman window over the most recent `fft_size` samples
//! - magnitudes scaled by `1 / fft_size` and smoothed over time
//! - decibels mapped linearly from `[-100, -30]` dB onto `0..=255`

use crate::analyser::{AnalysisProvider, FrequencyAnalyser, ANALYSER_SMOOTHING, FFT_SIZE};
use crate::error::AnalysisUnavailable;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use signal_core::BackendId;
use std::f32::consts::PI;
use std::sync::Arc;

/// Level mapped to byte 0
pub const MIN_DECIBELS: f32 = -100.0;

/// Level mapped to byte 255
pub const MAX_DECIBELS: f32 = -30.0;

/// Analyser over a sliding window of mono PCM
pub struct FftAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    history: Vec<f32>,
    smoothed: Vec<f32>,
    smoothing: f32,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl FftAnalyser {
    /// Create an analyser; `fft_size` should be a power of two
    pub fn new(planner: &mut FftPlanner<f32>, fft_size: usize, smoothing: f32) -> Self {
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft,
            window: blackman_window(fft_size),
            history: vec![0.0; fft_size],
            smoothed: vec![0.0; fft_size / 2],
            smoothing: smoothing.clamp(0.0, 1.0),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    /// Run one analysis pass over the current window and update the smoothed
    /// magnitudes
    fn analyse(&mut self) {
        let size = self.history.len();

        for ((slot, &sample), &weight) in self.buffer.iter_mut().zip(&self.history).zip(&self.window) {
            *slot = Complex::new(sample * weight, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / size as f32;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(&self.buffer) {
            let magnitude = bin.norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;
        }
    }
}

impl FrequencyAnalyser for FftAnalyser {
    fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();

        for (byte, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            *byte = magnitude_to_byte(magnitude);
        }
    }

    fn observe(&mut self, pcm: &[f32]) {
        let size = self.history.len();

        if pcm.len() >= size {
            self.history.copy_from_slice(&pcm[pcm.len() - size..]);
        } else {
            self.history.rotate_left(pcm.len());
            self.history[size - pcm.len()..].copy_from_slice(pcm);
        }
    }
}

/// Map a linear magnitude onto the analyser's byte range
pub fn magnitude_to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 || !magnitude.is_finite() {
        return 0;
    }

    let decibels = 20.0 * magnitude.log10();
    let scaled = 255.0 / (MAX_DECIBELS - MIN_DECIBELS) * (decibels - MIN_DECIBELS);
    scaled.floor().clamp(0.0, 255.0) as u8
}

fn blackman_window(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;

    (0..size)
        .map(|n| {
            let phase = 2.0 * PI * n as f32 / size as f32;
            A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos()
        })
        .collect()
}

/// Builds an [`FftAnalyser`] for every backend
pub struct FftAnalysisProvider {
    planner: FftPlanner<f32>,
    fft_size: usize,
    smoothing: f32,
}

impl FftAnalysisProvider {
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        Self {
            planner: FftPlanner::new(),
            fft_size,
            smoothing,
        }
    }
}

impl Default for FftAnalysisProvider {
    fn default() -> Self {
        Self::new(FFT_SIZE, ANALYSER_SMOOTHING)
    }
}

impl AnalysisProvider for FftAnalysisProvider {
    fn create_analyser(
        &mut self,
        backend: BackendId,
    ) -> Result<Box<dyn FrequencyAnalyser>, AnalysisUnavailable> {
        if self.fft_size < 2 {
            return Err(AnalysisUnavailable::TapFailed {
                backend,
                reason: format!("FFT size {} is too small", self.fft_size),
            });
        }

        Ok(Box::new(FftAnalyser::new(
            &mut self.planner,
            self.fft_size,
            self.smoothing,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_at_bin(bin: usize, size: usize, amplitude: f32) -> Vec<f32> {
        (0..size)
            .map(|n| amplitude * (2.0 * PI * bin as f32 * n as f32 / size as f32).sin())
            .collect()
    }

    #[test]
    fn bin_count_is_half_the_window() {
        let analyser = FftAnalyser::new(&mut FftPlanner::new(), FFT_SIZE, ANALYSER_SMOOTHING);
        assert_eq!(analyser.frequency_bin_count(), 128);
        assert_eq!(analyser.fft_size(), 256);
    }

    #[test]
    fn silence_reads_as_zero() {
        let mut analyser = FftAnalyser::new(&mut FftPlanner::new(), FFT_SIZE, ANALYSER_SMOOTHING);
        analyser.observe(&[0.0; 512]);

        let mut out = [255u8; 128];
        analyser.byte_frequency_data(&mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_at_its_bin() {
        let mut analyser = FftAnalyser::new(&mut FftPlanner::new(), FFT_SIZE, ANALYSER_SMOOTHING);
        let tone = sine_at_bin(16, FFT_SIZE, 0.01);

        let mut out = [0u8; 128];
        for _ in 0..60 {
            analyser.observe(&tone);
            analyser.byte_frequency_data(&mut out);
        }

        let peak = out
            .iter()
            .enumerate()
            .max_by_key(|&(_, value)| *value)
            .map(|(index, _)| index);
        assert_eq!(peak, Some(16));
        assert!(out[16] > 100);
        assert_eq!(out[64], 0);
    }

    #[test]
    fn smoothing_ramps_up() {
        let mut analyser = FftAnalyser::new(&mut FftPlanner::new(), FFT_SIZE, ANALYSER_SMOOTHING);
        analyser.observe(&sine_at_bin(8, FFT_SIZE, 0.01));

        let mut first = [0u8; 128];
        analyser.byte_frequency_data(&mut first);
        let mut second = [0u8; 128];
        analyser.byte_frequency_data(&mut second);

        assert!(second[8] > first[8]);
    }

    #[test]
    fn short_writes_shift_the_window() {
        let mut analyser = FftAnalyser::new(&mut FftPlanner::new(), 8, 0.0);
        analyser.observe(&[1.0; 8]);
        analyser.observe(&[2.0, 3.0]);

        assert_eq!(analyser.history, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn decibel_mapping_edges() {
        assert_eq!(magnitude_to_byte(0.0), 0);
        assert_eq!(magnitude_to_byte(1e-6), 0); // -120 dB
        assert_eq!(magnitude_to_byte(1.0), 255); // 0 dB
        assert_eq!(magnitude_to_byte(f32::NAN), 0);
    }

    #[test]
    fn tiny_fft_is_unavailable() {
        let mut provider = FftAnalysisProvider::new(1, 0.5);
        assert!(provider.create_analyser(BackendId::from_raw(1)).is_err());
    }
}
