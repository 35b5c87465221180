//! Signal Radio - Spectrum Visualizer
//!
//! Reduces the live spectrum of an audio backend to 48 smoothed bar heights.
//!
//! This crate provides:
//! - `FrequencyAnalyser` / `AnalysisProvider`, the platform seams
//! - `GraphRegistry`, one analysis graph per backend with explicit release
//! - `SpectrumSampler`, the per-frame throttle, smoothing and decay
//! - `FftAnalyser`, a rustfft analyser for backends that expose PCM
//!
//! # Example
//!
//! ```rust
//! use signal_core::BackendId;
//! use signal_visualizer::{FftAnalysisProvider, SpectrumSampler, SAMPLE_COUNT};
//!
//! let backend = BackendId::allocate();
//! let mut sampler = SpectrumSampler::new(FftAnalysisProvider::default());
//! assert!(sampler.bind(backend));
//!
//! let tone: Vec<f32> = (0..1024).map(|n| (n as f32 * 0.3).sin() * 0.05).collect();
//! sampler.observe_output(&tone);
//!
//! let samples = sampler.on_frame(16.0, true);
//! assert_eq!(samples.len(), SAMPLE_COUNT);
//! assert!(samples.iter().all(|v| (0.0..=1.0).contains(v)));
//!
//! sampler.release(backend);
//! assert!(!sampler.is_reactive());
//! ```

#![forbid(unsafe_code)]

pub mod analyser;
pub mod error;
pub mod fft;
pub mod graph;
pub mod sampler;

pub use analyser::{AnalysisProvider, FrequencyAnalyser, UnavailableAnalysis, ANALYSER_SMOOTHING, FFT_SIZE};
pub use error::AnalysisUnavailable;
pub use fft::{FftAnalyser, FftAnalysisProvider};
pub use graph::{GraphRegistry, VisualizerGraph};
pub use sampler::{
    decay_samples, downsample_frequency_data, smooth_samples, Samples, SpectrumSampler,
    MIN_SAMPLE_FLOOR, SAMPLE_COUNT,
};
