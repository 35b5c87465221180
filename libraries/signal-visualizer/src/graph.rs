//! Per-backend analysis graphs
//!
//! A graph is built at most once per backend and lives until the backend is
//! released. A backend whose graph could not be built stays marked
//! unavailable, so creation is never retried for it.

use crate::analyser::{AnalysisProvider, FrequencyAnalyser};
use signal_core::BackendId;
use std::collections::HashMap;
use tracing::{debug, warn};

/// An analyser plus the buffer it reads into
pub struct VisualizerGraph {
    analyser: Box<dyn FrequencyAnalyser>,
    frequency_buffer: Vec<u8>,
}

impl VisualizerGraph {
    pub fn new(analyser: Box<dyn FrequencyAnalyser>) -> Self {
        let frequency_buffer = vec![0; analyser.frequency_bin_count()];
        Self {
            analyser,
            frequency_buffer,
        }
    }

    /// Resume the analyser if needed and read the current spectrum
    pub fn read_frequency_data(&mut self) -> &[u8] {
        self.analyser.resume_if_suspended();
        self.analyser.byte_frequency_data(&mut self.frequency_buffer);
        &self.frequency_buffer
    }

    /// Forward rendered PCM to the analyser
    pub fn observe(&mut self, pcm: &[f32]) {
        self.analyser.observe(pcm);
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.frequency_buffer.len()
    }
}

impl std::fmt::Debug for VisualizerGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizerGraph")
            .field("frequency_bin_count", &self.frequency_buffer.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum GraphSlot {
    Ready(VisualizerGraph),
    Unavailable,
}

/// Analysis graphs keyed by backend identity
#[derive(Debug, Default)]
pub struct GraphRegistry {
    slots: HashMap<BackendId, GraphSlot>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the backend's graph, building it on first use
    ///
    /// Returns `None` when analysis is unavailable for this backend, now or
    /// on any earlier attempt.
    pub fn get_or_create(
        &mut self,
        backend: BackendId,
        provider: &mut dyn AnalysisProvider,
    ) -> Option<&mut VisualizerGraph> {
        let slot = self.slots.entry(backend).or_insert_with(|| {
            match provider.create_analyser(backend) {
                Ok(analyser) => {
                    debug!("Built analysis graph for {}", backend);
                    GraphSlot::Ready(VisualizerGraph::new(analyser))
                }
                Err(e) => {
                    warn!("Spectrum analysis unavailable for {}: {}", backend, e);
                    GraphSlot::Unavailable
                }
            }
        });

        match slot {
            GraphSlot::Ready(graph) => Some(graph),
            GraphSlot::Unavailable => None,
        }
    }

    /// Existing graph for `backend`, without building one
    pub fn get_mut(&mut self, backend: BackendId) -> Option<&mut VisualizerGraph> {
        match self.slots.get_mut(&backend) {
            Some(GraphSlot::Ready(graph)) => Some(graph),
            _ => None,
        }
    }

    /// Tear down whatever is registered for `backend`
    ///
    /// Returns whether anything was registered.
    pub fn release(&mut self, backend: BackendId) -> bool {
        let released = self.slots.remove(&backend).is_some();
        if released {
            debug!("Released analysis graph for {}", backend);
        }
        released
    }

    /// Whether `backend` has a slot, ready or unavailable
    pub fn contains(&self, backend: BackendId) -> bool {
        self.slots.contains_key(&backend)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
