//! Lock-free hand-off of the active impulse response.
//!
//! The loader thread publishes a freshly built [`IrData`]; the audio thread
//! takes a snapshot at the top of every block. Publication is a single atomic
//! pointer store with release semantics and the snapshot is an acquire load,
//! so a reader always sees a fully constructed container, either the previous
//! one or the new one.
//!
//! Last publish wins. A superseded container moves to a retire list owned by
//! the exchange, so a reader dropping its snapshot never frees it. Retired
//! containers are freed on the publishing thread once no reader holds them.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::{ArcSwapOption, Guard};

use crate::ir::IrData;

/// Single-writer, multi-reader slot holding the active [`IrData`].
///
/// ```rust
/// use std::sync::Arc;
/// use impulso_convolution::{IrExchange, SpectralPartitioner};
///
/// let exchange = IrExchange::new();
/// assert!(!exchange.is_loaded());
///
/// let mut partitioner = SpectralPartitioner::new(256);
/// let ir = partitioner.build_mono(&[1.0, 0.5]).unwrap();
/// exchange.publish(Arc::new(ir));
/// assert!(exchange.is_loaded());
/// ```
#[derive(Debug, Default)]
pub struct IrExchange {
    current: ArcSwapOption<IrData>,
    /// Superseded containers awaiting release. Never locked by readers.
    retired: Mutex<Vec<Arc<IrData>>>,
}

impl IrExchange {
    /// Empty exchange.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            retired: Mutex::new(Vec::new()),
        }
    }

    /// Make `ir` the active impulse response.
    pub fn publish(&self, ir: Arc<IrData>) {
        tracing::debug!(
            generation = ir.generation(),
            partitions = ir.num_partitions(),
            "publishing impulse response"
        );
        let previous = self.current.swap(Some(ir));
        self.retire(previous);
    }

    /// Remove the active impulse response; processing reverts to dry.
    pub fn clear(&self) {
        let previous = self.current.swap(None);
        self.retire(previous);
    }

    fn retire(&self, previous: Option<Arc<IrData>>) {
        let mut retired = self.retired.lock().unwrap_or_else(PoisonError::into_inner);
        retired.extend(previous);
        retired.retain(|ir| Arc::strong_count(ir) > 1);
    }

    /// Free retired containers that no reader holds any more.
    ///
    /// Publishing does this too; call it from a non-realtime thread to
    /// release memory between loads. Returns how many are still held.
    pub fn collect_retired(&self) -> usize {
        self.retire(None);
        self.retired_count()
    }

    /// Superseded containers still waiting for their readers.
    pub fn retired_count(&self) -> usize {
        self.retired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait-free snapshot for the audio thread.
    ///
    /// The guard keeps the container alive while held. Hold it for one block
    /// at most.
    #[inline]
    pub fn load(&self) -> Guard<Option<Arc<IrData>>> {
        self.current.load()
    }

    /// Owned handle to the active impulse response, for non-realtime readers.
    pub fn load_full(&self) -> Option<Arc<IrData>> {
        self.current.load_full()
    }

    /// `true` while an impulse response is published.
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }
}
