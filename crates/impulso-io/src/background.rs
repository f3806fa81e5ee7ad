//! Background impulse response loading.
//!
//! Each request runs on its own named thread: decode, partition, publish.
//! Requests are not cancelled; when several overlap, whichever publishes last
//! stays active. A failed request never touches the exchange.
//!
//! The most recent load status is kept in an [`ArcSwap`] so a UI thread can
//! poll it without locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use impulso_convolution::{IrData, IrExchange};

use crate::loader::IrLoader;
use crate::{Error, Result};

/// Status of the most recent load to start or finish.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A load is in progress.
    Loading {
        /// File being loaded.
        path: PathBuf,
    },
    /// The last finished load succeeded and was published.
    Loaded {
        /// Display name of the IR.
        name: String,
        /// IR length in samples.
        ir_length: usize,
        /// Partition count.
        num_partitions: usize,
    },
    /// The last finished load failed; the previous IR stays active.
    Failed {
        /// File that failed.
        path: PathBuf,
        /// Error description.
        message: String,
    },
}

impl LoadState {
    /// Short status line for display.
    pub fn label(&self) -> String {
        match self {
            LoadState::Idle => "No IR loaded".to_string(),
            LoadState::Loading { .. } => "Loading...".to_string(),
            LoadState::Loaded { name, .. } => name.clone(),
            LoadState::Failed { .. } => "Load failed".to_string(),
        }
    }
}

/// Handle to an in-flight load.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    thread: JoinHandle<Result<Arc<IrData>>>,
}

impl LoadHandle {
    /// File being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` once the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<Arc<IrData>> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => Err(Error::Io(std::io::Error::other("IR loader thread panicked"))),
        }
    }
}

#[derive(Debug)]
struct Shared {
    exchange: Arc<IrExchange>,
    state: ArcSwap<LoadState>,
    in_flight: AtomicUsize,
}

impl Shared {
    fn run(&self, loader: &IrLoader, path: &Path) -> Result<Arc<IrData>> {
        match loader.load(path) {
            Ok(ir) => {
                let ir = Arc::new(ir);
                self.exchange.publish(Arc::clone(&ir));
                self.state.store(Arc::new(LoadState::Loaded {
                    name: ir.name().unwrap_or("impulse").to_string(),
                    ir_length: ir.ir_length(),
                    num_partitions: ir.num_partitions(),
                }));
                Ok(ir)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "impulse response load failed");
                self.state.store(Arc::new(LoadState::Failed {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                }));
                Err(err)
            }
        }
    }
}

/// Loads impulse responses off the audio thread and publishes them.
///
/// # Example
///
/// ```rust,ignore
/// let engine = ConvolutionEngine::new();
/// let loader = BackgroundLoader::new(Arc::clone(engine.exchange()), IrLoader::new(512));
///
/// let handle = loader.request("plate.wav")?;
/// handle.wait()?;
/// assert!(engine.exchange().is_loaded());
/// ```
#[derive(Debug)]
pub struct BackgroundLoader {
    shared: Arc<Shared>,
    loader: IrLoader,
}

impl BackgroundLoader {
    /// Loader publishing into `exchange`.
    pub fn new(exchange: Arc<IrExchange>, loader: IrLoader) -> Self {
        Self {
            shared: Arc::new(Shared {
                exchange,
                state: ArcSwap::from_pointee(LoadState::Idle),
                in_flight: AtomicUsize::new(0),
            }),
            loader,
        }
    }

    /// Replace the loader settings (e.g. after the host changes block size).
    ///
    /// Applies to later requests only.
    pub fn set_loader(&mut self, loader: IrLoader) {
        self.loader = loader;
    }

    /// Current loader settings.
    pub fn loader(&self) -> &IrLoader {
        &self.loader
    }

    /// The exchange results are published to.
    pub fn exchange(&self) -> &Arc<IrExchange> {
        &self.shared.exchange
    }

    /// Status of the most recent load.
    pub fn state(&self) -> Arc<LoadState> {
        self.shared.state.load_full()
    }

    /// Number of loads currently running.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Start loading `path` on a worker thread.
    ///
    /// Errors only if the thread cannot be spawned; load failures are
    /// reported through the handle and [`state`](Self::state).
    pub fn request<P: AsRef<Path>>(&self, path: P) -> Result<LoadHandle> {
        let path = path.as_ref().to_path_buf();
        tracing::debug!(path = %path.display(), "impulse response load requested");

        self.shared.state.store(Arc::new(LoadState::Loading { path: path.clone() }));
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);

        let shared = Arc::clone(&self.shared);
        let loader = self.loader.clone();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("impulso-ir-loader".to_string())
            .spawn(move || {
                let result = shared.run(&loader, &worker_path);
                shared.in_flight.fetch_sub(1, Ordering::AcqRel);
                result
            });

        match spawned {
            Ok(thread) => Ok(LoadHandle { path, thread }),
            Err(err) => {
                self.shared.in_flight.fetch_sub(1, Ordering::AcqRel);
                self.shared.state.store(Arc::new(LoadState::Failed {
                    path,
                    message: err.to_string(),
                }));
                Err(Error::Io(err))
            }
        }
    }

    /// Load `path` on the calling thread and publish it.
    pub fn load_now<P: AsRef<Path>>(&self, path: P) -> Result<Arc<IrData>> {
        let path = path.as_ref();
        self.shared.state.store(Arc::new(LoadState::Loading {
            path: path.to_path_buf(),
        }));
        self.shared.run(&self.loader, path)
    }
}
