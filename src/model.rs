//! An open BAM: weight matrix, capacity counter and scratch buffers.

use crate::config::BamConfig;
use crate::error::{BamError, Result};
use crate::store::{self, Dims, Header};
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A loaded bidirectional associative memory.
///
/// The weight matrix is `(N*M) x (M*P)`. `x` and `y` are working vectors of
/// length `rows` and `cols`, overwritten by every learning or recall call.
#[derive(Debug)]
pub struct Model {
    pub(crate) weight: Array2<f64>,
    pub(crate) capacity: i64,
    pub(crate) dims: Dims,
    pub(crate) x: Array1<f64>,
    pub(crate) y: Array1<f64>,
    pub(crate) config: BamConfig,
    pub(crate) dirty: bool,
    path: PathBuf,
}

impl Model {
    /// Load a store with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, BamConfig::default())
    }

    /// Load a store.
    pub fn open_with(path: impl AsRef<Path>, config: BamConfig) -> Result<Self> {
        let path = path.as_ref();
        let (header, weight) = store::read(path)?;
        let (rows, cols) = weight.dim();

        let x = scratch(rows)?;
        let y = scratch(cols)?;

        info!(
            "Opened store {} ({}x{} weights, capacity {})",
            path.display(),
            rows,
            cols,
            header.capacity
        );

        Ok(Self {
            weight,
            capacity: header.capacity,
            dims: header.dims,
            x,
            y,
            config,
            dirty: false,
            path: path.to_path_buf(),
        })
    }

    /// Create a fresh store at `path` and open it.
    pub fn create(path: impl AsRef<Path>, dims: Dims, config: BamConfig) -> Result<Self> {
        store::create(&path, dims)?;
        Self::open_with(path, config)
    }

    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    /// Remaining-pairs estimate. May be negative.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &BamConfig {
        &self.config
    }

    /// True when in-memory state has not been written since the last mutation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Turn save-after-every-mutation on or off.
    ///
    /// With autosave off, call [`Model::save`] (or [`Model::close`]) to persist.
    pub fn set_autosave(&mut self, autosave: bool) {
        self.config.autosave = autosave;
    }

    fn header(&self) -> Header {
        Header {
            capacity: self.capacity,
            dims: self.dims,
        }
    }

    /// Rewrite the whole store from the current state.
    ///
    /// On failure the in-memory model keeps its changes and stays dirty.
    pub fn save(&mut self) -> Result<()> {
        store::write(&self.path, &self.header(), &self.weight, self.config.save_mode)?;
        self.dirty = false;
        info!(
            "Saved store {} (capacity {})",
            self.path.display(),
            self.capacity
        );
        Ok(())
    }

    /// Release the model, flushing any unsaved mutations first.
    pub fn close(mut self) -> Result<()> {
        if self.dirty {
            warn!(
                "Closing {} with unsaved changes, saving",
                self.path.display()
            );
            self.save()?;
        }
        Ok(())
    }
}

fn scratch(len: usize) -> Result<Array1<f64>> {
    let mut buf: Vec<f64> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| BamError::Memory { elements: len })?;
    buf.resize(len, 0.0);
    Ok(Array1::from(buf))
}
