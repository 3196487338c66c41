//! # BAM - Bidirectional Associative Memory
//!
//! A persisted correlation matrix that stores superimposed pattern pairs and
//! recalls either side of a pair from the other, even from a noisy cue.
//!
//! ## Core Concepts
//!
//! - **Bipolar encoding**: 0/1 patterns become ±1 vectors before any arithmetic
//! - **Hebbian learning**: each pair adds the outer product `x^T y` to the weights
//! - **Bidirectional recall**: bounce between the two sides until a fixed point or 2-cycle
//! - **Capacity bound**: `n / (2 log2 n)` pairs for the smaller side `n`
//!
//! ```no_run
//! use bam::{BamConfig, Dims, Model, Pattern};
//!
//! let mut model = Model::create("memory.bam", Dims::new(2, 2, 2), BamConfig::default())?;
//! let a = Pattern::from_rows(&[[1, 0], [0, 1]]).unwrap();
//! let b = Pattern::from_rows(&[[0, 1], [1, 0]]).unwrap();
//! model.add(&a, &b)?;
//!
//! let recalled = model.associate_from_right(&b)?;
//! assert_eq!(recalled.pattern.to_binary(), a);
//! model.close()?;
//! # Ok::<(), bam::BamError>(())
//! ```

pub mod capacity;
pub mod codec;
pub mod config;
pub mod error;
mod learning;
pub mod model;
pub mod pattern;
pub mod recall;
pub mod store;
mod text;

pub use capacity::max_pairs;
pub use config::{BamConfig, SaveMode};
pub use error::{BamError, ErrorKind, Result, Side};
pub use model::Model;
pub use pattern::Pattern;
pub use recall::{CycleDetector, Recall};
pub use store::{Dims, Header};
