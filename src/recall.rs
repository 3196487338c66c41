//! Bidirectional recall.
//!
//! Starting from one encoded side, the state bounces through the weight
//! matrix (`y = x W`, `x = F(y W^T)`) until it repeats with period 1 or 2.
//! [`CycleDetector`] holds the two most recent states for that test.

use crate::codec::{activate, decode, encode_into};
use crate::error::{BamError, Result, Side};
use crate::model::Model;
use crate::pattern::Pattern;
use ndarray::linalg::general_mat_vec_mul;
use tracing::{debug, warn};

/// Bounded history of the last two states of an iteration.
///
/// A new state matching either slot means the iteration reached a fixed
/// point (matches the previous state) or a 2-cycle (matches the one before).
#[derive(Debug, Clone)]
pub struct CycleDetector<T> {
    prev: Option<T>,
    older: Option<T>,
}

impl<T> Default for CycleDetector<T> {
    fn default() -> Self {
        Self {
            prev: None,
            older: None,
        }
    }
}

impl<T: Clone + PartialEq> CycleDetector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `state`, forgetting the oldest one. Reuses slot allocations.
    pub fn push(&mut self, state: &T) {
        std::mem::swap(&mut self.prev, &mut self.older);
        match self.prev.as_mut() {
            Some(slot) => slot.clone_from(state),
            None => self.prev = Some(state.clone()),
        }
    }

    /// Does `state` equal one of the two remembered states?
    pub fn seen(&self, state: &T) -> bool {
        self.prev.as_ref() == Some(state) || self.older.as_ref() == Some(state)
    }

    pub fn reset(&mut self) {
        self.prev = None;
        self.older = None;
    }
}

/// Result of a recall.
#[derive(Debug, Clone, PartialEq)]
pub struct Recall {
    /// Recalled pattern on the opposite side.
    pub pattern: Pattern,
    /// Number of passes until the state repeated.
    pub iterations: usize,
}

impl Model {
    /// Recall `B` (shape `M x P`) from `A`.
    ///
    /// The returned pattern is the raw product `x W` of the final pass, not
    /// an activated vector; use [`Pattern::to_binary`] for 0/1 output.
    pub fn associate_from_left(&mut self, a: &Pattern) -> Result<Recall> {
        encode_into(a, &mut self.x, Side::Left)?;

        let mut history = CycleDetector::new();
        let mut iterations = 0;
        loop {
            general_mat_vec_mul(1.0, &self.weight.t(), &self.x, 0.0, &mut self.y);
            history.push(&self.x);
            general_mat_vec_mul(1.0, &self.weight, &self.y, 0.0, &mut self.x);
            self.x.mapv_inplace(activate);
            iterations += 1;

            if history.seen(&self.x) {
                break;
            }
            self.check_ceiling(iterations)?;
        }

        debug!("Left recall settled after {} iterations", iterations);
        Ok(Recall {
            pattern: decode(&self.y, self.dims.m, self.dims.p)?,
            iterations,
        })
    }

    /// Recall `A` (shape `N x M`) from `B`.
    ///
    /// The returned pattern is the activated (±1) `x` of the final pass.
    pub fn associate_from_right(&mut self, b: &Pattern) -> Result<Recall> {
        encode_into(b, &mut self.y, Side::Right)?;

        let mut history = CycleDetector::new();
        let mut iterations = 0;
        loop {
            general_mat_vec_mul(1.0, &self.weight, &self.y, 0.0, &mut self.x);
            self.x.mapv_inplace(activate);
            history.push(&self.y);
            general_mat_vec_mul(1.0, &self.weight.t(), &self.x, 0.0, &mut self.y);
            iterations += 1;

            if history.seen(&self.y) {
                break;
            }
            self.check_ceiling(iterations)?;
        }

        debug!("Right recall settled after {} iterations", iterations);
        Ok(Recall {
            pattern: decode(&self.x, self.dims.n, self.dims.m)?,
            iterations,
        })
    }

    fn check_ceiling(&self, iterations: usize) -> Result<()> {
        match self.config.max_iterations {
            Some(max) if iterations >= max => {
                warn!("Recall stopped at the {} iteration ceiling", max);
                Err(BamError::NoConvergence { iterations })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BamConfig;
    use crate::error::ErrorKind;
    use crate::store::Dims;
    use rand::rngs::StdRng;
    use rand::seq::index::sample;
    use rand::SeedableRng;
    use std::path::Path;

    fn stored_pair(path: &Path) -> (Model, Pattern, Pattern) {
        let mut model = Model::create(path, Dims::new(2, 2, 2), BamConfig::default()).unwrap();
        let a = Pattern::from_rows(&[[1, 0], [0, 1]]).unwrap();
        let b = Pattern::from_rows(&[[0, 1], [1, 0]]).unwrap();
        model.add(&a, &b).unwrap();
        (model, a, b)
    }

    #[test]
    fn test_cycle_detector() {
        let mut d = CycleDetector::new();
        assert!(!d.seen(&1));

        d.push(&1);
        assert!(d.seen(&1)); // fixed point
        assert!(!d.seen(&2));

        d.push(&2);
        assert!(d.seen(&1)); // 2-cycle
        assert!(d.seen(&2));

        d.push(&3);
        assert!(!d.seen(&1), "only two states are remembered");

        d.reset();
        assert!(!d.seen(&2));
        assert!(!d.seen(&3));
    }

    #[test]
    fn test_right_recall_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (mut model, a, b) = stored_pair(&dir.path().join("bam.txt"));

        let recall = model.associate_from_right(&b).unwrap();
        assert_eq!(recall.pattern.to_binary(), a);
        // Right-side output is already bipolar
        assert_eq!(
            recall.pattern,
            Pattern::from_shape_vec(2, 2, vec![1.0, -1.0, -1.0, 1.0]).unwrap()
        );
        assert_eq!(recall.iterations, 2);
    }

    #[test]
    fn test_left_recall_returns_raw_product() {
        let dir = tempfile::tempdir().unwrap();
        let (mut model, a, b) = stored_pair(&dir.path().join("bam.txt"));

        let recall = model.associate_from_left(&a).unwrap();
        assert_eq!(
            recall.pattern,
            Pattern::from_shape_vec(2, 2, vec![-4.0, 4.0, 4.0, -4.0]).unwrap()
        );
        assert_eq!(recall.pattern.to_binary(), b);
        assert_eq!(recall.iterations, 1);
    }

    #[test]
    fn test_recall_does_not_mutate_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let (mut model, a, b) = stored_pair(&path);
        let weight = model.weight().clone();
        let file = std::fs::read(&path).unwrap();

        model.associate_from_left(&a).unwrap();
        model.associate_from_right(&b).unwrap();

        assert_eq!(model.weight(), &weight);
        assert_eq!(model.capacity(), 0);
        assert!(!model.is_dirty());
        assert_eq!(std::fs::read(&path).unwrap(), file);
    }

    #[test]
    fn test_recall_two_orthogonal_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let mut model = Model::create(&path, Dims::new(1, 4, 1), BamConfig::default()).unwrap();

        let a1 = Pattern::from_rows(&[[1, 1, 0, 0]]).unwrap();
        let b1 = Pattern::from_rows(&[[1], [0], [0], [1]]).unwrap();
        let a2 = Pattern::from_rows(&[[1, 0, 1, 0]]).unwrap();
        let b2 = Pattern::from_rows(&[[1], [1], [1], [1]]).unwrap();
        model.add(&a1, &b1).unwrap();
        model.add(&a2, &b2).unwrap();

        assert_eq!(model.associate_from_left(&a1).unwrap().pattern.to_binary(), b1);
        assert_eq!(model.associate_from_left(&a2).unwrap().pattern.to_binary(), b2);
        assert_eq!(model.associate_from_right(&b1).unwrap().pattern.to_binary(), a1);
        assert_eq!(model.associate_from_right(&b2).unwrap().pattern.to_binary(), a2);
    }

    #[test]
    fn test_recall_from_noisy_cue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let mut model = Model::create(&path, Dims::new(4, 4, 4), BamConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let a = Pattern::from_rows(&[
            [1, 0, 1, 1],
            [0, 0, 1, 0],
            [1, 1, 0, 0],
            [0, 1, 0, 1],
        ])
        .unwrap();
        let b = Pattern::from_rows(&[
            [0, 1, 1, 0],
            [1, 0, 0, 1],
            [1, 1, 0, 0],
            [0, 0, 1, 1],
        ])
        .unwrap();
        model.add(&a, &b).unwrap();

        // Flip 3 of 16 cells in the cue
        let mut noisy = a.as_array().clone();
        for idx in sample(&mut rng, 16, 3).into_vec() {
            let cell = &mut noisy[[idx / 4, idx % 4]];
            *cell = 1.0 - *cell;
        }
        let noisy = Pattern::from_array(noisy);
        assert_ne!(noisy, a);

        let recall = model.associate_from_left(&noisy).unwrap();
        assert_eq!(recall.pattern.to_binary(), b);
        assert!(recall.iterations <= 2);
    }

    #[test]
    fn test_empty_memory_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let mut model = Model::create(&path, Dims::new(2, 2, 2), BamConfig::unbounded()).unwrap();

        let a = Pattern::from_rows(&[[1, 0], [0, 1]]).unwrap();
        let recall = model.associate_from_left(&a).unwrap();
        assert!(recall.pattern.as_array().iter().all(|&v| v == 0.0));
        assert_eq!(recall.iterations, 2);
    }

    #[test]
    fn test_iteration_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let (mut model, a, b) = stored_pair(&path);
        model.config.max_iterations = Some(1);

        // Settles on the first pass, so the ceiling is not hit
        assert!(model.associate_from_left(&a).is_ok());

        let err = model.associate_from_right(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
        assert!(matches!(err, BamError::NoConvergence { iterations: 1 }));
    }

    #[test]
    fn test_recall_dimension_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bam.txt");
        let (mut model, _, _) = stored_pair(&path);
        let weight = model.weight().clone();

        let wrong = Pattern::from_rows(&[[1, 0, 1]]).unwrap();
        let err = model.associate_from_left(&wrong).unwrap_err();
        assert!(matches!(err, BamError::Dimension { side: Side::Left, expected: 4, got: 3 }));

        let err = model.associate_from_right(&wrong).unwrap_err();
        assert!(matches!(err, BamError::Dimension { side: Side::Right, expected: 4, got: 3 }));

        assert_eq!(model.weight(), &weight);
        assert_eq!(model.capacity(), 0);
    }
}
