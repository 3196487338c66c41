//! Hebbian learning: superimpose or withdraw one (A, B) association.
//!
//! `weight += x^T y` on add and `weight -= x^T y` on remove, where `x` and
//! `y` are the bipolar encodings of A and B. Both directions are exact
//! inverses over integer-valued weights.

use crate::codec::encode_into;
use crate::error::{BamError, Result, Side};
use crate::model::Model;
use crate::pattern::Pattern;
use ndarray::linalg::general_mat_mul;
use ndarray::Axis;
use tracing::{debug, warn};

impl Model {
    /// Store the association `A <-> B`.
    ///
    /// `A` must flatten to `N*M` values and `B` to `M*P`; otherwise nothing
    /// changes. Decrements the capacity counter (which may go negative) and,
    /// with autosave on, rewrites the store.
    pub fn add(&mut self, a: &Pattern, b: &Pattern) -> Result<()> {
        self.apply_pair(a, b, 1.0)?;
        self.capacity -= 1;
        if self.capacity < 0 {
            warn!(
                "Capacity estimate exceeded ({}), recall quality will degrade",
                self.capacity
            );
        }
        self.persist()
    }

    /// Withdraw the association `A <-> B`.
    ///
    /// Exactly undoes a previous [`Model::add`] of the same pair. Removing a
    /// pair that was never added superimposes its negative correlation.
    pub fn remove(&mut self, a: &Pattern, b: &Pattern) -> Result<()> {
        self.apply_pair(a, b, -1.0)?;
        self.capacity += 1;
        self.persist()
    }

    pub(crate) fn check_pair(&self, a: &Pattern, b: &Pattern) -> Result<()> {
        let (rows, cols) = self.weight.dim();
        if a.len() != rows {
            return Err(BamError::Dimension {
                side: Side::Left,
                expected: rows,
                got: a.len(),
            });
        }
        if b.len() != cols {
            return Err(BamError::Dimension {
                side: Side::Right,
                expected: cols,
                got: b.len(),
            });
        }
        Ok(())
    }

    /// `weight += sign * x^T y`
    fn apply_pair(&mut self, a: &Pattern, b: &Pattern, sign: f64) -> Result<()> {
        self.check_pair(a, b)?;
        encode_into(a, &mut self.x, Side::Left)?;
        encode_into(b, &mut self.y, Side::Right)?;

        let x_col = self.x.view().insert_axis(Axis(1));
        let y_row = self.y.view().insert_axis(Axis(0));
        general_mat_mul(sign, &x_col, &y_row, 1.0, &mut self.weight);

        debug!("x = {}", self.x);
        debug!("y = {}", self.y);
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.dirty = true;
        if self.config.autosave {
            self.save()?;
        }
        Ok(())
    }
}
