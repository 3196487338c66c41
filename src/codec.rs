//! Bipolar codec: binary patterns to flattened ±1 vectors and back.

use crate::error::{BamError, Result, Side};
use crate::pattern::Pattern;
use ndarray::Array1;

/// Logistic gain. The threshold sits at zero whatever its value.
pub const LAMBDA: f64 = 5.0;

/// Activation `F(s)`: +1 when `logistic(LAMBDA * s) >= 0.5`, else -1.
///
/// Equivalent to `sign(s)` with ties resolved to +1.
#[inline]
pub fn activate(s: f64) -> f64 {
    if 1.0 / (1.0 + (-LAMBDA * s).exp()) >= 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Flatten `pattern` row-major into `out` as +1 (nonzero) / -1 (zero).
///
/// `out` must already have length `rows * cols`; `side` names the weight
/// dimension it is checked against in the error.
pub fn encode_into(pattern: &Pattern, out: &mut Array1<f64>, side: Side) -> Result<()> {
    if pattern.len() != out.len() {
        return Err(BamError::Dimension {
            side,
            expected: out.len(),
            got: pattern.len(),
        });
    }
    for (dst, &v) in out.iter_mut().zip(pattern.as_array().iter()) {
        *dst = if v != 0.0 { 1.0 } else { -1.0 };
    }
    Ok(())
}

/// Allocating form of [`encode_into`].
pub fn encode(pattern: &Pattern) -> Array1<f64> {
    pattern
        .as_array()
        .iter()
        .map(|&v| if v != 0.0 { 1.0 } else { -1.0 })
        .collect()
}

/// Reshape `vector` into a `rows x cols` pattern verbatim (no thresholding).
pub fn decode(vector: &Array1<f64>, rows: usize, cols: usize) -> Result<Pattern> {
    let expected = rows * cols;
    if vector.len() != expected {
        return Err(BamError::Dimension {
            side: Side::Right,
            expected,
            got: vector.len(),
        });
    }
    Pattern::from_shape_vec(rows, cols, vector.to_vec()).ok_or(BamError::Dimension {
        side: Side::Right,
        expected,
        got: vector.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_is_sign_with_ties_up() {
        assert_eq!(activate(0.0), 1.0);
        assert_eq!(activate(1e-9), 1.0);
        assert_eq!(activate(-1e-9), -1.0);
        assert_eq!(activate(-16.0), -1.0);
        assert_eq!(activate(1e6), 1.0);
        assert_eq!(activate(-1e6), -1.0);
    }

    #[test]
    fn test_encode_bipolar_row_major() {
        let p = Pattern::from_rows(&[[1, 0], [0, 1]]).unwrap();
        assert_eq!(encode(&p).to_vec(), vec![1.0, -1.0, -1.0, 1.0]);

        // Any nonzero value is "on"
        let p = Pattern::from_rows(&[[7, 0, -2]]).unwrap();
        assert_eq!(encode(&p).to_vec(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_encode_into_checks_length() {
        let p = Pattern::from_rows(&[[1, 0, 1]]).unwrap();
        let mut out = Array1::zeros(4);
        let err = encode_into(&p, &mut out, Side::Left).unwrap_err();
        match err {
            BamError::Dimension { side, expected, got } => {
                assert_eq!(side, Side::Left);
                assert_eq!(expected, 4);
                assert_eq!(got, 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(out.iter().all(|&v| v == 0.0), "buffer must be untouched");
    }

    #[test]
    fn test_decode_is_verbatim() {
        let v = Array1::from(vec![-4.0, 4.0, 0.5, -4.0]);
        let p = decode(&v, 2, 2).unwrap();
        assert_eq!(p.get(0, 0), Some(-4.0));
        assert_eq!(p.get(1, 0), Some(0.5));
        assert!(decode(&v, 3, 2).is_err());
    }
}
