//! On-disk representation of a BAM.
//!
//! ```text
//! <capacity>
//! <N> <M> <P>
//! (N*M) lines of (M*P) integers, each followed by a space
//! ```

use crate::capacity::max_pairs;
use crate::config::SaveMode;
use crate::error::{BamError, Result};
use crate::text::Tokens;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration dimensions. `A` patterns are `N x M`, `B` patterns are `M x P`;
/// the weight matrix is `(N*M) x (M*P)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub n: usize,
    pub m: usize,
    pub p: usize,
}

impl Dims {
    pub fn new(n: usize, m: usize, p: usize) -> Self {
        Self { n, m, p }
    }

    /// Weight rows (`N*M`), i.e. flattened length of an `A` pattern.
    pub fn rows(&self) -> usize {
        self.n * self.m
    }

    /// Weight columns (`M*P`), i.e. flattened length of a `B` pattern.
    pub fn cols(&self) -> usize {
        self.m * self.p
    }

    /// `(rows, cols, rows*cols)`, or `None` if any product overflows.
    pub fn checked_shape(&self) -> Option<(usize, usize, usize)> {
        let rows = self.n.checked_mul(self.m)?;
        let cols = self.m.checked_mul(self.p)?;
        Some((rows, cols, rows.checked_mul(cols)?))
    }

    /// Capacity estimate written into a fresh store.
    pub fn initial_capacity(&self) -> i64 {
        max_pairs(self.rows().min(self.cols()))
    }
}

/// Store header: the two metadata lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub capacity: i64,
    pub dims: Dims,
}

/// Write a new store holding an all-zero weight matrix. Overwrites `path`.
///
/// Returns the capacity estimate recorded in the header.
pub fn create(path: impl AsRef<Path>, dims: Dims) -> Result<i64> {
    let path = path.as_ref();
    let (_, _, total) = dims
        .checked_shape()
        .ok_or_else(|| BamError::format(path, 2, "matrix dimensions overflow"))?;
    let header = Header {
        capacity: dims.initial_capacity(),
        dims,
    };

    write_file(path, &header, SaveMode::Truncate, |_, _| 0)?;

    info!(
        "Created store {} ({}x{} weights, {} cells, capacity {})",
        path.display(),
        dims.rows(),
        dims.cols(),
        total,
        header.capacity
    );
    Ok(header.capacity)
}

/// Parse a store file into its header and weight matrix.
pub(crate) fn read(path: &Path) -> Result<(Header, Array2<f64>)> {
    let text = std::fs::read_to_string(path).map_err(|e| BamError::io(path, e))?;
    let mut tokens = Tokens::new(path, &text);

    let capacity: i64 = tokens.parse("capacity")?;
    let dims = Dims {
        n: tokens.parse("N")?,
        m: tokens.parse("M")?,
        p: tokens.parse("P")?,
    };
    let (rows, cols, total) = dims
        .checked_shape()
        .ok_or_else(|| tokens.error("matrix dimensions overflow"))?;

    let mut values: Vec<f64> = Vec::new();
    values
        .try_reserve_exact(total)
        .map_err(|_| BamError::Memory { elements: total })?;
    for _ in 0..total {
        let w: i64 = tokens.parse("weight")?;
        values.push(w as f64);
    }
    if tokens.next_token().is_some() {
        return Err(tokens.error(format!(
            "trailing data after {}x{} weight matrix",
            rows, cols
        )));
    }

    let weight = Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| BamError::format(path, tokens.line(), e.to_string()))?;
    Ok((Header { capacity, dims }, weight))
}

/// Rewrite the store from in-memory state.
pub(crate) fn write(path: &Path, header: &Header, weight: &Array2<f64>, mode: SaveMode) -> Result<()> {
    write_file(path, header, mode, |i, j| weight[[i, j]] as i64)
}

fn write_file<F>(path: &Path, header: &Header, mode: SaveMode, cell: F) -> Result<()>
where
    F: Fn(usize, usize) -> i64,
{
    match mode {
        SaveMode::Truncate => write_to_path(path, header, &cell),
        SaveMode::Atomic => {
            let tmp = temp_sibling(path);
            if let Err(e) = write_to_path(&tmp, header, &cell) {
                let _ = std::fs::remove_file(&tmp);
                return Err(e);
            }
            std::fs::rename(&tmp, path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                BamError::io(path, e)
            })
        }
    }
}

fn write_to_path<F>(path: &Path, header: &Header, cell: &F) -> Result<()>
where
    F: Fn(usize, usize) -> i64,
{
    let file = File::create(path).map_err(|e| BamError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_contents(&mut writer, header, cell).map_err(|e| BamError::io(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| BamError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| BamError::io(path, e))
}

fn write_contents<W, F>(w: &mut W, header: &Header, cell: &F) -> std::io::Result<()>
where
    W: Write,
    F: Fn(usize, usize) -> i64,
{
    let dims = header.dims;
    writeln!(w, "{}", header.capacity)?;
    writeln!(w, "{} {} {}", dims.n, dims.m, dims.p)?;
    for i in 0..dims.rows() {
        for j in 0..dims.cols() {
            write!(w, "{} ", cell(i, j))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
