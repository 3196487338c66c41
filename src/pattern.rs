//! Rectangular patterns and their text file format.
//!
//! A pattern file holds `rows cols` on the first line followed by `rows`
//! lines of `cols` integers. Values are read as 0/1 (anything nonzero is
//! "on"). Values are written verbatim; threshold recalled patterns with
//! [`Pattern::to_binary`] before saving them as 0/1.

use crate::codec::activate;
use crate::error::{BamError, Result};
use crate::text::Tokens;
use ndarray::Array2;
use std::io::{Read, Write};
use std::path::Path;

/// A 2-D pattern. Input patterns are binary; recalled patterns may carry raw
/// (unthresholded) values, see [`Pattern::to_binary`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    data: Array2<f64>,
}

impl Pattern {
    /// Wrap an existing matrix.
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Build from row-major values.
    pub fn from_shape_vec(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        Array2::from_shape_vec((rows, cols), values)
            .ok()
            .map(Self::from_array)
    }

    /// Build from nested rows of integers. Returns `None` for ragged input.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Option<Self> {
        let n = rows.len();
        let m = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if rows.iter().any(|r| r.as_ref().len() != m) {
            return None;
        }
        let values = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().map(|&v| v as f64))
            .collect();
        Self::from_shape_vec(n, m, values)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Flattened length `rows * cols`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Threshold with the recall activation rule: 1 where the value
    /// activates to +1 (including 0), otherwise 0.
    pub fn to_binary(&self) -> Pattern {
        Pattern {
            data: self.data.mapv(|v| if activate(v) > 0.0 { 1.0 } else { 0.0 }),
        }
    }

    /// Parse the pattern file format.
    pub fn read_from<R: Read>(mut reader: R, origin: &Path) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| BamError::io(origin, e))?;

        let mut tokens = Tokens::new(origin, &text);
        let rows: usize = tokens.parse("row count")?;
        let cols: usize = tokens.parse("column count")?;
        let total = rows
            .checked_mul(cols)
            .ok_or_else(|| tokens.error("pattern shape overflows"))?;

        let mut values: Vec<f64> = Vec::new();
        values
            .try_reserve_exact(total)
            .map_err(|_| BamError::Memory { elements: total })?;
        for _ in 0..total {
            let v: i64 = tokens.parse("pattern value")?;
            values.push(v as f64);
        }

        Self::from_shape_vec(rows, cols, values)
            .ok_or_else(|| tokens.error("pattern shape does not match its values"))
    }

    /// Write the pattern file format, values truncated to integers.
    pub fn write_to<W: Write>(&self, mut writer: W, origin: &Path) -> Result<()> {
        self.write_rows(&mut writer)
            .map_err(|e| BamError::io(origin, e))
    }

    fn write_rows<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "{} {}", self.rows(), self.cols())?;
        for row in self.data.rows() {
            for &v in row {
                write!(w, "{} ", v as i64)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| BamError::io(path, e))?;
        Self::read_from(std::io::BufReader::new(file), path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| BamError::io(path, e))?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer, path)?;
        writer.flush().map_err(|e| BamError::io(path, e))
    }
}
