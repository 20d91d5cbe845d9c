//! Subsampled marker positions: the hand-off between simulation and replay.
//!
//! Sample index `k` of every marker corresponds to simulation step `k · increment`.
//! The text form lists one position per line, one marker after another, with a blank
//! line closing each marker's block.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::math::Scalar;

/// Errors raised while building, encoding or decoding a sample table.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Underlying reader or writer failed.
    #[error("sample table I/O failed: {0}")]
    Io(#[from] io::Error),
    /// A line did not hold a floating-point value.
    #[error("line {line}: cannot parse {token:?} as a loop position")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Offending text.
        token: String,
    },
    /// A line held NaN or an infinity.
    #[error("line {line}: loop position is not finite")]
    NonFinite {
        /// One-based line number.
        line: usize,
    },
    /// Marker blocks have different lengths.
    #[error("marker {marker} has {found} samples, expected {expected}")]
    Ragged {
        /// Marker whose block differs from the first one.
        marker: usize,
        /// Length of the first block.
        expected: usize,
        /// Length of this block.
        found: usize,
    },
    /// The table holds no markers.
    #[error("sample table is empty")]
    Empty,
    /// A sampling stride of zero was requested.
    #[error("sampling increment must be >= 1")]
    ZeroIncrement,
    /// Table was produced with a different sampling stride than the replay expects.
    #[error("sample table uses increment {found}, configuration expects {expected}")]
    IncrementMismatch {
        /// Stride recorded in the table.
        found: usize,
        /// Stride the configuration implies.
        expected: usize,
    },
    /// Table dimensions disagree with the configuration used to replay it.
    #[error(
        "sample table is {markers}x{samples}, \
         configuration expects {expected_markers}x{expected_samples}"
    )]
    ShapeMismatch {
        /// Markers in the table.
        markers: usize,
        /// Samples per marker in the table.
        samples: usize,
        /// Markers the configuration implies.
        expected_markers: usize,
        /// Samples per marker the configuration implies.
        expected_samples: usize,
    },
}

/// Per-marker loop positions kept at a fixed stride of simulation steps.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore {
    rows: Vec<Vec<Scalar>>,
    increment: usize,
}

impl SampleStore {
    /// Keeps steps `0, increment, 2·increment, …` of every dense trajectory.
    pub fn sample(positions: &[Vec<Scalar>], increment: usize) -> Result<Self, SampleError> {
        if increment == 0 {
            return Err(SampleError::ZeroIncrement);
        }
        let rows = positions
            .iter()
            .map(|trajectory| trajectory.iter().step_by(increment).copied().collect())
            .collect();
        Ok(Self { rows, increment })
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Scalar>>, increment: usize) -> Self {
        Self { rows, increment }
    }

    /// Stride between stored samples, in simulation steps.
    #[must_use]
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Number of markers.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of samples per marker.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Simulation step recorded by sample `sample`.
    #[must_use]
    pub fn sim_step(&self, sample: usize) -> usize {
        sample * self.increment
    }

    /// Loop position of `marker` at sample `sample`.
    #[must_use]
    pub fn position(&self, marker: usize, sample: usize) -> Option<Scalar> {
        self.rows.get(marker)?.get(sample).copied()
    }

    /// All samples of `marker`.
    #[must_use]
    pub fn row(&self, marker: usize) -> Option<&[Scalar]> {
        self.rows.get(marker).map(Vec::as_slice)
    }

    /// Positions of every marker at sample `sample`, in marker order.
    pub fn column(&self, sample: usize) -> impl Iterator<Item = Scalar> + '_ {
        self.rows.iter().filter_map(move |row| row.get(sample).copied())
    }

    /// Checks the table against the dimensions a replay configuration expects.
    pub fn check_shape(
        &self,
        expected_markers: usize,
        expected_samples: usize,
    ) -> Result<(), SampleError> {
        if self.marker_count() != expected_markers || self.sample_count() != expected_samples {
            return Err(SampleError::ShapeMismatch {
                markers: self.marker_count(),
                samples: self.sample_count(),
                expected_markers,
                expected_samples,
            });
        }
        Ok(())
    }
}

/// Writes `store` in the blank-line separated text form.
pub fn write_sample_table<W: Write>(mut w: W, store: &SampleStore) -> Result<(), SampleError> {
    for row in &store.rows {
        for value in row {
            writeln!(w, "{value}")?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

/// Reads a table written by [`write_sample_table`].
///
/// The stride is not part of the text form; pass the one the producing run used.
pub fn read_sample_table<R: BufRead>(
    reader: R,
    increment: usize,
) -> Result<SampleStore, SampleError> {
    if increment == 0 {
        return Err(SampleError::ZeroIncrement);
    }
    let mut rows: Vec<Vec<Scalar>> = Vec::new();
    let mut block = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let token = line.trim();
        if token.is_empty() {
            if !block.is_empty() {
                rows.push(std::mem::take(&mut block));
            }
            continue;
        }
        let value: Scalar = token.parse().map_err(|_| SampleError::Parse {
            line: index + 1,
            token: token.to_owned(),
        })?;
        if !value.is_finite() {
            return Err(SampleError::NonFinite { line: index + 1 });
        }
        block.push(value);
    }
    if !block.is_empty() {
        rows.push(block);
    }

    let expected = rows.first().map(Vec::len).ok_or(SampleError::Empty)?;
    if let Some((marker, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != expected) {
        return Err(SampleError::Ragged {
            marker,
            expected,
            found: row.len(),
        });
    }
    tracing::debug!(markers = rows.len(), samples = expected, increment, "sample table read");
    Ok(SampleStore { rows, increment })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn dense() -> Vec<Vec<Scalar>> {
        vec![
            (0..10).map(|i| i as Scalar * 0.5).collect(),
            (0..10).map(|i| 100.0 + i as Scalar * 0.5).collect(),
        ]
    }

    #[test]
    fn sample_zero_is_step_zero() {
        let positions = dense();
        let store = SampleStore::sample(&positions, 4).expect("samples");
        for (marker, trajectory) in positions.iter().enumerate() {
            assert_eq!(store.position(marker, 0), Some(trajectory[0]));
        }
    }

    #[test]
    fn sample_index_maps_to_stride_multiples() {
        let positions = dense();
        let store = SampleStore::sample(&positions, 4).expect("samples");
        assert_eq!(store.sample_count(), 3);
        for sample in 0..store.sample_count() {
            let step = store.sim_step(sample);
            assert_eq!(step, sample * 4);
            assert_eq!(store.position(1, sample), Some(positions[1][step]));
        }
        assert_eq!(store.position(0, 3), None);
        assert_eq!(store.position(2, 0), None);
    }

    #[test]
    fn column_lists_markers_in_order() {
        let store = SampleStore::sample(&dense(), 3).expect("samples");
        let column: Vec<Scalar> = store.column(1).collect();
        assert_eq!(column, vec![1.5, 101.5]);
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(matches!(SampleStore::sample(&dense(), 0), Err(SampleError::ZeroIncrement)));
    }

    #[test]
    fn text_form_separates_markers_with_blank_lines() {
        let store = SampleStore::from_rows(vec![vec![0.0, 1.25], vec![3199.5, 2.0]], 20);
        let mut buf = Vec::new();
        write_sample_table(&mut buf, &store).expect("writes");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "0\n1.25\n\n3199.5\n2\n\n");
    }

    #[test]
    fn text_form_reads_back_exactly() {
        let dense = [vec![0.1, 0.2, 1.0 / 3.0], vec![2.5e-7, 3000.000001, 42.0]];
        let store = SampleStore::sample(&dense, 1).expect("samples");
        let mut buf = Vec::new();
        write_sample_table(&mut buf, &store).expect("writes");
        let read = read_sample_table(Cursor::new(buf), 1).expect("reads");
        assert_eq!(read, store);
    }

    #[test]
    fn malformed_token_reports_line() {
        let err = read_sample_table(Cursor::new("1.0\n2.0\n\nabc\n"), 10).unwrap_err();
        assert!(matches!(err, SampleError::Parse { line: 4, ref token } if token == "abc"));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let err = read_sample_table(Cursor::new("1.0\nNaN\n\n"), 10).unwrap_err();
        assert!(matches!(err, SampleError::NonFinite { line: 2 }));
    }

    #[test]
    fn ragged_blocks_are_rejected() {
        let err = read_sample_table(Cursor::new("1\n2\n\n3\n\n"), 10).unwrap_err();
        assert!(matches!(err, SampleError::Ragged { marker: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(read_sample_table(Cursor::new("\n\n"), 10), Err(SampleError::Empty)));
    }

    #[test]
    fn missing_trailing_blank_line_is_tolerated() {
        let store = read_sample_table(Cursor::new("1\n2\n\n3\n4"), 5).expect("reads");
        assert_eq!(store.marker_count(), 2);
        assert_eq!(store.position(1, 1), Some(4.0));
        assert_eq!(store.sim_step(1), 5);
    }

    #[test]
    fn shape_check_flags_mismatched_configuration() {
        let store = SampleStore::from_rows(vec![vec![0.0; 4]; 3], 10);
        store.check_shape(3, 4).expect("matches");
        let err = store.check_shape(64, 4).unwrap_err();
        assert!(matches!(err, SampleError::ShapeMismatch { markers: 3, .. }));
    }
}
