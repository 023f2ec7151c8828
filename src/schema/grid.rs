//! Grid input: a rectangular block of ASCII digit rows.

use std::str::FromStr;

use rand::Rng;

/// A parsed rectangular grid of digit values.
///
/// Rows are stored top-to-bottom, values left-to-right, so a value lives at
/// `rows()[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSpec {
    rows: Vec<Vec<u8>>,
}

impl GridSpec {
    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Row-major cell values.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// A uniformly random digit grid of the given dimensions.
    pub fn random<R: Rng>(width: usize, height: usize, rng: &mut R) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let rows = (0..height)
            .map(|_| (0..width).map(|_| rng.gen_range(0..=9)).collect())
            .collect();
        Ok(Self { rows })
    }
}

impl FromStr for GridSpec {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<u8>> = Vec::new();

        for (y, line) in s.lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let digit = ch.to_digit(10).ok_or(GridError::NonDigit {
                    row: y,
                    column: x,
                    found: ch,
                })?;
                row.push(digit as u8);
            }
            if let Some(first) = rows.first()
                && first.len() != row.len()
            {
                return Err(GridError::RaggedRow {
                    row: y,
                    expected: first.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        if rows.is_empty() || rows[0].is_empty() {
            return Err(GridError::Empty);
        }
        Ok(Self { rows })
    }
}

/// Grid parsing errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid must have at least one row and one column")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}, column {column}: '{found}' is not a digit")]
    NonDigit { row: usize, column: usize, found: char },
}
