//! Trace of a random matrix product
//!
//! Not cancellable: this is the selector's workload.

use rand::Rng;

/// Exclusive upper bound of generated entries
pub const ENTRY_BOUND: u32 = 10;

/// Square matrix stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix {
    n: usize,
    cells: Vec<u32>,
}

impl SquareMatrix {
    /// Fill an `n x n` matrix with entries in `[0, ENTRY_BOUND)`
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let cells = (0..n * n).map(|_| rng.random_range(0..ENTRY_BOUND)).collect();
        Self { n, cells }
    }

    /// Build from explicit rows
    ///
    /// Returns `None` unless every row has `rows.len()` entries.
    #[must_use]
    pub fn from_rows(rows: &[Vec<u32>]) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|row| row.len() != n) {
            return None;
        }
        Some(Self {
            n,
            cells: rows.concat(),
        })
    }

    /// Dimension
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entry at `(row, col)`
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.n + col]
    }

    /// Trace of `self * rhs` without materialising the product
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    #[must_use]
    pub fn product_trace(&self, rhs: &SquareMatrix) -> u64 {
        assert_eq!(self.n, rhs.n, "matrix dimensions differ");
        let n = self.n;
        let mut trace = 0u64;
        for i in 0..n {
            for k in 0..n {
                trace += u64::from(self.get(i, k)) * u64::from(rhs.get(k, i));
            }
        }
        trace
    }
}

/// Build two random `n x n` matrices and return the trace of their product
pub fn random_product_trace<R: Rng>(n: usize, rng: &mut R) -> u64 {
    let m1 = SquareMatrix::random(n, rng);
    let m2 = SquareMatrix::random(n, rng);
    m1.product_trace(&m2)
}
