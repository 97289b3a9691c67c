/// The value-type seam of the decomposition engines.
///
/// The engines never perform arithmetic on transition weights. They only need
/// to know whether a weight denotes an actual edge (`is_positive`) and, during
/// construction, whether it violates the nonnegativity precondition
/// (`is_negative`). This keeps the algorithms usable with plain floating
/// point probabilities as well as exact or symbolic weight types.
pub trait Weight {
    /// True if the weight is strictly greater than zero, i.e., the entry
    /// represents an edge of the underlying graph.
    fn is_positive(&self) -> bool;

    /// True if the weight is strictly smaller than zero. Negative weights are
    /// rejected when a matrix is built.
    fn is_negative(&self) -> bool;
}

impl Weight for f64 {
    fn is_positive(&self) -> bool {
        *self > 0.0
    }

    fn is_negative(&self) -> bool {
        *self < 0.0
    }
}

impl Weight for f32 {
    fn is_positive(&self) -> bool {
        *self > 0.0
    }

    fn is_negative(&self) -> bool {
        *self < 0.0
    }
}

/// A read-only sparse matrix in compressed-sparse-row layout.
///
/// Rows are choice rows of a transition system; columns are successor states.
/// Entries of one row keep their insertion order. The matrix is immutable
/// after construction through [`SparseMatrixBuilder`], so shared references
/// can be read concurrently.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseMatrix<W> {
    column_count: usize,
    /// Entry offsets per row; length is `row count + 1`.
    row_starts: Vec<usize>,
    columns: Vec<usize>,
    weights: Vec<W>,
}

impl<W> SparseMatrix<W> {
    pub fn row_count(&self) -> usize {
        self.row_starts.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn entry_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over the `(column, weight)` entries of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, &W)> {
        let range = self.row_range(row);
        self.columns[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter())
    }

    /// The half-open range of entry indices belonging to `row`. Entry indices
    /// can be resolved with [`SparseMatrix::entry`]; consecutive rows occupy
    /// consecutive ranges.
    pub fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        assert!(
            row < self.row_count(),
            "Row {} out of range for {} rows.",
            row,
            self.row_count()
        );
        self.row_starts[row]..self.row_starts[row + 1]
    }

    /// Resolve an entry index obtained from [`SparseMatrix::row_range`].
    pub fn entry(&self, entry: usize) -> (usize, &W) {
        (self.columns[entry], &self.weights[entry])
    }
}

impl<W: Clone> SparseMatrix<W> {
    /// Derive the backward view of this matrix: row `t` of the result holds
    /// one `(row, weight)` entry for every entry `(t, weight)` of the input,
    /// i.e. it lists the predecessor rows of target state `t`.
    ///
    /// The decomposition engines only traverse the forward view; the backward
    /// view is provided for surrounding analyses such as reachability
    /// precomputation.
    pub fn transpose(&self) -> SparseMatrix<W> {
        let mut row_starts = vec![0usize; self.column_count + 2];
        for &column in &self.columns {
            row_starts[column + 2] += 1;
        }
        for i in 2..row_starts.len() {
            row_starts[i] += row_starts[i - 1];
        }

        let mut columns = vec![0usize; self.columns.len()];
        let mut source_entry = vec![0usize; self.columns.len()];
        for row in 0..self.row_count() {
            for entry in self.row_range(row) {
                let target = self.columns[entry];
                let slot = row_starts[target + 1];
                row_starts[target + 1] += 1;
                columns[slot] = row;
                source_entry[slot] = entry;
            }
        }
        let weights = source_entry
            .iter()
            .map(|&entry| self.weights[entry].clone())
            .collect();

        row_starts.pop();
        SparseMatrix {
            column_count: self.row_count(),
            row_starts,
            columns,
            weights,
        }
    }
}

/// Incremental row-by-row construction of a [`SparseMatrix`].
///
/// Entries must be added with non-decreasing row indices; rows that receive
/// no entries stay empty. Negative weights and out-of-range indices are
/// rejected when the entry is added.
pub struct SparseMatrixBuilder<W> {
    row_count: usize,
    column_count: usize,
    current_row: usize,
    row_starts: Vec<usize>,
    columns: Vec<usize>,
    weights: Vec<W>,
}

impl<W: Weight> SparseMatrixBuilder<W> {
    pub fn new(row_count: usize, column_count: usize) -> SparseMatrixBuilder<W> {
        let mut row_starts = Vec::with_capacity(row_count + 1);
        row_starts.push(0);
        SparseMatrixBuilder {
            row_count,
            column_count,
            current_row: 0,
            row_starts,
            columns: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Append one `(column, weight)` entry to the given row.
    pub fn add_entry(&mut self, row: usize, column: usize, weight: W) -> Result<(), String> {
        if row >= self.row_count {
            return Err(format!(
                "Entry row {} out of range; the matrix has {} rows.",
                row, self.row_count
            ));
        }
        if column >= self.column_count {
            return Err(format!(
                "Entry column {} out of range; the matrix has {} columns.",
                column, self.column_count
            ));
        }
        if row < self.current_row {
            return Err(format!(
                "Entries must be added by non-decreasing row; row {} follows row {}.",
                row, self.current_row
            ));
        }
        if weight.is_negative() {
            return Err(format!("Negative weight in row {}.", row));
        }

        while self.current_row < row {
            self.row_starts.push(self.columns.len());
            self.current_row += 1;
        }
        self.columns.push(column);
        self.weights.push(weight);
        Ok(())
    }

    /// Finish the remaining (empty) rows and produce the matrix.
    pub fn build(mut self) -> SparseMatrix<W> {
        while self.row_starts.len() <= self.row_count {
            self.row_starts.push(self.columns.len());
        }
        SparseMatrix {
            column_count: self.column_count,
            row_starts: self.row_starts,
            columns: self.columns,
            weights: self.weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SparseMatrix, SparseMatrixBuilder};

    fn example() -> SparseMatrix<f64> {
        // 0: -> 1 (1.0)
        // 1: -> 0 (0.5), -> 2 (0.5)
        // 2: (empty)
        // 3: -> 2 (1.0)
        let mut builder = SparseMatrixBuilder::new(4, 3);
        builder.add_entry(0, 1, 1.0).unwrap();
        builder.add_entry(1, 0, 0.5).unwrap();
        builder.add_entry(1, 2, 0.5).unwrap();
        builder.add_entry(3, 2, 1.0).unwrap();
        builder.build()
    }

    #[test]
    fn rows_and_entries() {
        let matrix = example();
        assert_eq!(matrix.row_count(), 4);
        assert_eq!(matrix.entry_count(), 4);
        let row_1: Vec<(usize, f64)> = matrix.row(1).map(|(c, w)| (c, *w)).collect();
        assert_eq!(row_1, vec![(0, 0.5), (2, 0.5)]);
        assert_eq!(matrix.row(2).count(), 0);
        assert_eq!(matrix.row_range(3), 3..4);
        assert_eq!(matrix.entry(3), (2, &1.0));
    }

    #[test]
    fn builder_rejects_bad_input() {
        let mut builder = SparseMatrixBuilder::new(2, 2);
        assert!(builder.add_entry(0, 5, 1.0).is_err());
        assert!(builder.add_entry(5, 0, 1.0).is_err());
        assert!(builder.add_entry(0, 0, -0.25).is_err());
        builder.add_entry(1, 0, 1.0).unwrap();
        assert!(builder.add_entry(0, 0, 1.0).is_err());
    }

    #[test]
    fn transpose_lists_predecessor_rows() {
        let matrix = example();
        let backward = matrix.transpose();
        assert_eq!(backward.row_count(), 3);
        assert_eq!(backward.column_count(), 4);
        // Predecessors of state 2 are rows 1 and 3.
        let preds: Vec<(usize, f64)> = backward.row(2).map(|(c, w)| (c, *w)).collect();
        assert_eq!(preds, vec![(1, 0.5), (3, 1.0)]);
        let preds_0: Vec<usize> = backward.row(0).map(|(c, _)| c).collect();
        assert_eq!(preds_0, vec![1]);
    }
}
