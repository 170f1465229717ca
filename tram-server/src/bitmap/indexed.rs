//! A rows × columns bit matrix.

use serde::{Deserialize, Serialize};

use super::{ImmutableBitmap, SimpleBitmap};

/// Bit matrix addressed by `(row, column)`, stored row-major in one bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedBitSet {
    rows: usize,
    columns: usize,
    bits: SimpleBitmap,
}

impl IndexedBitSet {
    /// An all-clear matrix.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            bits: SimpleBitmap::create(rows * columns),
        }
    }

    /// An all-clear `size × size` matrix.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// A matrix with every bit set.
    pub fn all_set(rows: usize, columns: usize) -> Self {
        let mut result = Self::new(rows, columns);
        result.bits.set_all();
        result
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn position(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.rows && column < self.columns,
            "({row}, {column}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        row * self.columns + column
    }

    pub fn set(&mut self, row: usize, column: usize) {
        let position = self.position(row, column);
        self.bits.set(position);
    }

    pub fn is_set(&self, row: usize, column: usize) -> bool {
        self.bits.get(self.position(row, column))
    }

    /// Read-only copy of one row.
    pub fn get_row(&self, row: usize) -> ImmutableBitmap {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        let start = row * self.columns;
        ImmutableBitmap::new(self.bits.submap(start, start + self.columns))
    }

    /// Set every bit in `row` that is set in `values`.
    pub fn insert_row(&mut self, row: usize, values: &SimpleBitmap) {
        assert_eq!(
            values.size(),
            self.columns,
            "row of size {} inserted into matrix with {} columns",
            values.size(),
            self.columns
        );
        for column in values.ones() {
            self.set(row, column);
        }
    }

    fn check_same_shape(&self, other: &IndexedBitSet) {
        assert!(
            self.rows == other.rows && self.columns == other.columns,
            "matrix shape mismatch: {}x{} vs {}x{}",
            self.rows,
            self.columns,
            other.rows,
            other.columns
        );
    }

    pub fn and(&mut self, other: &IndexedBitSet) {
        self.check_same_shape(other);
        self.bits.and(&other.bits);
    }

    pub fn or(&mut self, other: &IndexedBitSet) {
        self.check_same_shape(other);
        self.bits.or(&other.bits);
    }

    pub fn and_not(&mut self, other: &IndexedBitSet) {
        self.check_same_shape(other);
        self.bits.and_not(&other.bits);
    }

    /// Flip every bit.
    pub fn invert(&mut self) {
        self.bits.invert();
    }

    /// Same-shaped matrix holding only the bits of `row` and of `column`.
    pub fn copy_row_and_column(&self, row: usize, column: usize) -> IndexedBitSet {
        let mut result = IndexedBitSet::new(self.rows, self.columns);
        for c in self.get_row(row).ones() {
            result.set(row, c);
        }
        for r in 0..self.rows {
            if self.is_set(r, column) {
                result.set(r, column);
            }
        }
        result
    }

    /// All set positions, row-major.
    pub fn get_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.bits.ones().map(move |p| (p / columns, p % columns))
    }

    pub fn number_of_bits_set(&self) -> usize {
        self.bits.cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read() {
        let mut matrix = IndexedBitSet::new(3, 5);
        matrix.set(0, 4);
        matrix.set(2, 0);

        assert!(matrix.is_set(0, 4));
        assert!(matrix.is_set(2, 0));
        assert!(!matrix.is_set(1, 1));
        assert_eq!(matrix.number_of_bits_set(), 2);
        assert_eq!(matrix.get_pairs().collect::<Vec<_>>(), vec![(0, 4), (2, 0)]);
    }

    #[test]
    fn rows_are_independent() {
        let mut matrix = IndexedBitSet::square(70);
        matrix.set(1, 69);
        matrix.set(2, 0);

        let row = matrix.get_row(1);
        assert_eq!(row.size(), 70);
        assert_eq!(row.ones().collect::<Vec<_>>(), vec![69]);
        assert_eq!(matrix.get_row(2).ones().collect::<Vec<_>>(), vec![0]);
        assert!(matrix.get_row(0).is_empty());
    }

    #[test]
    fn insert_row_merges() {
        let mut matrix = IndexedBitSet::new(2, 4);
        matrix.set(1, 0);
        let mut row = SimpleBitmap::create(4);
        row.set(2);
        row.set(3);
        matrix.insert_row(1, &row);

        assert_eq!(matrix.get_row(1).ones().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(matrix.get_row(0).is_empty());
    }

    #[test]
    fn copy_row_and_column_keeps_cross() {
        let mut matrix = IndexedBitSet::square(4);
        for (r, c) in [(0, 1), (1, 1), (1, 3), (2, 2), (3, 1)] {
            matrix.set(r, c);
        }
        let cross = matrix.copy_row_and_column(1, 1);
        assert_eq!(
            cross.get_pairs().collect::<Vec<_>>(),
            vec![(0, 1), (1, 1), (1, 3), (3, 1)]
        );
    }

    #[test]
    fn all_set_and_not() {
        let mut all = IndexedBitSet::all_set(3, 3);
        assert_eq!(all.number_of_bits_set(), 9);

        let mut remove = IndexedBitSet::square(3);
        remove.set(1, 1);
        all.and_not(&remove);
        assert_eq!(all.number_of_bits_set(), 8);
        assert!(!all.is_set(1, 1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_panics() {
        let matrix = IndexedBitSet::new(2, 2);
        matrix.is_set(0, 2);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn shape_mismatch_panics() {
        let mut a = IndexedBitSet::new(2, 3);
        let b = IndexedBitSet::new(3, 2);
        a.and(&b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(rows: usize, columns: usize) -> impl Strategy<Value = IndexedBitSet> {
        proptest::collection::vec(any::<bool>(), rows * columns).prop_map(move |values| {
            let mut m = IndexedBitSet::new(rows, columns);
            for (i, v) in values.into_iter().enumerate() {
                if v {
                    m.set(i / columns, i % columns);
                }
            }
            m
        })
    }

    fn three() -> impl Strategy<Value = (IndexedBitSet, IndexedBitSet, IndexedBitSet)> {
        (1usize..12, 1usize..12)
            .prop_flat_map(|(r, c)| (matrix(r, c), matrix(r, c), matrix(r, c)))
    }

    proptest! {
        #[test]
        fn idempotent((a, _, _) in three()) {
            let mut and = a.clone();
            and.and(&a);
            prop_assert_eq!(&and, &a);
            let mut or = a.clone();
            or.or(&a);
            prop_assert_eq!(&or, &a);
        }

        /// a and (b or c) == (a and b) or (a and c)
        #[test]
        fn and_distributes_over_or((a, b, c) in three()) {
            let mut b_or_c = b.clone();
            b_or_c.or(&c);
            let mut left = a.clone();
            left.and(&b_or_c);

            let mut a_and_b = a.clone();
            a_and_b.and(&b);
            let mut a_and_c = a.clone();
            a_and_c.and(&c);
            a_and_b.or(&a_and_c);

            prop_assert_eq!(left, a_and_b);
        }

        /// not(a and b) == not(a) or not(b)
        #[test]
        fn de_morgan((a, b, _) in three()) {
            let mut left = a.clone();
            left.and(&b);
            left.invert();

            let mut not_a = a.clone();
            not_a.invert();
            let mut not_b = b.clone();
            not_b.invert();
            not_a.or(&not_b);

            prop_assert_eq!(left, not_a);
        }

        /// (a and_not b) never shares a bit with b
        #[test]
        fn and_not_disjoint((a, b, _) in three()) {
            let mut diff = a.clone();
            diff.and_not(&b);
            for (r, c) in diff.get_pairs() {
                prop_assert!(a.is_set(r, c));
                prop_assert!(!b.is_set(r, c));
            }
        }

        #[test]
        fn rows_match_pairs(a in (1usize..12, 1usize..12).prop_flat_map(|(r, c)| matrix(r, c))) {
            let from_rows: usize = (0..a.rows()).map(|r| a.get_row(r).cardinality()).sum();
            prop_assert_eq!(from_rows, a.number_of_bits_set());
            prop_assert_eq!(a.get_pairs().count(), a.number_of_bits_set());
        }
    }
}
