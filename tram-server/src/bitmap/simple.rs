//! Fixed-size bitmap over `u64` words.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// A fixed-size set of bit positions `0..size`.
///
/// Bits past `size` in the final word are always zero, so word-wise
/// comparison and counting need no masking.
///
/// # Panics
///
/// Every method taking a position panics if it is out of range, and every
/// binary operation panics if the two sizes differ. Either means the caller
/// has got its indexes out of step with the bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleBitmap {
    size: usize,
    words: Vec<u64>,
}

impl SimpleBitmap {
    /// An all-clear bitmap of `size` bits.
    pub fn create(size: usize) -> Self {
        Self {
            size,
            words: vec![0; size.div_ceil(WORD_BITS)],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn locate(&self, position: usize) -> (usize, u64) {
        assert!(
            position < self.size,
            "bit {position} out of range for bitmap of size {}",
            self.size
        );
        (position / WORD_BITS, 1 << (position % WORD_BITS))
    }

    #[inline]
    pub fn set(&mut self, position: usize) {
        let (word, mask) = self.locate(position);
        self.words[word] |= mask;
    }

    /// Set or clear a bit.
    pub fn set_to(&mut self, position: usize, value: bool) {
        if value {
            self.set(position);
        } else {
            self.clear(position);
        }
    }

    #[inline]
    pub fn clear(&mut self, position: usize) {
        let (word, mask) = self.locate(position);
        self.words[word] &= !mask;
    }

    #[inline]
    pub fn get(&self, position: usize) -> bool {
        let (word, mask) = self.locate(position);
        self.words[word] & mask != 0
    }

    pub fn set_all(&mut self) {
        self.words.fill(u64::MAX);
        self.mask_tail();
    }

    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// Flip every bit.
    pub fn invert(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
        self.mask_tail();
    }

    fn mask_tail(&mut self) {
        let used = self.size % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Copy of bits `start..end` as a new bitmap of size `end - start`.
    pub fn submap(&self, start: usize, end: usize) -> SimpleBitmap {
        assert!(
            start <= end && end <= self.size,
            "submap {start}..{end} out of range for bitmap of size {}",
            self.size
        );
        let mut result = SimpleBitmap::create(end - start);
        for position in self.ones_from(start).take_while(|p| *p < end) {
            result.set(position - start);
        }
        result
    }

    fn check_same_size(&self, other: &SimpleBitmap) {
        assert_eq!(
            self.size, other.size,
            "bitmap size mismatch: {} vs {}",
            self.size, other.size
        );
    }

    pub fn and(&mut self, other: &SimpleBitmap) {
        self.check_same_size(other);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
        }
    }

    pub fn or(&mut self, other: &SimpleBitmap) {
        self.check_same_size(other);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// Clear every bit that is set in `other`.
    pub fn and_not(&mut self, other: &SimpleBitmap) {
        self.check_same_size(other);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !*b;
        }
    }

    /// True if any bit is set in both.
    pub fn intersects(&self, other: &SimpleBitmap) -> bool {
        self.check_same_size(other);
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Positions of set bits in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.ones_from(0)
    }

    fn ones_from(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        let first_word = start / WORD_BITS;
        self.words
            .iter()
            .enumerate()
            .skip(first_word)
            .flat_map(|(index, word)| {
                let mut remaining = *word;
                std::iter::from_fn(move || {
                    if remaining == 0 {
                        return None;
                    }
                    let bit = remaining.trailing_zeros() as usize;
                    remaining &= remaining - 1;
                    Some(index * WORD_BITS + bit)
                })
            })
            .filter(move |p| *p >= start)
    }
}

/// Read-only view of a bitmap, handed out for matrix rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableBitmap(SimpleBitmap);

impl ImmutableBitmap {
    pub(crate) fn new(bitmap: SimpleBitmap) -> Self {
        Self(bitmap)
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, position: usize) -> bool {
        self.0.get(position)
    }

    pub fn cardinality(&self) -> usize {
        self.0.cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersects(&self, other: &SimpleBitmap) -> bool {
        self.0.intersects(other)
    }

    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.ones()
    }

    /// Mutable copy of the underlying bits.
    pub fn to_bitmap(&self) -> SimpleBitmap {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let mut bits = SimpleBitmap::create(130);
        bits.set(0);
        bits.set(64);
        bits.set(129);

        assert!(bits.get(0));
        assert!(bits.get(64));
        assert!(bits.get(129));
        assert!(!bits.get(1));
        assert_eq!(bits.cardinality(), 3);

        bits.clear(64);
        assert!(!bits.get(64));
        assert_eq!(bits.cardinality(), 2);

        bits.set_to(5, true);
        bits.set_to(0, false);
        assert_eq!(bits.ones().collect::<Vec<_>>(), vec![5, 129]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_panics() {
        let bits = SimpleBitmap::create(10);
        bits.get(10);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn size_mismatch_panics() {
        let mut a = SimpleBitmap::create(10);
        let b = SimpleBitmap::create(11);
        a.or(&b);
    }

    #[test]
    fn set_all_respects_size() {
        let mut bits = SimpleBitmap::create(70);
        bits.set_all();
        assert_eq!(bits.cardinality(), 70);

        bits.invert();
        assert!(bits.is_empty());
    }

    #[test]
    fn submap_extracts_range() {
        let mut bits = SimpleBitmap::create(200);
        for p in [3, 63, 64, 100, 150] {
            bits.set(p);
        }
        let sub = bits.submap(60, 110);
        assert_eq!(sub.size(), 50);
        assert_eq!(sub.ones().collect::<Vec<_>>(), vec![3, 4, 40]);

        assert!(bits.submap(10, 10).is_empty());
    }

    #[test]
    fn boolean_operations() {
        let mut a = SimpleBitmap::create(8);
        let mut b = SimpleBitmap::create(8);
        a.set(1);
        a.set(2);
        b.set(2);
        b.set(3);

        assert!(a.intersects(&b));

        let mut and = a.clone();
        and.and(&b);
        assert_eq!(and.ones().collect::<Vec<_>>(), vec![2]);

        let mut or = a.clone();
        or.or(&b);
        assert_eq!(or.ones().collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut diff = a.clone();
        diff.and_not(&b);
        assert_eq!(diff.ones().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn immutable_view() {
        let mut bits = SimpleBitmap::create(4);
        bits.set(2);
        let view = ImmutableBitmap::new(bits.clone());
        assert!(view.get(2));
        assert_eq!(view.cardinality(), 1);
        assert_eq!(view.to_bitmap(), bits);
    }
}
