//! The order in which pixels are offered to the growth step.
//!
//! Rather than scanning rows, the sequence visits the grid in a self-similar, ordered-dither
//! pattern: consecutive seeds are spread across the whole image, so early merges do not all
//! happen in one corner.

use crate::Coordinate;

/// Iterates over every coordinate of a `2^n` by `2^n` grid in dither order.
#[derive(Clone, Debug)]
pub struct DitherOrder {
    bits: u32,
    curr: u64,
    stop: u64,
}

impl DitherOrder {
    pub fn new(n: u32) -> Self {
        let bits = 2 * n;
        Self {
            bits,
            curr: 0,
            stop: 1u64 << bits,
        }
    }

    /// The coordinate visited at position `i` of the sequence.
    pub fn coordinate_at(&self, i: u64) -> Coordinate {
        let r = reverse_bits(i, self.bits);
        let x = odd_bits(r);
        let y = x ^ even_bits(r);
        Coordinate::new(x, y)
    }
}

impl Iterator for DitherOrder {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.curr < self.stop {
            let res = self.coordinate_at(self.curr);
            self.curr += 1;
            Some(res)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.stop - self.curr) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DitherOrder {}

/// Returns all coordinates of a `2^n` by `2^n` grid in dither order.
///
/// # Example
/// ```
/// use segmenter::{dither_order, Coordinate};
/// let order = dither_order(1);
/// assert_eq!(order, [
///     Coordinate::new(0, 0),
///     Coordinate::new(1, 1),
///     Coordinate::new(0, 1),
///     Coordinate::new(1, 0),
/// ]);
/// ```
pub fn dither_order(n: u32) -> Vec<Coordinate> {
    DitherOrder::new(n).collect()
}

/// Reverses the lowest `length` bits of `v`.
fn reverse_bits(v: u64, length: u32) -> u64 {
    (0..length)
        .filter(|i| v & (1 << i) != 0)
        .fold(0, |r, i| r | (1 << (length - i - 1)))
}

/// Packs the bits at positions 0, 2, 4, ...
fn even_bits(v: u64) -> u32 {
    (0..32u32)
        .filter(|i| v & (1 << (2 * i)) != 0)
        .fold(0, |r, i| r | (1 << i))
}

/// Packs the bits at positions 1, 3, 5, ...
fn odd_bits(v: u64) -> u32 {
    (0..32u32)
        .filter(|i| v & (1 << (2 * i + 1)) != 0)
        .fold(0, |r, i| r | (1 << i))
}
