use num_traits::PrimInt;
use std::fmt;

/// Generic point in 2D space
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

/// Position of a pixel on the segmentation grid. Ordering is lexicographic (x, then y).
pub type Coordinate = Point2<u32>;

impl<T> Point2<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> Point2<T>
where
    T: PrimInt,
{
    /// Returns true if the point lies inside the square `[0, size) x [0, size)`.
    #[inline]
    pub fn within(&self, size: T) -> bool {
        self.x >= T::zero() && self.y >= T::zero() && self.x < size && self.y < size
    }

    /// The 4-connected neighbours (right, left, down, up) of this point that lie inside
    /// the square `[0, size) x [0, size)`.
    ///
    /// # Example
    /// ```
    /// use segmenter::Coordinate;
    /// let corner = Coordinate::new(0, 0);
    /// let neighbours: Vec<_> = corner.neighbours_within(4).collect();
    /// assert_eq!(neighbours, [Coordinate::new(1, 0), Coordinate::new(0, 1)]);
    /// ```
    pub fn neighbours_within(self, size: T) -> impl Iterator<Item = Self> {
        let one = T::one();
        let right = self.x.checked_add(&one).map(|x| Self::new(x, self.y));
        let left = self.x.checked_sub(&one).map(|x| Self::new(x, self.y));
        let down = self.y.checked_add(&one).map(|y| Self::new(self.x, y));
        let up = self.y.checked_sub(&one).map(|y| Self::new(self.x, y));

        IntoIterator::into_iter([right, left, down, up])
            .flatten()
            .filter(move |p| p.within(size))
    }
}

impl<T> fmt::Display for Point2<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<T> From<(T, T)> for Point2<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_in_the_middle() {
        let p = Coordinate::new(1, 1);
        let mut neighbours: Vec<_> = p.neighbours_within(3).collect();
        neighbours.sort();
        assert_eq!(
            neighbours,
            [
                Coordinate::new(0, 1),
                Coordinate::new(1, 0),
                Coordinate::new(1, 2),
                Coordinate::new(2, 1),
            ]
        );
    }

    #[test]
    fn neighbours_clipped_at_far_edge() {
        let p = Coordinate::new(3, 3);
        let neighbours: Vec<_> = p.neighbours_within(4).collect();
        assert_eq!(neighbours, [Coordinate::new(2, 3), Coordinate::new(3, 2)]);
    }

    #[test]
    fn single_cell_grid_has_no_neighbours() {
        assert_eq!(Coordinate::new(0, 0).neighbours_within(1).count(), 0);
    }

    #[test]
    fn signed_points_reject_negatives() {
        assert!(!Point2::new(-1i32, 0).within(4));
        assert!(Point2::new(3i32, 0).within(4));
    }

    #[test]
    fn lexicographic_order() {
        assert!(Coordinate::new(0, 5) < Coordinate::new(1, 0));
        assert!(Coordinate::new(1, 0) < Coordinate::new(1, 1));
    }
}
