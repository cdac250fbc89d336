//! Heterogeneity of segments and the cost of merging them.

use crate::{ColorStatBuilder, Segment};

/// Sum over colour bands of the population standard deviation of the segment's colours.
/// A segment without colours has deviation 0.
pub fn standard_deviation(segment: &Segment) -> f64 {
    segment.color_stat().build().total_deviation()
}

/// Heterogeneity weighted by size: standard deviation times pixel count.
fn weighted_deviation(stat: &ColorStatBuilder, area: usize) -> f64 {
    stat.build().total_deviation() * area as f64
}

/// The increase in total heterogeneity caused by merging `a` and `b`:
/// `sd(a + b) * |a + b| - sd(a) * |a| - sd(b) * |b|`.
///
/// Lower is better and the result may be negative. The merged statistics are derived from the
/// operands' colour sums, which equals the statistics of the flattened merged segment.
/// The function is symmetric bit for bit.
///
/// # Example
/// ```
/// use segmenter::{merge_cost, ColorBands, Coordinate, Segment};
/// let a = Segment::pixel(Coordinate::new(0, 0), ColorBands::mono(10));
/// let b = Segment::pixel(Coordinate::new(1, 0), ColorBands::mono(12));
/// assert_eq!(merge_cost(&a, &b), 2.0);
/// assert_eq!(merge_cost(&a, &b), merge_cost(&b, &a));
/// ```
pub fn merge_cost(a: &Segment, b: &Segment) -> f64 {
    let merged = a.color_stat().merged(b.color_stat());
    let merged = weighted_deviation(&merged, a.area() + b.area());
    let separate = weighted_deviation(a.color_stat(), a.area())
        + weighted_deviation(b.color_stat(), b.area());
    merged - separate
}
