use std::fmt;

use crate::{ColorBands, ColorStatBuilder, Coordinate};

/// Handle of a segment inside a segmentation's arena
#[derive(Copy, Clone, Debug, Default, Eq, Ord, Hash, PartialEq, PartialOrd)]
pub struct SegmentId(pub SegmentIdElem);

pub type SegmentIdElem = u32;

impl SegmentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a segment came to be
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// A single grid cell.
    Pixel,
    /// The union of two earlier segments.
    Merged { left: SegmentId, right: SegmentId },
}

/// A set of pixels treated as one region.
///
/// Segments are immutable once built. A merged segment holds flattened copies of its two
/// constituents' coordinates and colours, plus the running colour sums used for costing.
#[derive(Clone, Debug)]
pub struct Segment {
    kind: SegmentKind,
    points: Vec<Coordinate>,
    colors: Vec<ColorBands>,
    /// smallest covered coordinate; identifies the segment for tie-breaking
    anchor: Coordinate,
    stat: ColorStatBuilder,
}

impl Segment {
    pub fn pixel(at: Coordinate, color: ColorBands) -> Self {
        let mut stat = ColorStatBuilder::new();
        stat.add(&color);
        Self {
            kind: SegmentKind::Pixel,
            points: vec![at],
            colors: vec![color],
            anchor: at,
            stat,
        }
    }

    /// Flattens `left` and `right` into a new segment. Neither operand is modified.
    pub fn merged(
        left_id: SegmentId,
        left: &Segment,
        right_id: SegmentId,
        right: &Segment,
    ) -> Self {
        let mut points = Vec::with_capacity(left.area() + right.area());
        points.extend_from_slice(&left.points);
        points.extend_from_slice(&right.points);

        let mut colors = Vec::with_capacity(left.area() + right.area());
        colors.extend_from_slice(&left.colors);
        colors.extend_from_slice(&right.colors);

        Self {
            kind: SegmentKind::Merged {
                left: left_id,
                right: right_id,
            },
            points,
            colors,
            anchor: std::cmp::min(left.anchor, right.anchor),
            stat: left.stat.merged(&right.stat),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_pixel(&self) -> bool {
        matches!(self.kind, SegmentKind::Pixel)
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn colors(&self) -> &[ColorBands] {
        &self.colors
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    /// Colour sums over every covered pixel.
    pub fn color_stat(&self) -> &ColorStatBuilder {
        &self.stat
    }
}
