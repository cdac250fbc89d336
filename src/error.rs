/// Errors raised while building or querying a segmentation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    /// The coordinate lies outside the `size` x `size` grid.
    #[error("coordinate ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: u32, y: u32, size: u32 },

    /// The configuration cannot be used, even after falling back to defaults.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The colour source has no colour for a coordinate inside the grid.
    #[error("colour source has no pixel at ({x}, {y})")]
    MissingPixel { x: u32, y: u32 },

    /// The colour source changed its band count part way through the grid.
    #[error("pixel ({x}, {y}) has {found} colour bands, expected {expected}")]
    BandCountMismatch {
        x: u32,
        y: u32,
        expected: usize,
        found: usize,
    },

    /// A segment was given a second parent in the segmentation forest.
    #[error("segment {0} already has a parent")]
    ForestConflict(u32),
}
