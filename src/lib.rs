//! Image segmentation by iterative region merging.
//!
//! A `Segmenter` starts with one region per pixel of a `2^n` by `2^n` window and repeatedly
//! merges pairs of neighbouring regions that are each other's cheapest merge, until a full
//! pass over the window changes nothing. The resulting partition can be drawn back onto the
//! image with `overlay_segmentation`.

pub mod color;
pub mod color_stat;
pub mod cost;
pub mod dither;
pub mod error;
pub mod field;
pub mod forest;
pub mod image;
pub mod point;
pub mod render;
pub mod segment;
pub mod segmentation;

pub use color::*;
pub use color_stat::*;
pub use cost::*;
pub use dither::*;
pub use error::SegmentError;
pub use field::*;
pub use forest::SegmentForest;
pub use image::*;
pub use point::*;
pub use render::*;
pub use segment::*;
pub use segmentation::*;
