//! Drawing segment boundaries back onto an image.

use crate::{BinaryImage, Color, ColorImage, ColorName, RegionId, Segmenter};

/// Answers which region a pixel belongs to. Only equality of the answers is used.
pub trait RegionQuery {
    type Region: PartialEq;

    fn region_of(&self, x: u32, y: u32) -> Self::Region;
}

impl RegionQuery for Segmenter {
    type Region = Option<RegionId>;

    fn region_of(&self, x: u32, y: u32) -> Self::Region {
        Segmenter::region_of(self, x, y).ok()
    }
}

impl<F, R> RegionQuery for F
where
    F: Fn(u32, u32) -> R,
    R: PartialEq,
{
    type Region = R;

    fn region_of(&self, x: u32, y: u32) -> R {
        self(x, y)
    }
}

/// Marks the boundary pixels of a `2^n` by `2^n` window.
///
/// A pixel is on a boundary if it lies on the outer edge of the window, or if its region
/// differs from that of the pixel to its left or the pixel above it.
///
/// # Example
/// ```
/// use segmenter::boundary_mask;
/// let mask = boundary_mask(2, &|x: u32, _y: u32| x < 2);
/// assert_eq!(mask.to_string(), "****\n*-**\n*-**\n****\n");
/// ```
pub fn boundary_mask<Q>(n: u32, regions: &Q) -> BinaryImage
where
    Q: RegionQuery + ?Sized,
{
    let size = 1u32 << n;
    let mut mask = BinaryImage::new_w_h(size as usize, size as usize);
    for y in 0..size {
        for x in 0..size {
            if is_boundary(size, regions, x, y) {
                mask.set_pixel(x as usize, y as usize, true);
            }
        }
    }
    mask
}

/// Copies the top-left `2^n` by `2^n` window of `image`, painting boundary pixels blue.
pub fn overlay_segmentation<Q>(image: &ColorImage, n: u32, regions: &Q) -> ColorImage
where
    Q: RegionQuery + ?Sized,
{
    let mask = boundary_mask(n, regions);
    let blue = Color::color(&ColorName::Blue);
    let mut output = ColorImage::new_w_h(mask.width, mask.height);
    for y in 0..mask.height {
        for x in 0..mask.width {
            let color = if mask.get_pixel(x, y) {
                blue
            } else {
                image.get_pixel_safe(x, y).unwrap_or_default()
            };
            output.set_pixel(x, y, &color);
        }
    }
    output
}

fn is_boundary<Q>(size: u32, regions: &Q, x: u32, y: u32) -> bool
where
    Q: RegionQuery + ?Sized,
{
    if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
        return true;
    }
    let here = regions.region_of(x, y);
    here != regions.region_of(x - 1, y) || here != regions.region_of(x, y - 1)
}
