use std::fmt;
use std::fmt::Write;

pub use bit_vec::BitVec;

use crate::{Color, ColorBands, Coordinate};

/// Image with 1 bit per pixel
#[derive(Debug, Clone, Default)]
pub struct BinaryImage {
    pub pixels: BitVec,
    pub width: usize,
    pub height: usize,
}

/// Image with 4 bytes per pixel
#[derive(Clone, Default)]
pub struct ColorImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Supplies the colour bands of each pixel of the segmentation window.
///
/// Implementations return `None` for coordinates they cannot serve; every coordinate of the
/// configured window must be served, with the same band count.
pub trait ColorSource {
    fn color_bands_at(&self, at: Coordinate) -> Option<ColorBands>;
}

impl BinaryImage {
    pub fn new_w_h(width: usize, height: usize) -> BinaryImage {
        BinaryImage {
            pixels: BitVec::from_elem(width * height, false),
            width,
            height,
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        let i = y * self.width + x;
        self.pixels.get(i).unwrap_or(false)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, v: bool) {
        let i = y * self.width + x;
        self.pixels.set(i, v);
    }

    pub fn area(&self) -> u64 {
        self.pixels.iter().filter(|x| *x).count() as u64
    }

    pub fn from_string(string: &str) -> Self {
        let mut width = 0;
        let mut height = 0;
        for line in string.lines() {
            if height == 0 {
                width = line.len();
            }
            height += 1;
        }
        let mut image = Self::new_w_h(width, height);
        for (y, line) in string.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                image.set_pixel(x, y, c == '*');
            }
        }
        image
    }
}

impl fmt::Display for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_char(if self.get_pixel(x, y) { '*' } else { '-' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl ColorImage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn new_w_h(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Builds an image from a row-major list of colours.
    /// Returns `None` if `colors.len() != width * height`.
    pub fn from_colors(width: usize, height: usize, colors: &[Color]) -> Option<Self> {
        if colors.len() != width * height {
            return None;
        }
        let mut image = Self::new_w_h(width, height);
        for (i, color) in colors.iter().enumerate() {
            image.set_pixel_at(i, color);
        }
        Some(image)
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        let index = y * self.width + x;
        self.get_pixel_at(index)
    }

    pub fn get_pixel_at(&self, index: usize) -> Color {
        let index = index * 4;
        let r = self.pixels[index];
        let g = self.pixels[index + 1];
        let b = self.pixels[index + 2];
        let a = self.pixels[index + 3];

        Color::new_rgba(r, g, b, a)
    }

    pub fn get_pixel_safe(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: &Color) {
        let index = y * self.width + x;
        self.set_pixel_at(index, color);
    }

    pub fn set_pixel_at(&mut self, index: usize, color: &Color) {
        let index = index * 4;
        self.pixels[index] = color.r;
        self.pixels[index + 1] = color.g;
        self.pixels[index + 2] = color.b;
        self.pixels[index + 3] = color.a;
    }
}

/// Reads red, green and blue; the window is the top-left corner of the image.
impl ColorSource for ColorImage {
    fn color_bands_at(&self, at: Coordinate) -> Option<ColorBands> {
        self.get_pixel_safe(at.x as usize, at.y as usize)
            .map(|c| c.to_bands())
    }
}

impl<F> ColorSource for F
where
    F: Fn(Coordinate) -> ColorBands,
{
    fn color_bands_at(&self, at: Coordinate) -> Option<ColorBands> {
        Some(self(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_as_string() {
        let mut image = BinaryImage::new_w_h(2, 2);
        image.set_pixel(0, 0, true);
        image.set_pixel(1, 1, true);
        assert_eq!(image.to_string(), "*-\n".to_owned() + "-*\n");
        let recover = BinaryImage::from_string(&image.to_string());
        assert_eq!(image.width, recover.width);
        assert_eq!(image.height, recover.height);
        assert_eq!(recover.area(), 2);
        for y in 0..image.height {
            for x in 0..image.width {
                assert_eq!(image.get_pixel(x, y), recover.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn color_image_source() {
        let colors = [
            Color::new(1, 2, 3),
            Color::new(4, 5, 6),
            Color::new(7, 8, 9),
            Color::new(10, 11, 12),
        ];
        let image = ColorImage::from_colors(2, 2, &colors).unwrap();
        assert_eq!(
            image.color_bands_at(Coordinate::new(1, 0)),
            Some(ColorBands::new(vec![4, 5, 6]))
        );
        assert_eq!(
            image.color_bands_at(Coordinate::new(0, 1)),
            Some(ColorBands::new(vec![7, 8, 9]))
        );
        assert_eq!(image.color_bands_at(Coordinate::new(2, 0)), None);
    }

    #[test]
    fn from_colors_checks_length() {
        assert!(ColorImage::from_colors(2, 2, &[Color::default()]).is_none());
    }

    #[test]
    fn closure_source() {
        let source = |at: Coordinate| ColorBands::mono((at.x + at.y) as u8);
        assert_eq!(
            source.color_bands_at(Coordinate::new(2, 3)),
            Some(ColorBands::mono(5))
        );
    }
}
