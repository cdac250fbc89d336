pub trait ColorType {
    type ValueType;

    fn channel(&self, c: usize) -> Option<Self::ValueType>;
}

/// RGBA; each channel is 8 bit unsigned
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Color names
pub enum ColorName {
    Black,
    White,
    Blue,
}

/// The colour bands of one pixel, one byte per band (e.g. red, green, blue).
/// All pixels of one image carry the same number of bands.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct ColorBands(Vec<u8>);

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self::new_rgba(r, g, b, 255)
    }

    pub fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn color(name: &ColorName) -> Self {
        match name {
            ColorName::Black => Self::new(0, 0, 0),
            ColorName::White => Self::new(255, 255, 255),
            ColorName::Blue => Self::new(0, 0, 255),
        }
    }

    pub fn to_hex_string(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Red, green and blue as colour bands; alpha is dropped.
    pub fn to_bands(&self) -> ColorBands {
        ColorBands::new(vec![self.r, self.g, self.b])
    }
}

impl ColorType for Color {
    type ValueType = u8;

    fn channel(&self, c: usize) -> Option<Self::ValueType> {
        match c {
            0 => Some(self.r),
            1 => Some(self.g),
            2 => Some(self.b),
            3 => Some(self.a),
            _ => None,
        }
    }
}

impl ColorBands {
    pub fn new(bands: Vec<u8>) -> Self {
        Self(bands)
    }

    /// A single band (grayscale) colour.
    pub fn mono(value: u8) -> Self {
        Self(vec![value])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.0.iter()
    }
}

impl ColorType for ColorBands {
    type ValueType = u8;

    fn channel(&self, c: usize) -> Option<Self::ValueType> {
        self.0.get(c).copied()
    }
}

impl From<Vec<u8>> for ColorBands {
    fn from(bands: Vec<u8>) -> Self {
        Self::new(bands)
    }
}

impl From<&[u8]> for ColorBands {
    fn from(bands: &[u8]) -> Self {
        Self::new(bands.to_vec())
    }
}

impl From<Color> for ColorBands {
    fn from(color: Color) -> Self {
        color.to_bands()
    }
}
