use crate::ColorBands;

/// Population statistics of one colour band
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BandStat {
    pub count: u64,
    pub mean: f64,
    /// population standard deviation
    pub deviation: f64,
}

/// Used to compute `BandStat`. Sums are kept as integers, so the result does not depend on
/// the order in which samples were added or builders were merged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BandStatBuilder {
    count: u64,
    sum: u64,
    sqsum: u128,
}

impl BandStatBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, v: u8) {
        let v = v as u64;
        self.count += 1;
        self.sum += v;
        self.sqsum += (v * v) as u128;
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.sqsum += other.sqsum;
    }

    pub fn build(&self) -> BandStat {
        if self.count == 0 {
            return BandStat::default();
        }
        let n = self.count as u128;
        let sum = self.sum as u128;
        // n^2 * variance, exact
        let scaled_variance = n * self.sqsum - sum * sum;
        let variance = scaled_variance as f64 / (n * n) as f64;
        BandStat {
            count: self.count,
            mean: self.sum as f64 / self.count as f64,
            deviation: variance.sqrt(),
        }
    }
}

/// Simple statistics of colour samples, one entry per band
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColorStat {
    pub mean: Vec<f64>,
    pub deviation: Vec<f64>,
}

impl ColorStat {
    /// The per-band standard deviations, summed without weighting.
    pub fn total_deviation(&self) -> f64 {
        self.deviation.iter().sum()
    }
}

/// Compute simple statistics from colour samples with any number of bands
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColorStatBuilder {
    bands: Vec<BandStatBuilder>,
}

impl ColorStatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_colors<'a>(colors: impl IntoIterator<Item = &'a ColorBands>) -> Self {
        let mut builder = Self::new();
        for color in colors {
            builder.add(color);
        }
        builder
    }

    pub fn add(&mut self, color: &ColorBands) {
        if self.bands.len() < color.len() {
            self.bands.resize_with(color.len(), BandStatBuilder::new);
        }
        for (band, &v) in self.bands.iter_mut().zip(color.iter()) {
            band.add(v);
        }
    }

    pub fn merge(&mut self, other: &Self) {
        if self.bands.len() < other.bands.len() {
            self.bands.resize_with(other.bands.len(), BandStatBuilder::new);
        }
        for (band, o) in self.bands.iter_mut().zip(other.bands.iter()) {
            band.merge(o);
        }
    }

    /// Statistics of the union of both sample sets, leaving the operands untouched.
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn build(&self) -> ColorStat {
        let stats: Vec<_> = self.bands.iter().map(|b| b.build()).collect();
        ColorStat {
            mean: stats.iter().map(|s| s.mean).collect(),
            deviation: stats.iter().map(|s| s.deviation).collect(),
        }
    }
}
