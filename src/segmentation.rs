//! Region growing by mutual best fit
//!
//! Every pixel starts as its own region. Pixels are visited in dither order; at each one, the
//! region containing it looks for its cheapest neighbouring region to merge with. If that
//! neighbour regards it as its own cheapest neighbour too, the two merge. Otherwise the search
//! moves on to the neighbour and tries again from there, walking downhill until a mutually best
//! pair is found. Passes over the grid repeat until a whole pass merges nothing.
//!
//! Whenever a choice between equally good regions has to be made, the region whose smallest
//! covered coordinate (its anchor) comes first in (x, y) order wins.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, trace, warn};

use crate::{
    merge_cost, ColorSource, Coordinate, DitherOrder, Field, Segment, SegmentError,
    SegmentForest, SegmentId, SegmentIdElem,
};

pub const DEFAULT_GRID_SIZE_EXPONENT: u32 = 3;
pub const MAX_GRID_SIZE_EXPONENT: u32 = 15;
pub const DEFAULT_MERGE_THRESHOLD: f64 = 800.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SegmenterConfig {
    /// The grid is `2^grid_size_exponent` pixels wide and high. Zero falls back to the default.
    pub grid_size_exponent: u32,
    /// Largest merge cost that may still lead to a merge.
    pub merge_threshold: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            grid_size_exponent: DEFAULT_GRID_SIZE_EXPONENT,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
        }
    }
}

impl SegmenterConfig {
    /// Applies fallbacks and rejects what cannot be repaired.
    fn validated(mut self) -> Result<Self, SegmentError> {
        if self.grid_size_exponent == 0 {
            warn!(
                "grid size exponent must be positive, using {}",
                DEFAULT_GRID_SIZE_EXPONENT
            );
            self.grid_size_exponent = DEFAULT_GRID_SIZE_EXPONENT;
        }
        if self.grid_size_exponent > MAX_GRID_SIZE_EXPONENT {
            return Err(SegmentError::InvalidConfiguration(format!(
                "grid size exponent {} exceeds {}",
                self.grid_size_exponent, MAX_GRID_SIZE_EXPONENT
            )));
        }
        if self.merge_threshold.is_nan() {
            return Err(SegmentError::InvalidConfiguration(
                "merge threshold is NaN".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Identity of a region. Two coordinates belong to the same region iff their identities are equal.
#[derive(Copy, Clone, Debug, Eq, Ord, Hash, PartialEq, PartialOrd)]
pub struct RegionId(SegmentId);

impl RegionId {
    pub fn segment_id(self) -> SegmentId {
        self.0
    }
}

#[derive(Default)]
pub struct Builder {
    conf: SegmenterConfig,
}

macro_rules! config_setter {
    ($name:ident, $t:ty) => {
        pub fn $name(mut self, $name: $t) -> Self {
            self.conf.$name = $name;
            self
        }
    };
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, conf: SegmenterConfig) -> Self {
        self.conf = conf;
        self
    }

    config_setter!(grid_size_exponent, u32);
    config_setter!(merge_threshold, f64);

    /// Reads the pixel window from `source`, leaving every pixel as its own region.
    pub fn build<S>(self, source: &S) -> Result<Segmenter, SegmentError>
    where
        S: ColorSource + ?Sized,
    {
        Segmenter::new(self.conf, source)
    }

    /// Builds and grows until no more merges happen.
    ///
    /// # Example
    /// ```
    /// use segmenter::{Builder, ColorBands, Coordinate};
    /// let source = |at: Coordinate| ColorBands::mono(if at.y == 0 { 10 } else { 200 });
    /// let segmenter = Builder::new()
    ///     .grid_size_exponent(1)
    ///     .merge_threshold(100.0)
    ///     .run(&source)
    ///     .unwrap();
    /// assert_eq!(segmenter.region_of(0, 0), segmenter.region_of(1, 0));
    /// assert_ne!(segmenter.region_of(0, 0), segmenter.region_of(0, 1));
    /// ```
    pub fn run<S>(self, source: &S) -> Result<Segmenter, SegmentError>
    where
        S: ColorSource + ?Sized,
    {
        let mut segmenter = self.build(source)?;
        segmenter.grow_until_stable()?;
        Ok(segmenter)
    }
}

/// The segmentation engine: pixel segments, every merged segment, and the forest linking them
pub struct Segmenter {
    grid_size_exponent: u32,
    size: u32,
    threshold: f64,
    /// the pixel segment of each grid cell
    pixels: Field<SegmentId>,
    /// arena of all segments ever built; pixels first, then merges in creation order
    segments: Vec<Segment>,
    forest: SegmentForest,
}

impl Segmenter {
    pub fn new<S>(config: SegmenterConfig, source: &S) -> Result<Self, SegmentError>
    where
        S: ColorSource + ?Sized,
    {
        let config = config.validated()?;
        let size = 1u32 << config.grid_size_exponent;
        let mut segments = Vec::with_capacity(size as usize * size as usize);
        let mut num_bands = None;

        let pixels = Field::try_from_fn(size, |at| -> Result<SegmentId, SegmentError> {
            let color = source
                .color_bands_at(at)
                .ok_or(SegmentError::MissingPixel { x: at.x, y: at.y })?;
            let expected = *num_bands.get_or_insert(color.len());
            if color.len() != expected {
                return Err(SegmentError::BandCountMismatch {
                    x: at.x,
                    y: at.y,
                    expected,
                    found: color.len(),
                });
            }
            let id = SegmentId(segments.len() as SegmentIdElem);
            segments.push(Segment::pixel(at, color));
            Ok(id)
        })?;

        debug!(
            "segmenting {}x{} pixels, threshold {}",
            size, size, config.merge_threshold
        );

        Ok(Self {
            grid_size_exponent: config.grid_size_exponent,
            size,
            threshold: config.merge_threshold,
            pixels,
            segments,
            forest: SegmentForest::new(),
        })
    }

    /// Side length of the grid.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn grid_size_exponent(&self) -> u32 {
        self.grid_size_exponent
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn forest(&self) -> &SegmentForest {
        &self.forest
    }

    /// Number of entries in the forest, i.e. twice the number of merges so far.
    pub fn forest_len(&self) -> usize {
        self.forest.len()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub fn region(&self, region: RegionId) -> &Segment {
        self.get(region.0)
    }

    fn get(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    pub fn find_root(&self, segment: SegmentId) -> SegmentId {
        self.forest.find_root(segment)
    }

    /// The pixel segment of a grid cell.
    pub fn pixel_at(&self, at: Coordinate) -> Result<SegmentId, SegmentError> {
        self.pixels.get(at).ok_or(SegmentError::OutOfBounds {
            x: at.x,
            y: at.y,
            size: self.size,
        })
    }

    /// The regions adjacent (4-connected) to `segment`, excluding the region it belongs to,
    /// ordered by anchor.
    pub fn neighbours_of(&self, segment: SegmentId) -> Vec<SegmentId> {
        let own_root = self.find_root(segment);
        let mut neighbours = BTreeMap::new();

        for &p in self.get(segment).points() {
            for n in p.neighbours_within(self.size) {
                if let Some(pixel) = self.pixels.get(n) {
                    let root = self.find_root(pixel);
                    if root != own_root {
                        neighbours.insert(self.get(root).anchor(), root);
                    }
                }
            }
        }

        neighbours.into_values().collect()
    }

    /// The neighbours sharing the lowest merge cost with `segment`, provided that cost does not
    /// exceed the threshold. Ordered by anchor.
    pub fn best_neighbours(&self, segment: SegmentId) -> Vec<SegmentId> {
        let me = self.get(segment);
        let costs: Vec<_> = self
            .neighbours_of(segment)
            .into_iter()
            .map(|n| (n, merge_cost(me, self.get(n))))
            .collect();

        let best = costs
            .iter()
            .map(|&(_, cost)| cost)
            .fold(None, |best: Option<f64>, cost| match best {
                Some(b) if b <= cost => Some(b),
                _ => Some(cost),
            })
            .unwrap_or(0.0);

        costs
            .into_iter()
            .filter(|&(_, cost)| cost == best && cost <= self.threshold)
            .map(|(n, _)| n)
            .collect()
    }

    /// Tries to grow the region containing `at`.
    ///
    /// Returns true if a merge happened. When the region's best neighbour does not pick it back,
    /// the attempt continues from that neighbour; revisiting a region ends the attempt.
    pub fn grow_one(&mut self, at: Coordinate) -> Result<bool, SegmentError> {
        let mut root = self.find_root(self.pixel_at(at)?);
        let mut visited = HashSet::new();

        while visited.insert(root) {
            let candidates = self.best_neighbours(root);
            let mutual = candidates
                .iter()
                .copied()
                .find(|&c| self.best_neighbours(self.find_root(c)).contains(&root));

            match (mutual, candidates.first()) {
                (Some(partner), _) => {
                    self.merge(root, partner)?;
                    return Ok(true);
                }
                (None, Some(&next)) => root = self.find_root(next),
                (None, None) => return Ok(false),
            }
        }

        trace!("descent from {} revisited {}", at, root);
        Ok(false)
    }

    /// Merges two regions into a new one, which becomes their root.
    fn merge(&mut self, left: SegmentId, right: SegmentId) -> Result<SegmentId, SegmentError> {
        for &id in [left, right].iter() {
            if !self.forest.is_root(id) {
                return Err(SegmentError::ForestConflict(id.0));
            }
        }
        if left == right {
            return Err(SegmentError::ForestConflict(left.0));
        }

        let id = SegmentId(self.segments.len() as SegmentIdElem);
        let merged = Segment::merged(left, self.get(left), right, self.get(right));
        trace!(
            "merge {} + {} -> {} ({} pixels)",
            left,
            right,
            id,
            merged.area()
        );
        self.segments.push(merged);
        self.forest.attach(left, id)?;
        self.forest.attach(right, id)?;
        Ok(id)
    }

    /// Offers every pixel once, in dither order, to `grow_one`. Returns the number of merges.
    pub fn grow_pass(&mut self) -> Result<usize, SegmentError> {
        let mut merges = 0;
        for at in DitherOrder::new(self.grid_size_exponent) {
            if self.grow_one(at)? {
                merges += 1;
            }
        }
        Ok(merges)
    }

    /// Repeats `grow_pass` until a pass leaves the forest unchanged. Returns the number of passes,
    /// including the final one that changed nothing.
    pub fn grow_until_stable(&mut self) -> Result<usize, SegmentError> {
        let mut passes = 0;
        loop {
            let before = self.forest.len();
            let merges = self.grow_pass()?;
            passes += 1;
            debug!(
                "pass {}: {} merges, forest size {}",
                passes,
                merges,
                self.forest.len()
            );
            if self.forest.len() == before {
                break;
            }
        }
        info!(
            "segmentation stable after {} passes with {} regions",
            passes,
            self.region_count()
        );
        Ok(passes)
    }

    /// The region containing pixel (x, y).
    pub fn region_of(&self, x: u32, y: u32) -> Result<RegionId, SegmentError> {
        let pixel = self.pixel_at(Coordinate::new(x, y))?;
        Ok(RegionId(self.find_root(pixel)))
    }

    /// All current regions, ordered by anchor.
    pub fn regions(&self) -> Vec<RegionId> {
        let mut roots: Vec<_> = self
            .pixels
            .iter()
            .map(|&p| self.find_root(p))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        roots.sort_by_key(|&r| self.get(r).anchor());
        roots.into_iter().map(RegionId).collect()
    }

    pub fn region_count(&self) -> usize {
        self.segments.len() - self.forest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorBands, ColorImage, Color};
    use proptest::prelude::*;

    fn mono_grid(n: u32, values: &[u8]) -> impl Fn(Coordinate) -> ColorBands + '_ {
        let size = 1u32 << n;
        move |at: Coordinate| ColorBands::mono(values[(at.y * size + at.x) as usize])
    }

    fn segmenter(n: u32, threshold: f64, values: &[u8]) -> Segmenter {
        Builder::new()
            .grid_size_exponent(n)
            .merge_threshold(threshold)
            .build(&mono_grid(n, values))
            .unwrap()
    }

    fn assert_partition(s: &Segmenter) {
        let mut seen = HashSet::new();
        for region in s.regions() {
            for &p in s.region(region).points() {
                assert!(seen.insert(p), "{} covered twice", p);
                assert_eq!(s.region_of(p.x, p.y).unwrap(), region);
            }
        }
        assert_eq!(seen.len(), (s.size() * s.size()) as usize);
    }

    #[test]
    fn two_by_two_pairs() {
        let mut s = segmenter(1, 100.0, &[10, 12, 200, 202]);
        s.grow_until_stable().unwrap();

        let top = s.region_of(0, 0).unwrap();
        let bottom = s.region_of(0, 1).unwrap();
        assert_eq!(top, s.region_of(1, 0).unwrap());
        assert_eq!(bottom, s.region_of(1, 1).unwrap());
        assert_ne!(top, bottom);
        assert_eq!(s.region_count(), 2);
        assert_eq!(s.forest_len(), 4);
        assert_partition(&s);
    }

    #[test]
    fn first_growth_merges_mutual_pair() {
        let mut s = segmenter(1, 100.0, &[10, 12, 200, 202]);
        assert!(s.grow_one(Coordinate::new(0, 0)).unwrap());
        assert_eq!(s.forest_len(), 2);
        assert_eq!(s.region_of(0, 0).unwrap(), s.region_of(1, 0).unwrap());
        assert_ne!(s.region_of(0, 1).unwrap(), s.region_of(1, 1).unwrap());
    }

    #[test]
    fn descent_walks_to_mutual_pair() {
        // (0,0)=0 prefers (1,0)=50, which prefers (1,1)=52
        let mut s = segmenter(1, 1000.0, &[0, 50, 255, 52]);
        assert!(s.grow_one(Coordinate::new(0, 0)).unwrap());
        assert_eq!(s.region_of(1, 0).unwrap(), s.region_of(1, 1).unwrap());
        assert_ne!(s.region_of(0, 0).unwrap(), s.region_of(1, 0).unwrap());
    }

    #[test]
    fn neighbours_and_best_neighbours() {
        let s = segmenter(1, 100.0, &[10, 12, 200, 202]);
        let origin = s.pixel_at(Coordinate::new(0, 0)).unwrap();
        let right = s.pixel_at(Coordinate::new(1, 0)).unwrap();
        let below = s.pixel_at(Coordinate::new(0, 1)).unwrap();
        assert_eq!(s.neighbours_of(origin), [below, right]);
        assert_eq!(s.best_neighbours(origin), [right]);
    }

    #[test]
    fn threshold_excludes_best() {
        let s = segmenter(1, 1.0, &[10, 12, 200, 202]);
        let origin = s.pixel_at(Coordinate::new(0, 0)).unwrap();
        assert!(s.best_neighbours(origin).is_empty());
    }

    #[test]
    fn ties_are_kept() {
        let s = segmenter(1, 100.0, &[10, 20, 20, 0]);
        let origin = s.pixel_at(Coordinate::new(0, 0)).unwrap();
        assert_eq!(s.best_neighbours(origin).len(), 2);
    }

    #[test]
    fn uniform_image_becomes_one_region() {
        let values = vec![77u8; 64];
        let mut s = segmenter(3, 0.0, &values);
        s.grow_until_stable().unwrap();
        assert_eq!(s.region_count(), 1);
        assert_eq!(s.regions().len(), 1);
        assert_eq!(s.forest_len(), 2 * 63);
        assert_partition(&s);
    }

    #[test]
    fn converged_is_idempotent() {
        let values: Vec<u8> = (0..64u32).map(|i| ((i * 37) % 256) as u8).collect();
        let mut s = segmenter(3, 150.0, &values);
        s.grow_until_stable().unwrap();
        let before = s.forest_len();
        let regions = s.regions();
        assert_eq!(s.grow_until_stable().unwrap(), 1);
        assert_eq!(s.forest_len(), before);
        assert_eq!(s.regions(), regions);
    }

    #[test]
    fn color_image_input() {
        let mut colors = vec![Color::new(250, 0, 0); 16];
        for c in colors.iter_mut().skip(8) {
            *c = Color::new(0, 0, 250);
        }
        let image = ColorImage::from_colors(4, 4, &colors).unwrap();
        let s = Builder::new()
            .grid_size_exponent(2)
            .merge_threshold(10.0)
            .run(&image)
            .unwrap();
        assert_eq!(s.region_count(), 2);
        assert_eq!(s.region_of(0, 0).unwrap(), s.region_of(3, 1).unwrap());
        assert_eq!(s.region_of(0, 2).unwrap(), s.region_of(3, 3).unwrap());
    }

    #[test]
    fn out_of_bounds() {
        let s = segmenter(1, 100.0, &[1, 2, 3, 4]);
        assert_eq!(
            s.region_of(2, 0),
            Err(SegmentError::OutOfBounds { x: 2, y: 0, size: 2 })
        );
        assert!(s.pixel_at(Coordinate::new(0, 5)).is_err());
    }

    #[test]
    fn zero_exponent_falls_back() {
        let s = Builder::new()
            .grid_size_exponent(0)
            .build(&|_: Coordinate| ColorBands::mono(0))
            .unwrap();
        assert_eq!(s.grid_size_exponent(), DEFAULT_GRID_SIZE_EXPONENT);
        assert_eq!(s.size(), 8);
        assert_eq!(s.threshold(), DEFAULT_MERGE_THRESHOLD);
    }

    #[test]
    fn invalid_configuration() {
        let source = |_: Coordinate| ColorBands::mono(0);
        assert!(matches!(
            Builder::new().grid_size_exponent(16).build(&source),
            Err(SegmentError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Builder::new().merge_threshold(f64::NAN).build(&source),
            Err(SegmentError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn image_smaller_than_grid() {
        let image = ColorImage::new_w_h(3, 4);
        assert_eq!(
            Builder::new().grid_size_exponent(2).build(&image).err(),
            Some(SegmentError::MissingPixel { x: 3, y: 0 })
        );
    }

    #[test]
    fn band_count_must_be_fixed() {
        let source = |at: Coordinate| {
            if at == Coordinate::new(1, 1) {
                ColorBands::new(vec![1, 2])
            } else {
                ColorBands::mono(1)
            }
        };
        assert_eq!(
            Builder::new().grid_size_exponent(1).build(&source).err(),
            Some(SegmentError::BandCountMismatch {
                x: 1,
                y: 1,
                expected: 1,
                found: 2
            })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn passes_preserve_invariants(
            values in prop::collection::vec(any::<u8>(), 16),
            threshold in 0.0f64..600.0,
        ) {
            let mut s = segmenter(2, threshold, &values);
            let mut last = s.forest_len();
            loop {
                s.grow_pass().unwrap();
                let len = s.forest_len();
                prop_assert!(len >= last);
                prop_assert_eq!(len, 2 * (16 - s.region_count()));
                for id in 0..s.segments.len() {
                    prop_assert!(s.forest.depth(SegmentId(id as SegmentIdElem)) < s.segments.len());
                }
                assert_partition(&s);
                if len == last {
                    break;
                }
                last = len;
            }
            prop_assert_eq!(s.grow_until_stable().unwrap(), 1);
        }

        #[test]
        fn deterministic(values in prop::collection::vec(0u8..4, 16)) {
            let mut a = segmenter(2, 50.0, &values);
            let mut b = segmenter(2, 50.0, &values);
            a.grow_until_stable().unwrap();
            b.grow_until_stable().unwrap();
            for y in 0..4 {
                for x in 0..4 {
                    prop_assert_eq!(a.region_of(x, y).unwrap(), b.region_of(x, y).unwrap());
                }
            }
        }
    }
}
