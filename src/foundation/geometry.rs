use smallvec::SmallVec;

/// Integer pixel rectangle, half-open on the right and bottom edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

/// Distance from `lo` to `hi`, zero when inverted. Any two `i32` edges fit in `u32`.
fn span(lo: i32, hi: i32) -> u32 {
    (i64::from(hi) - i64::from(lo)).max(0) as u32
}

impl Rect {
    /// Build a rectangle from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin covering `width` x `height` pixels.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Width in pixels; zero for empty or inverted rectangles.
    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    /// Height in pixels; zero for empty or inverted rectangles.
    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }

    /// True when the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Pixel count.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Overlap of two rectangles, `None` when they do not share a pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Whether the pixel at `(x, y)` lies inside.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Whether `other` lies entirely inside `self`. Empty rectangles are contained everywhere.
    pub fn contains(&self, other: &Rect) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && self.top <= other.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }

    /// Smallest rectangle covering both. Empty inputs are ignored.
    pub fn union_bounds(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// `self` minus `other`, as at most four disjoint bands.
    fn subtract(&self, other: &Rect) -> SmallVec<[Rect; 4]> {
        let mut out = SmallVec::new();
        if self.is_empty() {
            return out;
        }
        let Some(hole) = self.intersect(other) else {
            out.push(*self);
            return out;
        };

        // Full-width bands above and below the hole, then the two sides of the hole's rows.
        let bands = [
            Rect::new(self.left, self.top, self.right, hole.top),
            Rect::new(self.left, hole.bottom, self.right, self.bottom),
            Rect::new(self.left, hole.top, hole.left, hole.bottom),
            Rect::new(hole.right, hole.top, self.right, hole.bottom),
        ];
        out.extend(bands.into_iter().filter(|r| !r.is_empty()));
        out
    }
}

/// A set of pixels stored as disjoint, non-empty rectangles.
///
/// Equality is set equality: two regions compare equal when they cover the same pixels,
/// however the rectangles happen to be split.
#[derive(Clone, Debug, Default)]
pub struct Region {
    rects: SmallVec<[Rect; 4]>,
}

impl Region {
    /// The empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Region covering exactly `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let mut rects = SmallVec::new();
        if !rect.is_empty() {
            rects.push(rect);
        }
        Self { rects }
    }

    /// Region covering `[0, width) x [0, height)`.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::from_rect(Rect::from_size(width, height))
    }

    /// True when no pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The disjoint rectangles making up the region.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of covered pixels.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Bounding rectangle; empty for an empty region.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.union_bounds(r))
    }

    /// Whether the pixel at `(x, y)` is covered.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// Pixels covered by both `self` and `rect`.
    pub fn intersect_rect(&self, rect: &Rect) -> Region {
        Self {
            rects: self.rects.iter().filter_map(|r| r.intersect(rect)).collect(),
        }
    }

    /// Pixels covered by both regions.
    pub fn intersect(&self, other: &Region) -> Region {
        let mut rects = SmallVec::new();
        for a in &self.rects {
            for b in &other.rects {
                if let Some(r) = a.intersect(b) {
                    rects.push(r);
                }
            }
        }
        Self { rects }
    }

    /// Pixels of `self` not covered by `other`.
    pub fn subtract(&self, other: &Region) -> Region {
        let mut rects = self.rects.clone();
        for hole in &other.rects {
            rects = rects.iter().flat_map(|r| r.subtract(hole)).collect();
            if rects.is_empty() {
                break;
            }
        }
        Self { rects }
    }

    /// Pixels covered by either region.
    pub fn union(&self, other: &Region) -> Region {
        let mut out = self.clone();
        out.rects.extend(other.subtract(self).rects);
        out
    }

    /// Add `rect` to the region in place.
    pub fn add_rect(&mut self, rect: Rect) {
        *self = self.union(&Region::from_rect(rect));
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.area() == other.area() && self.subtract(other).is_empty()
    }
}

impl Eq for Region {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
