use glam::Vec2;
use rand::Rng;

/// A half-open axis-aligned rectangle `[x, x + width) × [y, y + height)`.
///
/// Used both as the simulation area and as a query window into the
/// [`crate::quadtree::QuadTree`]. Bounds are never mutated after
/// construction; smaller ones are produced with [`Bound::quarter`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bound {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A bound anchored at the origin.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// A square window of half-width `half_extent` centered on `center`.
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        Self::new(
            center.x - half_extent,
            center.y - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Returns `true` if `p` lies inside the half-open rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges are
    /// exclusive, so a point on a shared edge belongs to exactly one of two
    /// adjacent bounds.
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Returns `true` if the two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Bound) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Splits the bound into four equal quadrants.
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right (with `y`
    /// growing downward, as on screen).
    pub fn quarter(&self) -> [Bound; 4] {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let mx = self.x + hw;
        let my = self.y + hh;
        // The far quadrants take the remainder so the union ends exactly on
        // the parent's right and bottom edges.
        let rw = self.right() - mx;
        let rh = self.bottom() - my;
        [
            Bound::new(self.x, self.y, hw, hh),
            Bound::new(mx, self.y, rw, hh),
            Bound::new(self.x, my, hw, rh),
            Bound::new(mx, my, rw, rh),
        ]
    }

    /// Uniformly samples a point inside the bound.
    ///
    /// Returns the bound's origin if it has no area.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::new(self.x, self.y);
        }
        let x = rng.random_range(self.x..self.right());
        let y = rng.random_range(self.y..self.bottom());
        Vec2::new(x, y)
    }
}
