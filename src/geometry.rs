//! Axis-aligned boxes: the bounding volume used for pruning and the solid
//! shape of the reference backend.

use serde::Deserialize;

/// Axis-aligned bounding box. `min[i] <= max[i]` on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    pub fn volume(&self) -> f64 {
        (0..3).map(|i| self.max[i] - self.min[i]).product()
    }

    /// The box grown by `by` in every direction.
    pub fn enlarged(&self, by: f64) -> Self {
        Self {
            min: [self.min[0] - by, self.min[1] - by, self.min[2] - by],
            max: [self.max[0] + by, self.max[1] + by, self.max[2] + by],
        }
    }

    /// Signed overlap extent per axis; negative means a gap of that size.
    pub fn overlap_extents(&self, other: &Aabb) -> [f64; 3] {
        let mut d = [0.0; 3];
        for i in 0..3 {
            d[i] = self.max[i].min(other.max[i]) - self.min[i].max(other.min[i]);
        }
        d
    }

    /// True when the gap between the boxes strictly exceeds `clearance` on
    /// some axis: this box is grown by the clearance and the result tested
    /// for a strict gap. Conservative for pruning: boxes that touch or sit
    /// within the clearance margin are never reported disjoint, so no true
    /// touch or overlap is missed as long as `clearance` covers every
    /// fuzzy tolerance later used on the pair.
    pub fn is_disjoint_from(&self, other: &Aabb, clearance: f64) -> bool {
        self.enlarged(clearance)
            .overlap_extents(other)
            .iter()
            .any(|&d| d < 0.0)
    }
}

/// One solid body of the reference box backend. The engine treats this as
/// an opaque handle; only the kernel and the bounding index look inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSolid {
    pub aabb: Aabb,
}

impl BoxSolid {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            aabb: Aabb::new(min, max),
        }
    }

    /// Cube of side `side` with its min corner at `origin`.
    pub fn cube(origin: [f64; 3], side: f64) -> Self {
        Self::new(
            origin,
            [origin[0] + side, origin[1] + side, origin[2] + side],
        )
    }

    pub fn volume(&self) -> f64 {
        self.aabb.volume()
    }

    /// Bounding volume of the solid. Exact for boxes; a real kernel would
    /// return an enclosing region here.
    pub fn bound(&self) -> Aabb {
        self.aabb
    }
}
