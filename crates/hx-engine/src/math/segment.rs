use glam::DVec2;

/// Relationship between two segments, as used by ray-cast parity counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intersection {
    NoIntersect,
    Intersect,
    /// Both segments lie on one line. Reported even when the two pieces of
    /// that line do not touch.
    Colinear,
}

impl Intersection {
    /// Contribution to a crossing count. A colinear run enters and leaves the
    /// line, so it counts twice and never flips parity.
    pub fn parity(self) -> u32 {
        match self {
            Intersection::NoIntersect => 0,
            Intersection::Intersect => 1,
            Intersection::Colinear => 2,
        }
    }
}

/// Line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    /// Zero-length segment sitting on `p`.
    pub fn point(p: DVec2) -> Self {
        Self { a: p, b: p }
    }

    pub fn direction(&self) -> DVec2 {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Implicit line `A·x + B·y + C = 0` through both endpoints.
    fn line(&self) -> (f64, f64, f64) {
        let a = self.b.y - self.a.y;
        let b = self.a.x - self.b.x;
        let c = self.b.x * self.a.y - self.a.x * self.b.y;
        (a, b, c)
    }

    /// Signed side of `p` relative to this segment's line.
    fn side(&self, p: DVec2) -> f64 {
        let (a, b, c) = self.line();
        a * p.x + b * p.y + c
    }

    fn straddled_by(&self, other: &Segment) -> bool {
        let d1 = self.side(other.a);
        let d2 = self.side(other.b);
        !((d1 > 0.0 && d2 > 0.0) || (d1 < 0.0 && d2 < 0.0))
    }

    /// Classify how `l1` and `l2` meet.
    ///
    /// Each segment's line is tested against the other's endpoints; if both
    /// endpoints fall strictly on one side there is no intersection. Segments
    /// passing both tests are `Colinear` when their directions are parallel
    /// and `Intersect` otherwise.
    pub fn classify(l1: &Segment, l2: &Segment) -> Intersection {
        if !l1.straddled_by(l2) || !l2.straddled_by(l1) {
            return Intersection::NoIntersect;
        }
        let (a1, b1, _) = l1.line();
        let (a2, b2, _) = l2.line();
        if a1 * b2 - a2 * b1 == 0.0 {
            Intersection::Colinear
        } else {
            Intersection::Intersect
        }
    }

    /// Whether `p` lies on this segment, allowing `tolerance` of perpendicular
    /// and end-wise slack.
    pub fn contains_point(&self, p: DVec2, tolerance: f64) -> bool {
        let dir = self.direction();
        let rel = p - self.a;
        let len = dir.length();
        if len == 0.0 {
            return rel.length() <= tolerance;
        }
        if dir.perp_dot(rel).abs() > tolerance * len {
            return false;
        }
        let along = rel.dot(dir) / len;
        along >= -tolerance && along <= len + tolerance
    }
}
