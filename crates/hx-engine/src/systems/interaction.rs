//! Pointer hit testing: ray-cast point-in-polygon and front-to-back picking.

use glam::DVec2;
use slotmap::SlotMap;

use crate::api::error::GeometryError;
use crate::api::types::BodyHandle;
use crate::components::body::{Body, Interactable};
use crate::math::{Intersection, Segment};

/// How far left of the bounding box the parity ray starts.
pub const RAY_MARGIN: f64 = 1.0;
/// Distance from an edge still treated as lying on it.
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: DVec2,
    max: DVec2,
}

impl Bounds {
    fn of(vertices: &[DVec2]) -> Self {
        vertices.iter().fold(
            Bounds {
                min: DVec2::splat(f64::INFINITY),
                max: DVec2::splat(f64::NEG_INFINITY),
            },
            |b, v| Bounds {
                min: b.min.min(*v),
                max: b.max.max(*v),
            },
        )
    }

    fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

fn edges(vertices: &[DVec2]) -> impl Iterator<Item = Segment> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| Segment::new(vertices[i], vertices[(i + 1) % n]))
}

/// Whether `p` lies inside or on the boundary of the polygon `corners`.
pub fn point_in_polygon(p: DVec2, corners: &[DVec2]) -> Result<bool, GeometryError> {
    if corners.len() < 3 {
        return Err(GeometryError::TooFewVertices { found: corners.len() });
    }
    Ok(polygon_contains(p, corners))
}

/// Unchecked variant for outlines already validated at construction.
///
/// Points on an edge are inside. Everything else is decided by the parity of
/// crossings between the polygon's edges and a horizontal ray ending at `p`.
/// A crossing only counts when exactly one endpoint of the edge lies strictly
/// above the ray, so a ray through a shared vertex counts it once (or not at
/// all when the polygon merely touches the ray there). Colinear edges are
/// parity-neutral.
pub(crate) fn polygon_contains(p: DVec2, vertices: &[DVec2]) -> bool {
    let bounds = Bounds::of(vertices);
    if !bounds.contains(p) {
        return false;
    }
    if edges(vertices).any(|edge| edge.contains_point(p, BOUNDARY_TOLERANCE)) {
        return true;
    }

    let ray = Segment::new(DVec2::new(bounds.min.x - RAY_MARGIN, p.y), p);
    let crossings: u32 = edges(vertices)
        .map(|edge| match Segment::classify(&ray, &edge) {
            Intersection::Intersect if !spans_row(&edge, p.y) => 0,
            hit => hit.parity(),
        })
        .sum();
    crossings % 2 == 1
}

/// Half-open vertex rule: one endpoint strictly above `y`, the other not.
fn spans_row(edge: &Segment, y: f64) -> bool {
    (edge.a.y > y) != (edge.b.y > y)
}

/// First interactable body in `order` whose outline contains `p`.
pub fn pick(bodies: &SlotMap<BodyHandle, Body>, order: &[BodyHandle], p: DVec2) -> Option<BodyHandle> {
    order.iter().copied().find(|handle| {
        bodies.get(*handle).is_some_and(|body| {
            body.kind().capabilities().interactable && polygon_contains(p, &body.corners())
        })
    })
}
