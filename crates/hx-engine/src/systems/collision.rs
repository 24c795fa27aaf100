//! Separating-axis overlap and the pairwise resolution pass.
//!
//! Every unordered pair of registered colliders is tested once per tick; an
//! overlapping pair pushes its two owners apart along the minimum translation
//! vector (MTV), half of the pair receiving the vector and the other its
//! negation.

use glam::DVec2;
use slotmap::SlotMap;

use crate::api::types::BodyHandle;
use crate::components::body::Body;
use crate::components::collider::Collider;

/// Closed interval of a shape's projection onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Project every vertex onto `axis` and keep the extremes.
    pub fn project(vertices: &[DVec2], axis: DVec2) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in vertices {
            let d = v.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        Self { min, max }
    }

    /// Penetration depth, or `None` when the intervals are disjoint.
    /// Touching intervals overlap with depth zero.
    pub fn overlap(&self, other: &Interval) -> Option<f64> {
        if other.min > self.max || other.max < self.min {
            return None;
        }
        Some((self.max - other.min).min(other.max - self.min))
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    axis: DVec2,
    depth: f64,
}

/// A resolved overlap from the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// MTV pointing from `a` toward `b`; `a` was pushed by `-mtv`, `b` by `+mtv`.
    pub mtv: DVec2,
}

/// SAT overlap test between two convex colliders.
///
/// Axes from `a` are scanned first, then axes from `b`. The shallowest
/// penetration wins, with the earlier axis kept on ties. The winning axis is
/// flipped if needed so the result points from `a`'s center toward `b`'s.
pub fn minimum_translation(a: &Collider, b: &Collider) -> Option<DVec2> {
    let between = b.center() - a.center();
    let mut best = None;
    if !scan_axes(a, b, &mut best) || !scan_axes(b, a, &mut best) {
        return None;
    }
    let Candidate { mut axis, depth } = best?;
    if between.dot(axis) < 0.0 {
        axis = -axis;
    }
    Some(axis * depth)
}

/// Test both shapes on the edge normals of `source`. Returns `false` as soon
/// as a separating axis turns up.
fn scan_axes(source: &Collider, peer: &Collider, best: &mut Option<Candidate>) -> bool {
    for axis in source.edge_normals() {
        let own = Interval::project(source.vertices(), axis);
        let other = Interval::project(peer.vertices(), axis);
        let Some(depth) = own.overlap(&other) else {
            return false;
        };
        match best {
            Some(current) if depth >= current.depth => {}
            _ => *best = Some(Candidate { axis, depth }),
        }
    }
    true
}

/// Run the pairwise pass over `colliders` (in registry order), apply MTVs to
/// the owning bodies and refresh every owner's intersecting flag.
pub fn resolve_collisions(
    bodies: &mut SlotMap<BodyHandle, Body>,
    colliders: &[BodyHandle],
) -> Vec<Contact> {
    let mut hit = vec![false; colliders.len()];
    let mut contacts = Vec::new();

    for i in 0..colliders.len() {
        for j in (i + 1)..colliders.len() {
            let (ha, hb) = (colliders[i], colliders[j]);
            let mtv = match (
                bodies.get(ha).and_then(Body::collider),
                bodies.get(hb).and_then(Body::collider),
            ) {
                (Some(a), Some(b)) => a.overlap(b),
                _ => None,
            };
            let Some(mtv) = mtv else { continue };

            log::debug!("overlap {:?} / {:?}: mtv = ({:.3}, {:.3})", ha, hb, mtv.x, mtv.y);
            if let Some(body) = bodies.get_mut(ha) {
                body.apply_mtv(mtv);
            }
            if let Some(body) = bodies.get_mut(hb) {
                body.apply_mtv(-mtv);
            }
            hit[i] = true;
            hit[j] = true;
            contacts.push(Contact { a: ha, b: hb, mtv });
        }
    }

    for (handle, intersecting) in colliders.iter().zip(hit) {
        if let Some(body) = bodies.get_mut(*handle) {
            body.set_intersecting(intersecting);
        }
    }
    contacts
}
