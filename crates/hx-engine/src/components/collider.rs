use glam::DVec2;

use crate::api::error::GeometryError;
use crate::api::types::BodyHandle;
use crate::math::VectorExt;
use crate::systems::collision;
use crate::systems::interaction;

/// Convex polygon hitbox owned by exactly one body.
///
/// `center` (mean of the vertices) and `bounding_radius` are caches derived
/// from `vertices`; every transform keeps them in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    vertices: Vec<DVec2>,
    center: DVec2,
    bounding_radius: f64,
    owner: BodyHandle,
}

impl Collider {
    /// Build a collider from an ordered, convex vertex list.
    ///
    /// Rejects fewer than three vertices, non-finite coordinates, coincident
    /// neighbours (which would produce zero-length edges and undefined
    /// separating axes) and non-convex outlines.
    pub fn new(vertices: Vec<DVec2>, owner: BodyHandle) -> Result<Self, GeometryError> {
        validate_polygon(&vertices)?;
        let center = vertices.iter().copied().sum::<DVec2>() / vertices.len() as f64;
        let bounding_radius = vertices
            .iter()
            .map(|v| v.distance_squared(center))
            .fold(0.0, f64::max)
            .sqrt();
        Ok(Self {
            vertices,
            center,
            bounding_radius,
            owner,
        })
    }

    /// Axis-aligned rectangle with its top-left corner at `origin`.
    /// Corners are wound top-left, top-right, bottom-right, bottom-left.
    pub fn rectangle(origin: DVec2, size: DVec2, owner: BodyHandle) -> Result<Self, GeometryError> {
        Self::new(
            vec![
                origin,
                DVec2::new(origin.x + size.x, origin.y),
                origin + size,
                DVec2::new(origin.x, origin.y + size.y),
            ],
            owner,
        )
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn bounding_radius(&self) -> f64 {
        self.bounding_radius
    }

    pub fn owner(&self) -> BodyHandle {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: BodyHandle) {
        self.owner = owner;
    }

    /// Unit normals of every edge, in winding order.
    ///
    /// Edges are never zero-length: construction rejects coincident vertices
    /// and `scale_about` refuses factors that would collapse the polygon.
    pub(crate) fn edge_normals(&self) -> impl Iterator<Item = DVec2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| {
            let edge = self.vertices[i] - self.vertices[(i + 1) % n];
            edge.perpendicular().normalize()
        })
    }

    // -- Transforms --

    pub fn translate(&mut self, delta: DVec2) {
        self.center += delta;
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    /// Rotate about the collider's own center.
    pub fn rotate(&mut self, radians: f64) {
        self.rotate_about(radians, self.center);
    }

    /// Rotate every vertex (and the center) about `anchor`.
    ///
    /// Sine and cosine are evaluated once per call and each coordinate uses a
    /// fused multiply-add, so repeated small rotations stay closed over
    /// thousands of ticks.
    pub fn rotate_about(&mut self, radians: f64, anchor: DVec2) {
        if radians == 0.0 {
            return;
        }
        let (sin, cos) = radians.sin_cos();
        for v in &mut self.vertices {
            *v = rotate_point(*v, anchor, sin, cos);
        }
        self.center = rotate_point(self.center, anchor, sin, cos);
    }

    /// Scale about the collider's own center.
    pub fn scale(&mut self, factor: f64) -> Result<(), GeometryError> {
        self.scale_about(factor, self.center)
    }

    /// Move every vertex toward (`factor < 1`) or away from (`factor > 1`) `anchor`.
    pub fn scale_about(&mut self, factor: f64, anchor: DVec2) -> Result<(), GeometryError> {
        if factor == 0.0 || !factor.is_finite() {
            return Err(GeometryError::InvalidScale(factor));
        }
        for v in &mut self.vertices {
            *v = anchor + (*v - anchor) * factor;
        }
        self.center = anchor + (self.center - anchor) * factor;
        self.bounding_radius *= factor.abs();
        Ok(())
    }

    // -- Queries --

    /// Separating-axis overlap test.
    ///
    /// Returns the minimum translation vector pointing from this collider
    /// toward `other`, or `None` when a separating axis exists.
    pub fn overlap(&self, other: &Collider) -> Option<DVec2> {
        collision::minimum_translation(self, other)
    }

    /// Inclusive point-in-polygon test.
    pub fn contains_point(&self, p: DVec2) -> bool {
        interaction::polygon_contains(p, &self.vertices)
    }
}

fn rotate_point(p: DVec2, anchor: DVec2, sin: f64, cos: f64) -> DVec2 {
    let d = p - anchor;
    DVec2::new(
        d.x.mul_add(cos, -(d.y * sin)) + anchor.x,
        d.x.mul_add(sin, d.y * cos) + anchor.y,
    )
}

fn validate_polygon(vertices: &[DVec2]) -> Result<(), GeometryError> {
    let n = vertices.len();
    if n < 3 {
        return Err(GeometryError::TooFewVertices { found: n });
    }
    if vertices.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::NonFinite);
    }
    if let Some(index) = (0..n).find(|&i| vertices[i] == vertices[(i + 1) % n]) {
        return Err(GeometryError::DegenerateEdge { index });
    }

    // Every turn must bend the same way; straight runs are tolerated but a
    // polygon with no turn at all has no area.
    let mut winding = 0.0_f64;
    for i in 0..n {
        let e1 = vertices[(i + 1) % n] - vertices[i];
        let e2 = vertices[(i + 2) % n] - vertices[(i + 1) % n];
        let turn = e1.perp_dot(e2);
        if turn == 0.0 {
            continue;
        }
        if winding != 0.0 && turn.signum() != winding {
            return Err(GeometryError::NonConvex);
        }
        winding = turn.signum();
    }
    if winding == 0.0 {
        return Err(GeometryError::NonConvex);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn square(center: DVec2, side: f64) -> Collider {
        let half = DVec2::splat(side / 2.0);
        Collider::rectangle(center - half, DVec2::splat(side), BodyHandle::default()).unwrap()
    }

    fn assert_vertices_eq(a: &[DVec2], b: &[DVec2], eps: f64) {
        assert_eq!(a.len(), b.len());
        for (va, vb) in a.iter().zip(b) {
            assert_abs_diff_eq!(va.x, vb.x, epsilon = eps);
            assert_abs_diff_eq!(va.y, vb.y, epsilon = eps);
        }
    }

    #[test]
    fn center_and_radius_derived_from_vertices() {
        let c = Collider::rectangle(DVec2::ZERO, DVec2::new(6.0, 8.0), BodyHandle::default()).unwrap();
        assert_eq!(c.center(), DVec2::new(3.0, 4.0));
        assert_abs_diff_eq!(c.bounding_radius(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_too_few_vertices() {
        let err = Collider::new(vec![DVec2::ZERO, DVec2::X], BodyHandle::default()).unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices { found: 2 });
        let err = Collider::new(Vec::new(), BodyHandle::default()).unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices { found: 0 });
    }

    #[test]
    fn rejects_coincident_vertices() {
        let verts = vec![DVec2::ZERO, DVec2::X, DVec2::X, DVec2::Y];
        let err = Collider::new(verts, BodyHandle::default()).unwrap_err();
        assert_eq!(err, GeometryError::DegenerateEdge { index: 1 });
    }

    #[test]
    fn rejects_zero_size_rectangle() {
        let err = Collider::rectangle(DVec2::ZERO, DVec2::new(0.0, 10.0), BodyHandle::default());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_non_convex_outline() {
        let arrow = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 2.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ];
        assert_eq!(
            Collider::new(arrow, BodyHandle::default()).unwrap_err(),
            GeometryError::NonConvex
        );
    }

    #[test]
    fn rejects_colinear_vertices() {
        let flat = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        assert_eq!(
            Collider::new(flat, BodyHandle::default()).unwrap_err(),
            GeometryError::NonConvex
        );
    }

    #[test]
    fn rejects_non_finite_vertices() {
        let verts = vec![DVec2::ZERO, DVec2::new(f64::NAN, 1.0), DVec2::Y];
        assert_eq!(
            Collider::new(verts, BodyHandle::default()).unwrap_err(),
            GeometryError::NonFinite
        );
    }

    #[test]
    fn either_winding_is_accepted() {
        let ccw = vec![DVec2::ZERO, DVec2::new(0.0, 4.0), DVec2::new(4.0, 4.0), DVec2::new(4.0, 0.0)];
        assert!(Collider::new(ccw, BodyHandle::default()).is_ok());
    }

    #[test]
    fn translate_round_trip_restores_vertices() {
        let mut c = square(DVec2::new(3.0, -2.0), 10.0);
        let original = c.clone();
        c.translate(DVec2::new(17.25, -4.5));
        c.translate(DVec2::new(-17.25, 4.5));
        assert_vertices_eq(c.vertices(), original.vertices(), 1e-12);
        assert_abs_diff_eq!(c.center().x, original.center().x, epsilon = 1e-12);
    }

    #[test]
    fn rotate_quarter_turn_about_center() {
        let mut c = Collider::rectangle(DVec2::ZERO, DVec2::new(4.0, 2.0), BodyHandle::default()).unwrap();
        c.rotate(FRAC_PI_2);
        // 4x2 box centered at (2,1) becomes a 2x4 box around the same center
        let expected = [
            DVec2::new(3.0, -1.0),
            DVec2::new(3.0, 3.0),
            DVec2::new(1.0, 3.0),
            DVec2::new(1.0, -1.0),
        ];
        assert_vertices_eq(c.vertices(), &expected, 1e-12);
        assert_eq!(c.center(), DVec2::new(2.0, 1.0));
    }

    #[test]
    fn rotate_then_unrotate_restores_vertices() {
        let mut c = square(DVec2::new(40.0, 60.0), 20.0);
        let original = c.clone();
        let anchor = DVec2::new(-7.0, 13.0);
        c.rotate_about(0.7, anchor);
        c.rotate_about(-0.7, anchor);
        assert_vertices_eq(c.vertices(), original.vertices(), 1e-9);
        assert_abs_diff_eq!(c.center().x, original.center().x, epsilon = 1e-9);
        assert_abs_diff_eq!(c.center().y, original.center().y, epsilon = 1e-9);
    }

    #[test]
    fn rotation_about_foreign_anchor_moves_center() {
        let mut c = square(DVec2::new(10.0, 0.0), 2.0);
        c.rotate_about(FRAC_PI_2, DVec2::ZERO);
        assert_abs_diff_eq!(c.center().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.center().y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn many_small_rotations_stay_closed() {
        let mut c = square(DVec2::new(120.0, 60.0), 40.0);
        let original = c.clone();
        let steps = 1000;
        for _ in 0..steps {
            c.rotate(TAU / steps as f64);
        }
        assert_vertices_eq(c.vertices(), original.vertices(), 1e-9);
    }

    #[test]
    fn scale_keeps_caches_consistent() {
        let mut c = square(DVec2::new(5.0, 5.0), 10.0);
        let radius = c.bounding_radius();
        c.scale(2.0).unwrap();
        assert_eq!(c.center(), DVec2::new(5.0, 5.0));
        assert_abs_diff_eq!(c.bounding_radius(), radius * 2.0, epsilon = 1e-12);
        assert_vertices_eq(
            c.vertices(),
            &[DVec2::new(-5.0, -5.0), DVec2::new(15.0, -5.0), DVec2::new(15.0, 15.0), DVec2::new(-5.0, 15.0)],
            1e-12,
        );

        c.scale_about(0.5, DVec2::ZERO).unwrap();
        assert_eq!(c.center(), DVec2::new(2.5, 2.5));
    }

    #[test]
    fn zero_scale_is_refused() {
        let mut c = square(DVec2::ZERO, 10.0);
        assert_eq!(c.scale(0.0), Err(GeometryError::InvalidScale(0.0)));
        assert_eq!(c, square(DVec2::ZERO, 10.0));
    }

    #[test]
    fn edge_normals_are_unit_length() {
        let mut c = square(DVec2::ZERO, 10.0);
        c.rotate(0.3);
        for n in c.edge_normals() {
            assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        }
        assert_eq!(c.edge_normals().count(), 4);
    }
}
