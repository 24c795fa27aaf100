use glam::DVec2;

use crate::api::error::GeometryError;
use crate::api::types::BodyHandle;
use crate::components::collider::Collider;
use crate::components::kind::{BodyKind, RotationControl};
use crate::math::Segment;

/// Side length of the squares spawned by [`BodyDesc::square`].
pub const SQUARE_SIZE: f64 = 40.0;

/// Relative slack under which a leftover lifespan counts as spent.
const SPENT_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Total life of a body, in the same units as the per-tick decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifespan {
    Immortal,
    Finite(f64),
}

impl Lifespan {
    /// Raw value used by scene files: `-1` means immortal.
    pub fn from_raw(raw: f64) -> Self {
        if raw == -1.0 {
            Lifespan::Immortal
        } else {
            Lifespan::Finite(raw)
        }
    }

    pub fn raw(self) -> f64 {
        match self {
            Lifespan::Immortal => -1.0,
            Lifespan::Finite(total) => total,
        }
    }

    /// Life left after `ticks` steps of `decay`.
    pub fn remaining(self, ticks: u32, decay: f64) -> Lifespan {
        match self {
            Lifespan::Immortal => Lifespan::Immortal,
            Lifespan::Finite(total) => Lifespan::Finite(total - f64::from(ticks) * decay),
        }
    }

    /// Whether the lifespan is used up after `ticks` steps of `decay`.
    ///
    /// The leftover is computed from the tick count in one multiply, and only
    /// a leftover within a few ulps of `L` counts as zero. A lifespan `L`
    /// therefore runs out after exactly `ceil(L / decay)` ticks.
    pub fn spent_after(self, ticks: u32, decay: f64) -> bool {
        match self {
            Lifespan::Immortal => false,
            Lifespan::Finite(total) => {
                total - f64::from(ticks) * decay <= total.abs() * SPENT_TOLERANCE
            }
        }
    }
}

/// Outcome of one [`Body::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

/// Per-tick inputs shared by every body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceContext {
    pub lifespan_decay: f64,
    pub rotation_control: RotationControl,
    pub wall_rotation_speed: f64,
}

/// Everything needed to spawn a body. Built with the kind constructors and
/// refined with the `with_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    /// Top-left corner.
    pub pos: DVec2,
    pub size: DVec2,
    pub velocity: DVec2,
    pub rotational_velocity: f64,
    pub lifespan: Lifespan,
    pub mass: f64,
    /// Overrides the kind's static capability when set.
    pub is_static: Option<bool>,
}

impl BodyDesc {
    fn new(kind: BodyKind, pos: DVec2, size: DVec2) -> Self {
        Self {
            kind,
            pos,
            size,
            velocity: DVec2::ZERO,
            rotational_velocity: 0.0,
            lifespan: Lifespan::Immortal,
            mass: 1.0,
            is_static: None,
        }
    }

    pub fn wall(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(BodyKind::Wall, DVec2::new(x, y), DVec2::new(width, height))
    }

    pub fn square(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self::new(BodyKind::Square, DVec2::new(x, y), DVec2::splat(SQUARE_SIZE))
            .with_velocity(DVec2::new(vx, vy))
    }

    pub fn line(a: DVec2, b: DVec2) -> Self {
        Self::new(BodyKind::Line { a, b }, a.min(b), (b - a).abs())
    }

    pub fn world_screen(width: f64, height: f64) -> Self {
        Self::new(BodyKind::WorldScreen, DVec2::ZERO, DVec2::new(width, height))
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotational_velocity(mut self, radians_per_tick: f64) -> Self {
        self.rotational_velocity = radians_per_tick;
        self
    }

    pub fn with_lifespan(mut self, lifespan: Lifespan) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = Some(is_static);
        self
    }
}

/// Pointer-drag capability. Only bodies whose kind is interactable expose it
/// (see [`Body::as_interactable_mut`]).
pub trait Interactable {
    fn interact_notify(&mut self);
    /// Snap the body so its center sits on the pointer.
    fn interact_impulse(&mut self, x: i32, y: i32);
    fn interact_stop(&mut self);
    fn corners(&self) -> Vec<DVec2>;
    fn is_interacting(&self) -> bool;
}

/// A simulated entity: kinematic state, flags and an optional collider.
///
/// The collider, when present, is kept in world coordinates and moved
/// alongside `pos`.
#[derive(Debug, Clone)]
pub struct Body {
    /// Arena key; the default key until the body is spawned.
    handle: BodyHandle,
    kind: BodyKind,
    /// Top-left corner of the unrotated bounding rectangle, in world units.
    pos: DVec2,
    /// Snapshot for interpolation, taken after each integration step.
    prev_pos: DVec2,
    /// Interpolated `pos` times `scale`, cached by the last [`Body::draw`].
    draw_pos: DVec2,
    /// Radians in `[0, 2π)`.
    rotation: f64,
    /// World units per tick.
    velocity: DVec2,
    /// Radians per tick.
    rotational_velocity: f64,
    size: DVec2,
    /// Render-space multiplier. Set by the world on spawn.
    scale: f64,
    mass: f64,
    /// Configured total life. What is left follows from `age`.
    lifespan: Lifespan,
    /// Integration steps taken so far.
    age: u32,
    /// Immune to MTV displacement.
    is_static: bool,
    /// Held by the pointer.
    interacting: bool,
    /// Overlapped something during the last collision pass.
    intersecting: bool,
    collider: Option<Collider>,
    /// Last applied MTV drawn from the collider center; zero-length when clear.
    debug_mtv: Segment,
}

impl Body {
    /// Build an unregistered body. Collidable kinds get a rectangular
    /// collider covering `pos..pos + size`.
    pub fn from_desc(desc: &BodyDesc) -> Result<Self, GeometryError> {
        let caps = desc.kind.capabilities();
        let collider = if caps.collidable {
            Some(Collider::rectangle(desc.pos, desc.size, BodyHandle::default())?)
        } else {
            None
        };
        let debug_mtv = collider
            .as_ref()
            .map(|c| Segment::point(c.center()))
            .unwrap_or_default();

        Ok(Self {
            handle: BodyHandle::default(),
            kind: desc.kind,
            pos: desc.pos,
            prev_pos: desc.pos,
            draw_pos: desc.pos,
            rotation: 0.0,
            velocity: desc.velocity,
            rotational_velocity: desc.rotational_velocity,
            size: desc.size,
            scale: 1.0,
            mass: desc.mass,
            lifespan: desc.lifespan,
            age: 0,
            is_static: desc.is_static.unwrap_or(caps.is_static),
            interacting: false,
            intersecting: false,
            collider,
            debug_mtv,
        })
    }

    /// Attach the arena handle once the body has been inserted.
    pub(crate) fn bind(&mut self, handle: BodyHandle) {
        self.handle = handle;
        if let Some(collider) = &mut self.collider {
            collider.set_owner(handle);
        }
    }

    /// One fixed step.
    ///
    /// Velocity is in per-tick units, so `_dt` does not scale the displacement.
    /// The previous-position snapshot is taken after integration, which makes
    /// the interpolation in [`Body::draw`] inert.
    pub fn advance(&mut self, _dt: f64, ctx: &AdvanceContext) -> Lifecycle {
        if !self.kind.capabilities().integrates {
            return Lifecycle::Alive;
        }

        self.pos += self.velocity;
        self.prev_pos = self.pos;
        self.rotation = crate::math::normalize_angle(self.rotation + self.rotational_velocity);

        if let Some(collider) = &mut self.collider {
            if !self.intersecting {
                self.debug_mtv = Segment::point(collider.center());
            }
            collider.translate(self.velocity);
            collider.rotate(self.rotational_velocity);
        }

        if let Some(behavior) = self.kind.behavior() {
            behavior(self, ctx);
        }

        self.age = self.age.saturating_add(1);
        if self.lifespan.spent_after(self.age, ctx.lifespan_decay) {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }

    /// Push the body out of an overlap by `-mtv`.
    ///
    /// The debug segment is always recorded; the displacement is skipped for
    /// static and interacting bodies.
    pub fn apply_mtv(&mut self, mtv: DVec2) {
        let Some(collider) = &mut self.collider else {
            return;
        };
        let center = collider.center();
        self.debug_mtv = Segment::new(center, center + mtv);

        if self.interacting || self.is_static {
            return;
        }
        self.pos -= mtv;
        collider.translate(-mtv);
    }

    /// Blend previous and current position by `interpolation` and cache the
    /// scaled result for the renderer.
    pub fn draw(&mut self, interpolation: f32) {
        let t = f64::from(interpolation);
        self.draw_pos = ((self.pos - self.prev_pos) * t + self.prev_pos) * self.scale;
    }

    /// Runtime view of the interaction capability.
    pub fn as_interactable_mut(&mut self) -> Option<&mut dyn Interactable> {
        if self.kind.capabilities().interactable {
            Some(self)
        } else {
            None
        }
    }

    // -- Accessors --

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn prev_pos(&self) -> DVec2 {
        self.prev_pos
    }

    pub fn draw_pos(&self) -> DVec2 {
        self.draw_pos
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Radians in `[0, 2π)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn rotational_velocity(&self) -> f64 {
        self.rotational_velocity
    }

    /// Radius of the circle through the corners of the bounding rectangle.
    pub fn sphere_radius(&self) -> f64 {
        (self.size * 0.5).length()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Configured total life.
    pub fn lifespan(&self) -> Lifespan {
        self.lifespan
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Life left at the given per-tick decay.
    pub fn remaining_lifespan(&self, decay: f64) -> Lifespan {
        self.lifespan.remaining(self.age, decay)
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Segment from the collider center along the last applied MTV.
    pub fn debug_mtv(&self) -> Segment {
        self.debug_mtv
    }

    // -- Mutators --

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    pub fn set_rotational_velocity(&mut self, radians_per_tick: f64) {
        self.rotational_velocity = radians_per_tick;
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Move a `Line` body's endpoints. Returns `false` for other kinds.
    pub fn set_endpoints(&mut self, a: DVec2, b: DVec2) -> bool {
        let BodyKind::Line { a: ea, b: eb } = &mut self.kind else {
            return false;
        };
        *ea = a;
        *eb = b;
        self.pos = a.min(b);
        self.prev_pos = self.pos;
        self.size = (b - a).abs();
        true
    }

    pub(crate) fn set_intersecting(&mut self, intersecting: bool) {
        self.intersecting = intersecting;
    }
}

impl Interactable for Body {
    fn interact_notify(&mut self) {
        self.interacting = true;
    }

    fn interact_impulse(&mut self, x: i32, y: i32) {
        let target = DVec2::new(f64::from(x), f64::from(y));
        let next = target - self.size * 0.5;
        let delta = next - self.pos;
        self.pos = next;
        if let Some(collider) = &mut self.collider {
            collider.translate(delta);
        }
    }

    fn interact_stop(&mut self) {
        self.interacting = false;
    }

    /// Collider outline when present, otherwise the unrotated rectangle.
    fn corners(&self) -> Vec<DVec2> {
        match &self.collider {
            Some(collider) => collider.vertices().to_vec(),
            None => vec![
                self.pos,
                DVec2::new(self.pos.x + self.size.x, self.pos.y),
                self.pos + self.size,
                DVec2::new(self.pos.x, self.pos.y + self.size.y),
            ],
        }
    }

    fn is_interacting(&self) -> bool {
        self.interacting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    fn ctx() -> AdvanceContext {
        AdvanceContext {
            lifespan_decay: 0.25,
            rotation_control: RotationControl::Hold,
            wall_rotation_speed: 0.1,
        }
    }

    fn body(desc: BodyDesc) -> Body {
        Body::from_desc(&desc).unwrap()
    }

    #[test]
    fn lifespan_raw_sentinel() {
        assert_eq!(Lifespan::from_raw(-1.0), Lifespan::Immortal);
        assert_eq!(Lifespan::from_raw(2.5), Lifespan::Finite(2.5));
        assert_eq!(Lifespan::Immortal.raw(), -1.0);
    }

    #[test]
    fn lifespan_expires_after_ceil_ticks() {
        for (life, decay, expected) in [
            (1.0, 0.25, 4),
            (1.0, 0.03, 34),
            (0.9, 0.3, 3),
            (1.0, 0.3, 4),
            (1.000000000001, 0.25, 5),
            (0.5, 0.1, 5),
        ] {
            let span = Lifespan::Finite(life);
            let ticks = (1..1000u32).find(|&t| span.spent_after(t, decay));
            assert_eq!(ticks, Some(expected), "life {life} decay {decay}");
        }
    }

    #[test]
    fn lifespan_just_above_whole_ticks_gets_one_more() {
        let mut b = body(
            BodyDesc::square(0.0, 0.0, 0.0, 0.0).with_lifespan(Lifespan::Finite(1.000000000001)),
        );
        for _ in 0..4 {
            assert_eq!(b.advance(1.0, &ctx()), Lifecycle::Alive);
        }
        let Lifespan::Finite(left) = b.remaining_lifespan(ctx().lifespan_decay) else {
            panic!("finite lifespan became immortal");
        };
        assert!(left > 0.0);
        assert_eq!(b.advance(1.0, &ctx()), Lifecycle::Expired);
        assert_eq!(b.age(), 5);
        assert_eq!(b.lifespan(), Lifespan::Finite(1.000000000001));
    }

    #[test]
    fn immortal_never_decays() {
        let span = Lifespan::Immortal;
        assert!(!span.spent_after(u32::MAX, 0.5));
        assert_eq!(span.remaining(100, 0.5), Lifespan::Immortal);
    }

    #[test]
    fn advance_moves_body_and_collider_together() {
        let mut b = body(BodyDesc::square(0.0, 0.0, 3.0, -2.0));
        let before = b.collider().unwrap().center();
        assert_eq!(b.advance(1.0 / 60.0, &ctx()), Lifecycle::Alive);
        assert_eq!(b.pos(), DVec2::new(3.0, -2.0));
        assert_eq!(b.prev_pos(), b.pos());
        let moved = b.collider().unwrap().center() - before;
        assert_abs_diff_eq!(moved.distance(DVec2::new(3.0, -2.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_wraps_into_range() {
        let mut b = body(BodyDesc::square(0.0, 0.0, 0.0, 0.0).with_rotational_velocity(-0.5));
        b.advance(1.0, &ctx());
        assert_abs_diff_eq!(b.rotation(), TAU - 0.5, epsilon = 1e-12);
        for _ in 0..20 {
            b.advance(1.0, &ctx());
            assert!((0.0..TAU).contains(&b.rotation()));
        }
    }

    #[test]
    fn finite_lifespan_reports_expiry() {
        let mut b = body(BodyDesc::square(0.0, 0.0, 0.0, 0.0).with_lifespan(Lifespan::Finite(0.5)));
        assert_eq!(b.advance(1.0, &ctx()), Lifecycle::Alive);
        assert_eq!(b.advance(1.0, &ctx()), Lifecycle::Expired);
    }

    #[test]
    fn static_body_ignores_mtv_but_records_debug() {
        let mut wall = body(BodyDesc::wall(0.0, 0.0, 100.0, 20.0));
        assert!(wall.is_static());
        let center = wall.collider().unwrap().center();
        wall.apply_mtv(DVec2::new(1e6, -3.0));
        assert_eq!(wall.pos(), DVec2::ZERO);
        assert_eq!(wall.collider().unwrap().center(), center);
        assert_eq!(wall.debug_mtv(), Segment::new(center, center + DVec2::new(1e6, -3.0)));
    }

    #[test]
    fn interacting_body_ignores_mtv() {
        let mut sq = body(BodyDesc::square(10.0, 10.0, 0.0, 0.0).with_static(false));
        sq.interact_notify();
        sq.apply_mtv(DVec2::new(5.0, 5.0));
        assert_eq!(sq.pos(), DVec2::new(10.0, 10.0));
        sq.interact_stop();
        sq.apply_mtv(DVec2::new(5.0, 5.0));
        assert_eq!(sq.pos(), DVec2::new(5.0, 5.0));
        assert_eq!(sq.collider().unwrap().center(), DVec2::new(25.0, 25.0));
    }

    #[test]
    fn debug_mtv_resets_when_not_intersecting() {
        let mut sq = body(BodyDesc::square(0.0, 0.0, 0.0, 0.0));
        sq.apply_mtv(DVec2::new(2.0, 0.0));
        sq.set_intersecting(true);
        sq.advance(1.0, &ctx());
        assert_abs_diff_eq!(sq.debug_mtv().length(), 2.0, epsilon = 1e-12);
        sq.set_intersecting(false);
        sq.advance(1.0, &ctx());
        assert_eq!(sq.debug_mtv().length(), 0.0);
    }

    #[test]
    fn impulse_centers_body_on_pointer() {
        let mut wall = body(BodyDesc::wall(0.0, 0.0, 100.0, 20.0));
        wall.interact_impulse(300, 200);
        assert_eq!(wall.pos(), DVec2::new(250.0, 190.0));
        let center = wall.collider().unwrap().center();
        assert_abs_diff_eq!(center.distance(DVec2::new(300.0, 200.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn only_walls_expose_interaction() {
        assert!(body(BodyDesc::wall(0.0, 0.0, 10.0, 10.0)).as_interactable_mut().is_some());
        assert!(body(BodyDesc::square(0.0, 0.0, 0.0, 0.0)).as_interactable_mut().is_none());
        assert!(body(BodyDesc::world_screen(800.0, 600.0)).as_interactable_mut().is_none());
    }

    #[test]
    fn wall_follows_rotation_control_only_while_dragged() {
        let mut wall = body(BodyDesc::wall(0.0, 0.0, 100.0, 20.0));
        let spin = AdvanceContext {
            rotation_control: RotationControl::Positive,
            ..ctx()
        };
        wall.advance(1.0, &spin);
        assert_eq!(wall.rotational_velocity(), 0.0);

        wall.interact_notify();
        wall.advance(1.0, &spin);
        assert_eq!(wall.rotational_velocity(), 0.1);

        // Velocity persists after release.
        wall.interact_stop();
        wall.advance(1.0, &ctx());
        assert_eq!(wall.rotational_velocity(), 0.1);
        assert_abs_diff_eq!(wall.rotation(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn line_is_inert() {
        let mut line = body(
            BodyDesc::line(DVec2::new(10.0, 10.0), DVec2::new(0.0, 30.0))
                .with_velocity(DVec2::new(1.0, 1.0))
                .with_lifespan(Lifespan::Finite(0.1)),
        );
        assert!(line.collider().is_none());
        assert_eq!(line.pos(), DVec2::new(0.0, 10.0));
        assert_eq!(line.advance(1.0, &ctx()), Lifecycle::Alive);
        assert_eq!(line.pos(), DVec2::new(0.0, 10.0));
        assert!(line.set_endpoints(DVec2::ZERO, DVec2::new(5.0, 5.0)));
        assert_eq!(line.size(), DVec2::new(5.0, 5.0));
        assert!(!body(BodyDesc::square(0.0, 0.0, 0.0, 0.0)).set_endpoints(DVec2::ZERO, DVec2::ONE));
    }

    #[test]
    fn draw_position_is_scaled() {
        let mut sq = body(BodyDesc::square(10.0, 20.0, 0.0, 0.0));
        assert_eq!(sq.scale(), 1.0);
        sq.set_scale(2.0);
        sq.draw(0.5);
        assert_eq!(sq.draw_pos(), DVec2::new(20.0, 40.0));
    }

    #[test]
    fn sphere_radius_spans_half_diagonal() {
        let b = body(BodyDesc::wall(0.0, 0.0, 6.0, 8.0));
        assert_abs_diff_eq!(b.sphere_radius(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn corners_without_collider_follow_rectangle() {
        let screen = body(BodyDesc::world_screen(4.0, 2.0));
        assert_eq!(
            screen.corners(),
            vec![DVec2::ZERO, DVec2::new(4.0, 0.0), DVec2::new(4.0, 2.0), DVec2::new(0.0, 2.0)]
        );
    }

    #[test]
    fn zero_sized_collidable_is_rejected() {
        assert!(Body::from_desc(&BodyDesc::wall(0.0, 0.0, 0.0, 10.0)).is_err());
    }
}
