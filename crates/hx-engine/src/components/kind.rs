use glam::DVec2;

use crate::components::body::{AdvanceContext, Body};

/// Body variant. Behaviour that differs per variant is expressed through
/// [`Capabilities`] and an optional [`KindBehavior`] rather than subtyping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Static, draggable, collidable barrier.
    Wall,
    /// Dynamic collidable box.
    Square,
    /// Visual-only segment between two points.
    Line { a: DVec2, b: DVec2 },
    /// Visual-only backdrop covering the world.
    WorldScreen,
}

/// What a body of a given kind takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Owns a collider and joins the pairwise overlap pass.
    pub collidable: bool,
    /// Can become the pointer interaction target.
    pub interactable: bool,
    /// Immune to MTV displacement.
    pub is_static: bool,
    /// Runs the generic kinematic update each tick.
    pub integrates: bool,
}

/// Per-kind hook run after the generic kinematic update.
pub type KindBehavior = fn(&mut Body, &AdvanceContext);

impl BodyKind {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            BodyKind::Wall => Capabilities {
                collidable: true,
                interactable: true,
                is_static: true,
                integrates: true,
            },
            BodyKind::Square => Capabilities {
                collidable: true,
                interactable: false,
                is_static: false,
                integrates: true,
            },
            BodyKind::Line { .. } => Capabilities {
                collidable: false,
                interactable: false,
                is_static: false,
                integrates: false,
            },
            BodyKind::WorldScreen => Capabilities {
                collidable: false,
                interactable: false,
                is_static: false,
                integrates: true,
            },
        }
    }

    pub fn behavior(&self) -> Option<KindBehavior> {
        match self {
            BodyKind::Wall => Some(steer_rotation),
            _ => None,
        }
    }

    /// Numeric tag written into draw instances.
    pub fn code(&self) -> u32 {
        match self {
            BodyKind::Wall => 0,
            BodyKind::Square => 1,
            BodyKind::Line { .. } => 2,
            BodyKind::WorldScreen => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Wall => "wall",
            BodyKind::Square => "square",
            BodyKind::Line { .. } => "line",
            BodyKind::WorldScreen => "world_screen",
        }
    }
}

/// Discrete rotation input applied to a dragged wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationControl {
    #[default]
    Hold,
    Positive,
    Negative,
}

impl RotationControl {
    pub fn rotational_velocity(self, speed: f64) -> f64 {
        match self {
            RotationControl::Hold => 0.0,
            RotationControl::Positive => speed,
            RotationControl::Negative => -speed,
        }
    }
}

/// Walls spin under the rotation control only while they are being dragged.
/// Whatever velocity was last set persists after release.
fn steer_rotation(body: &mut Body, ctx: &AdvanceContext) {
    if body.is_interacting() {
        body.set_rotational_velocity(ctx.rotation_control.rotational_velocity(ctx.wall_rotation_speed));
    }
}
