use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::error::SceneError;
use crate::api::types::BodyHandle;
use crate::components::body::{BodyDesc, Lifespan};
use crate::core::world::World;

/// Wall thickness used by [`SceneManifest::default_room`].
pub const BORDER_THICKNESS: f64 = 20.0;

/// Initial bodies for a world, loaded from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub bodies: Vec<BodySpec>,
}

/// One body entry, tagged by `kind`.
///
/// `lifespan` uses the raw convention: `-1` (the default) is immortal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodySpec {
    Wall {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default = "immortal")]
        lifespan: f64,
    },
    Square {
        x: f64,
        y: f64,
        #[serde(default)]
        vx: f64,
        #[serde(default)]
        vy: f64,
        #[serde(default = "immortal")]
        lifespan: f64,
        #[serde(default = "unit_mass")]
        mass: f64,
    },
    Line {
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
    },
    WorldScreen {
        width: f64,
        height: f64,
    },
}

fn immortal() -> f64 {
    -1.0
}

fn unit_mass() -> f64 {
    1.0
}

impl BodySpec {
    pub fn to_desc(&self) -> BodyDesc {
        match *self {
            BodySpec::Wall { x, y, width, height, lifespan } => {
                BodyDesc::wall(x, y, width, height).with_lifespan(Lifespan::from_raw(lifespan))
            }
            BodySpec::Square { x, y, vx, vy, lifespan, mass } => BodyDesc::square(x, y, vx, vy)
                .with_lifespan(Lifespan::from_raw(lifespan))
                .with_mass(mass),
            BodySpec::Line { ax, ay, bx, by } => BodyDesc::line(DVec2::new(ax, ay), DVec2::new(bx, by)),
            BodySpec::WorldScreen { width, height } => BodyDesc::world_screen(width, height),
        }
    }
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// A backdrop, three resting squares and four border walls hugging the
    /// outside of the `width` x `height` rectangle.
    pub fn default_room(width: f64, height: f64) -> Self {
        let t = BORDER_THICKNESS;
        let wall = |x, y, w, h| BodySpec::Wall { x, y, width: w, height: h, lifespan: immortal() };
        let square = |x, y| BodySpec::Square { x, y, vx: 0.0, vy: 0.0, lifespan: immortal(), mass: unit_mass() };

        Self {
            bodies: vec![
                BodySpec::WorldScreen { width, height },
                square(40.0, 60.0),
                square(120.0, 60.0),
                square(200.0, 60.0),
                wall(0.0, -t, width, t),
                wall(-t, 0.0, t, height),
                wall(0.0, height, width, t),
                wall(width, 0.0, t, height),
            ],
        }
    }

    /// Spawn every entry in order. Stops at the first invalid body.
    pub fn spawn_into(&self, world: &mut World) -> Result<Vec<BodyHandle>, SceneError> {
        let mut handles = Vec::with_capacity(self.bodies.len());
        for (index, spec) in self.bodies.iter().enumerate() {
            match world.spawn(&spec.to_desc()) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    log::warn!("scene body #{} rejected: {}", index, e);
                    return Err(e.into());
                }
            }
        }
        log::info!("scene loaded: {} bodies", handles.len());
        Ok(handles)
    }
}
