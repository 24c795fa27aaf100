use serde::{Deserialize, Serialize};

use crate::components::body::AdvanceContext;
use crate::components::kind::RotationControl;

/// World tuning. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in world units.
    pub width: f64,
    /// World height in world units.
    pub height: f64,
    /// Render scale applied to every body's draw position.
    pub scale: f64,
    /// Seconds per fixed tick.
    pub fixed_dt: f64,
    /// Lifespan removed from every mortal body per tick.
    pub lifespan_decay: f64,
    /// Radians per tick a dragged wall turns under rotation control.
    pub wall_rotation_speed: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 1.0,
            fixed_dt: 1.0 / 60.0,
            lifespan_decay: 0.03,
            wall_rotation_speed: 4.0_f64.to_radians(),
        }
    }
}

impl WorldConfig {
    /// Parse a config from a JSON string; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn advance_context(&self, rotation_control: RotationControl) -> AdvanceContext {
        AdvanceContext {
            lifespan_decay: self.lifespan_decay,
            rotation_control,
            wall_rotation_speed: self.wall_rotation_speed,
        }
    }
}
