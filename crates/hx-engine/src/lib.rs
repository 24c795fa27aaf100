pub mod api;
pub mod components;
pub mod core;
pub mod input;
pub mod math;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::error::{GeometryError, SceneError};
pub use api::types::BodyHandle;
pub use components::body::{AdvanceContext, Body, BodyDesc, Interactable, Lifecycle, Lifespan};
pub use components::collider::Collider;
pub use components::kind::{BodyKind, Capabilities, RotationControl};
pub use crate::core::config::WorldConfig;
pub use crate::core::scene::{BodySpec, SceneManifest};
pub use crate::core::time::FixedTimestep;
pub use crate::core::world::World;
pub use input::queue::{InputEvent, InputQueue};
pub use math::{Intersection, Segment, Vector2, VectorExt};
pub use renderer::instance::{DrawBuffer, DrawInstance};
pub use systems::collision::Contact;
pub use systems::interaction::point_in_polygon;

#[cfg(feature = "shared")]
pub use crate::core::shared::SharedWorld;
