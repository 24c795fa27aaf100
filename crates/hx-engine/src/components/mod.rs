pub mod body;
pub mod collider;
pub mod kind;

pub use body::{AdvanceContext, Body, BodyDesc, Interactable, Lifecycle, Lifespan, SQUARE_SIZE};
pub use collider::Collider;
pub use kind::{BodyKind, Capabilities, KindBehavior, RotationControl};
