pub mod config;
pub mod scene;
#[cfg(feature = "shared")]
pub mod shared;
pub mod time;
pub mod world;
