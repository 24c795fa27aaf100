pub mod collision;
pub mod interaction;
pub mod render;
