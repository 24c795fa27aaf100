use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::api::error::GeometryError;
use crate::api::types::BodyHandle;
use crate::components::body::{Body, BodyDesc};
use crate::components::kind::RotationControl;
use crate::core::world::World;
use crate::renderer::instance::DrawBuffer;

/// A [`World`] shared between a simulation thread and a presentation/input
/// thread.
///
/// Every pass holds the write lock for its whole duration, so a tick or a
/// draw never observes another thread's spawn or despawn halfway through.
#[derive(Clone, Default)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    pub fn tick(&self, dt: f64) {
        self.inner.write().tick(dt);
    }

    pub fn draw(&self, interpolation: f32, buffer: &mut DrawBuffer) {
        self.inner.write().draw(interpolation, buffer);
    }

    pub fn spawn(&self, desc: &BodyDesc) -> Result<BodyHandle, GeometryError> {
        self.inner.write().spawn(desc)
    }

    pub fn despawn(&self, handle: BodyHandle) -> Option<Body> {
        self.inner.write().despawn(handle)
    }

    pub fn interact_at(&self, x: i32, y: i32) -> Option<BodyHandle> {
        self.inner.write().interact_at(x, y)
    }

    pub fn interact_move(&self, x: i32, y: i32) {
        self.inner.write().interact_move(x, y);
    }

    pub fn interact_stop(&self) {
        self.inner.write().interact_stop();
    }

    pub fn set_rotation_control(&self, control: RotationControl) {
        self.inner.write().set_rotation_control(control);
    }

    /// Read-only view for queries. Holding it blocks every pass above.
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.inner.read()
    }

    /// Run `f` with exclusive access, for batches of mutations that must land
    /// between two passes.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut self.inner.write())
    }
}
