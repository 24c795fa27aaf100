use glam::DVec2;
use slotmap::SlotMap;

use crate::api::error::GeometryError;
use crate::api::types::BodyHandle;
use crate::components::body::{Body, BodyDesc, Lifecycle};
use crate::components::kind::RotationControl;
use crate::core::config::WorldConfig;
use crate::renderer::instance::DrawBuffer;
use crate::systems::collision::{self, Contact};
use crate::systems::{interaction, render};

/// Owns every body and drives the simulation.
///
/// Two registries are kept: `order` holds every live body, `colliders` the
/// subset that takes part in overlap resolution. Both are newest-first, which
/// sets draw order and hit-test precedence.
pub struct World {
    /// Its `scale` is the one every body is drawn at.
    config: WorldConfig,
    bodies: SlotMap<BodyHandle, Body>,
    /// Every live body, newest first.
    order: Vec<BodyHandle>,
    /// Bodies in the overlap pass, newest first.
    colliders: Vec<BodyHandle>,
    /// Body held by the pointer.
    interact_target: Option<BodyHandle>,
    /// Key-driven spin applied to a dragged wall.
    rotation_control: RotationControl,
    /// Overlaps found by the most recent tick.
    contacts: Vec<Contact>,
    tick_count: u64,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: SlotMap::with_capacity_and_key(64),
            order: Vec::with_capacity(64),
            colliders: Vec::with_capacity(64),
            interact_target: None,
            rotation_control: RotationControl::Hold,
            contacts: Vec::new(),
            tick_count: 0,
        }
    }

    // -- Registration --

    /// Create a body and register it (and its collider, if any) at the front.
    /// The body takes the world's current render scale.
    pub fn spawn(&mut self, desc: &BodyDesc) -> Result<BodyHandle, GeometryError> {
        let mut body = Body::from_desc(desc)?;
        body.set_scale(self.config.scale);
        let collidable = body.collider().is_some();
        let name = body.kind().name();

        let handle = self.bodies.insert(body);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.bind(handle);
        }
        self.order.insert(0, handle);
        if collidable {
            self.colliders.insert(0, handle);
        }
        log::info!("spawned {} {:?}", name, handle);
        Ok(handle)
    }

    /// Remove a body from both registries. Clears the interaction target if
    /// it pointed here.
    pub fn despawn(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle)?;
        self.order.retain(|h| *h != handle);
        self.colliders.retain(|h| *h != handle);
        if self.interact_target == Some(handle) {
            self.interact_target = None;
        }
        log::info!("despawned {} {:?}", body.kind().name(), handle);
        Some(body)
    }

    /// Put a body's collider back into the resolution pass. Returns `false`
    /// if the body is gone, has no collider, or is already registered.
    pub fn add_collider(&mut self, handle: BodyHandle) -> bool {
        let has_collider = self.bodies.get(handle).is_some_and(|b| b.collider().is_some());
        if !has_collider || self.colliders.contains(&handle) {
            return false;
        }
        self.colliders.insert(0, handle);
        true
    }

    /// Take a body's collider out of the resolution pass without despawning it.
    pub fn remove_collider(&mut self, handle: BodyHandle) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|h| *h != handle);
        if self.colliders.len() == before {
            return false;
        }
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_intersecting(false);
        }
        true
    }

    // -- Simulation --

    /// One fixed step: resolve overlaps, then advance every body, then drop
    /// the ones whose lifespan ran out.
    pub fn tick(&mut self, dt: f64) {
        self.contacts = collision::resolve_collisions(&mut self.bodies, &self.colliders);

        let ctx = self.config.advance_context(self.rotation_control);
        let mut expired = Vec::new();
        for handle in &self.order {
            if let Some(body) = self.bodies.get_mut(*handle) {
                if body.advance(dt, &ctx) == Lifecycle::Expired {
                    expired.push(*handle);
                }
            }
        }
        for handle in expired {
            self.despawn(handle);
        }
        self.tick_count += 1;
    }

    /// Refresh every body's draw position and rebuild `buffer`.
    pub fn draw(&mut self, interpolation: f32, buffer: &mut DrawBuffer) {
        render::build_draw_buffer(&mut self.bodies, &self.order, interpolation, buffer);
    }

    // -- Interaction --

    /// Pointer down. The newest interactable body under the pointer becomes
    /// the target.
    pub fn interact_at(&mut self, x: i32, y: i32) -> Option<BodyHandle> {
        self.interact_stop();
        let p = DVec2::new(f64::from(x), f64::from(y));
        let hit = interaction::pick(&self.bodies, &self.order, p);
        log::debug!("interact_at ({}, {}) -> {:?}", x, y, hit);

        let handle = hit?;
        let target = self.bodies.get_mut(handle)?.as_interactable_mut()?;
        target.interact_notify();
        self.interact_target = Some(handle);
        Some(handle)
    }

    /// Pointer drag. No-op without a target.
    pub fn interact_move(&mut self, x: i32, y: i32) {
        let Some(handle) = self.interact_target else { return };
        match self.bodies.get_mut(handle).and_then(Body::as_interactable_mut) {
            Some(target) => target.interact_impulse(x, y),
            None => {
                log::warn!("interaction target {:?} is gone", handle);
                self.interact_target = None;
            }
        }
    }

    /// Pointer up. Releases and forgets the target.
    pub fn interact_stop(&mut self) {
        let Some(handle) = self.interact_target.take() else { return };
        if let Some(target) = self.bodies.get_mut(handle).and_then(Body::as_interactable_mut) {
            target.interact_stop();
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.interact_target.is_some()
    }

    pub fn interaction_target(&self) -> Option<BodyHandle> {
        self.interact_target
    }

    pub fn set_rotation_control(&mut self, control: RotationControl) {
        self.rotation_control = control;
    }

    pub fn rotation_control(&self) -> RotationControl {
        self.rotation_control
    }

    // -- Queries --

    /// Change the render scale of the world and every body in it.
    pub fn set_scale(&mut self, scale: f64) {
        self.config.scale = scale;
        for body in self.bodies.values_mut() {
            body.set_scale(scale);
        }
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Bodies in registry order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.order.iter().filter_map(|h| self.bodies.get(*h))
    }

    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    pub fn collider_handles(&self) -> &[BodyHandle] {
        &self.colliders
    }

    /// Overlaps resolved by the last tick.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}
