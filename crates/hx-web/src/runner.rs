use hx_engine::{
    BodyHandle, DrawBuffer, FixedTimestep, InputEvent, InputQueue, RotationControl, SceneError,
    SceneManifest, World, WorldConfig,
};

/// Key code that turns a dragged wall in the positive direction (`q`).
pub const KEY_ROTATE_POSITIVE: u32 = 81;
/// Key code that turns a dragged wall in the negative direction (`w`).
pub const KEY_ROTATE_NEGATIVE: u32 = 87;

/// Drives a [`World`] from host frames.
///
/// The host pushes input events and calls [`SimRunner::frame`] once per
/// animation frame; the runner routes input, runs as many fixed ticks as the
/// elapsed time allows and rebuilds the draw buffer the host reads back.
pub struct SimRunner {
    world: World,
    input: InputQueue,
    timestep: FixedTimestep,
    draw_buffer: DrawBuffer,
    rotate_positive: bool,
    rotate_negative: bool,
}

impl SimRunner {
    pub fn new(config: WorldConfig) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        Self {
            world: World::new(config),
            input: InputQueue::new(),
            timestep,
            draw_buffer: DrawBuffer::new(),
            rotate_positive: false,
            rotate_negative: false,
        }
    }

    pub fn load_scene(&mut self, manifest: &SceneManifest) -> Result<Vec<BodyHandle>, SceneError> {
        manifest.spawn_into(&mut self.world)
    }

    /// Spawn the stock room sized to the world.
    pub fn load_default_room(&mut self) -> Result<Vec<BodyHandle>, SceneError> {
        let config = self.world.config();
        let room = SceneManifest::default_room(config.width, config.height);
        self.load_scene(&room)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame. Returns the number of fixed ticks taken.
    pub fn frame(&mut self, frame_dt: f64) -> u32 {
        self.route_input();

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.world.tick(self.timestep.dt());
        }

        self.world.draw(self.timestep.alpha(), &mut self.draw_buffer);
        steps
    }

    fn route_input(&mut self) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerDown { x, y } => {
                    self.world.interact_at(to_pixel(x), to_pixel(y));
                }
                InputEvent::PointerMove { x, y } => self.world.interact_move(to_pixel(x), to_pixel(y)),
                InputEvent::PointerUp { .. } => self.world.interact_stop(),
                InputEvent::KeyDown { key } => self.set_key(key, true),
                InputEvent::KeyUp { key } => self.set_key(key, false),
            }
        }
        self.world.set_rotation_control(self.rotation_control());
    }

    fn set_key(&mut self, key: u32, down: bool) {
        match key {
            KEY_ROTATE_POSITIVE => self.rotate_positive = down,
            KEY_ROTATE_NEGATIVE => self.rotate_negative = down,
            _ => log::debug!("unbound key {}", key),
        }
    }

    fn rotation_control(&self) -> RotationControl {
        if self.rotate_positive {
            RotationControl::Positive
        } else if self.rotate_negative {
            RotationControl::Negative
        } else {
            RotationControl::Hold
        }
    }

    // ---- Accessors for host reads ----

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn draw_buffer(&self) -> &DrawBuffer {
        &self.draw_buffer
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.draw_buffer.as_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.draw_buffer.instance_count()
    }
}

fn to_pixel(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hx_engine::BodyDesc;

    fn runner() -> SimRunner {
        SimRunner::new(WorldConfig {
            fixed_dt: 0.25,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn frame_runs_whole_ticks_and_draws() {
        let mut r = runner();
        let handles = r.load_default_room().unwrap();
        assert_eq!(handles.len(), 8);

        assert_eq!(r.frame(0.1), 0);
        assert_eq!(r.instance_count(), 8);
        assert_eq!(r.frame(0.5), 2);
        assert_eq!(r.world().tick_count(), 2);
        assert_eq!(r.draw_buffer().as_floats().len(), 64);
    }

    #[test]
    fn pointer_events_drive_drag() {
        let mut r = runner();
        let wall = r.world_mut().spawn(&BodyDesc::wall(100.0, 100.0, 100.0, 20.0)).unwrap();

        r.push_input(InputEvent::PointerDown { x: 149.6, y: 110.2 });
        r.frame(0.0);
        assert_eq!(r.world().interaction_target(), Some(wall));

        r.push_input(InputEvent::PointerMove { x: 300.0, y: 300.0 });
        r.frame(0.0);
        let pos = r.world().get(wall).unwrap().pos();
        assert_abs_diff_eq!(pos.x, 250.0);
        assert_abs_diff_eq!(pos.y, 290.0);

        r.push_input(InputEvent::PointerUp { x: 300.0, y: 300.0 });
        r.frame(0.0);
        assert!(!r.world().is_interacting());
    }

    #[test]
    fn keys_map_to_rotation_control() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key: KEY_ROTATE_NEGATIVE });
        r.frame(0.0);
        assert_eq!(r.world().rotation_control(), RotationControl::Negative);

        r.push_input(InputEvent::KeyDown { key: KEY_ROTATE_POSITIVE });
        r.frame(0.0);
        assert_eq!(r.world().rotation_control(), RotationControl::Positive);

        r.push_input(InputEvent::KeyUp { key: KEY_ROTATE_POSITIVE });
        r.push_input(InputEvent::KeyUp { key: KEY_ROTATE_NEGATIVE });
        r.push_input(InputEvent::KeyDown { key: 32 });
        r.frame(0.0);
        assert_eq!(r.world().rotation_control(), RotationControl::Hold);
    }

    #[test]
    fn dragged_wall_spins_while_key_held() {
        let mut r = runner();
        let speed = r.world().config().wall_rotation_speed;
        let wall = r.world_mut().spawn(&BodyDesc::wall(0.0, 0.0, 100.0, 20.0)).unwrap();
        r.push_input(InputEvent::PointerDown { x: 50.0, y: 10.0 });
        r.push_input(InputEvent::KeyDown { key: KEY_ROTATE_POSITIVE });
        r.frame(0.5);
        let body = r.world().get(wall).unwrap();
        assert_eq!(body.rotational_velocity(), speed);
        assert_abs_diff_eq!(body.rotation(), speed, epsilon = 1e-12);
    }
}
