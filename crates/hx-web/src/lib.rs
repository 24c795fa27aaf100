//! Browser bridge. A single [`SimRunner`] lives in thread-local storage and
//! the host drives it through the `sim_*` exports.

pub mod runner;

pub use runner::SimRunner;

use std::cell::RefCell;

use hx_engine::{DrawInstance, InputEvent, SceneManifest, WorldConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("simulation not initialized; call sim_init() first");
                None
            }
        }
    })
}

fn not_initialized() -> JsError {
    JsError::new("simulation not initialized")
}

/// Create the simulation from a JSON `WorldConfig` (`"{}"` for defaults).
#[wasm_bindgen]
pub fn sim_init(config_json: &str) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = WorldConfig::from_json(config_json)?;
    log::info!("hx-web: world {}x{} initialized", config.width, config.height);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(SimRunner::new(config));
    });
    Ok(())
}

/// Spawn the bodies of a JSON scene manifest. Returns how many were spawned.
#[wasm_bindgen]
pub fn sim_load_scene(json: &str) -> Result<u32, JsError> {
    let manifest = SceneManifest::from_json(json)?;
    let handles = with_runner(|r| r.load_scene(&manifest)).ok_or_else(not_initialized)??;
    Ok(handles.len() as u32)
}

/// Spawn the stock room: backdrop, three squares, four border walls.
#[wasm_bindgen]
pub fn sim_load_default_room() -> Result<u32, JsError> {
    let handles = with_runner(|r| r.load_default_room()).ok_or_else(not_initialized)??;
    Ok(handles.len() as u32)
}

/// Advance by one host frame of `dt` seconds. Returns the ticks taken.
#[wasm_bindgen]
pub fn sim_frame(dt: f64) -> u32 {
    with_runner(|r| r.frame(dt)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn sim_pointer_down(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn sim_pointer_move(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn sim_pointer_up(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn sim_key_down(key: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key }));
}

#[wasm_bindgen]
pub fn sim_key_up(key: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key }));
}

#[wasm_bindgen]
pub fn sim_is_interacting() -> bool {
    with_runner(|r| r.world().is_interacting()).unwrap_or(false)
}

// ---- Draw buffer reads ----

#[wasm_bindgen]
pub fn sim_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn sim_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

/// Floats per instance in the draw buffer.
#[wasm_bindgen]
pub fn sim_instance_floats() -> u32 {
    DrawInstance::FLOATS as u32
}

#[wasm_bindgen]
pub fn sim_world_width() -> f64 {
    with_runner(|r| r.world().config().width).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn sim_world_height() -> f64 {
    with_runner(|r| r.world().config().height).unwrap_or(0.0)
}
