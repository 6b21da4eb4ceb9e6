#![deny(unsafe_code)]
//! Browser host for drift.
//!
//! [`DriftApp`] binds a `<canvas>` by id and exposes `frame`, pointer and
//! wheel entry points so JavaScript can drive it directly. [`start`] does the
//! wiring itself: it installs `mousemove` and `wheel` listeners on the canvas
//! and runs a `requestAnimationFrame` loop until [`Running::stop`].

pub mod canvas;

use std::cell::RefCell;
use std::rc::Rc;

use drift_core::run_loop::StopSignal;
use drift_core::{Animation, DriftError};
use drift_sim::config::DEFAULT_SEED;
use drift_sim::{Modifiers, SceneConfig, WheelInput, World};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent,
    Window,
};

use crate::canvas::CanvasSurface;

fn to_js(e: DriftError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Seed derived from a `performance.now()` reading.
fn seed_from_timestamp(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        (now_ms * 1000.0) as u64
    } else {
        DEFAULT_SEED
    }
}

/// Maps DOM wheel fields onto a [`WheelInput`].
fn wheel_input(delta_y: f64, shift: bool, alt: bool) -> WheelInput {
    WheelInput::from_delta_y(delta_y, Modifiers { shift, alt })
}

/// Fits a scene to the canvas. A canvas reporting 0 keeps the scene size.
fn fit_scene(mut scene: SceneConfig, canvas_width: u32, canvas_height: u32, seed: u64) -> SceneConfig {
    if canvas_width > 0 {
        scene.width = canvas_width;
    }
    if canvas_height > 0 {
        scene.height = canvas_height;
    }
    scene.seed = seed;
    scene
}

fn canvas_by_id(canvas_id: &str) -> Result<HtmlCanvasElement, JsValue> {
    let document = window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("Canvas '{canvas_id}' not found")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("Element '{canvas_id}' is not a canvas")))
}

/// A world bound to a canvas.
#[wasm_bindgen]
pub struct DriftApp {
    world: World,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl DriftApp {
    /// Binds the canvas with id `canvas_id` and builds the default scene
    /// sized to it, seeded from the clock.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<DriftApp, JsValue> {
        Self::build(canvas_id, SceneConfig::default())
    }

    /// Like [`DriftApp::new`] with a JSON scene instead of the default one.
    pub fn with_scene(canvas_id: &str, scene_json: &str) -> Result<DriftApp, JsValue> {
        let scene = SceneConfig::from_json_str(scene_json).map_err(to_js)?;
        Self::build(canvas_id, scene)
    }

    /// Updates and draws one frame.
    pub fn frame(&mut self) -> Result<(), JsValue> {
        self.world.tick(&mut self.surface).map_err(to_js)
    }

    /// Pointer position in canvas-local pixels. Returns whether a
    /// controllable emitter took it.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.world.handle_pointer_move(x, y)
    }

    /// DOM wheel fields. Shift adjusts particle size, alt adjusts scatter.
    pub fn on_wheel(&mut self, delta_y: f64, shift: bool, alt: bool) -> bool {
        self.world.handle_wheel(&wheel_input(delta_y, shift, alt))
    }

    pub fn frame_number(&self) -> u64 {
        self.world.frame()
    }

    pub fn particle_count(&self) -> usize {
        self.world.particle_count()
    }

    /// Current world state as a JSON string.
    pub fn params_json(&self) -> String {
        self.world.params().to_string()
    }
}

impl DriftApp {
    fn build(canvas_id: &str, scene: SceneConfig) -> Result<DriftApp, JsValue> {
        let canvas = canvas_by_id(canvas_id)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        let seed = seed_from_timestamp(window()?.performance().map_or(0.0, |p| p.now()));
        let scene = fit_scene(scene, canvas.width(), canvas.height(), seed);
        let world = World::from_scene(&scene).map_err(to_js)?;
        let surface = CanvasSurface::new(ctx, world.width(), world.height());
        log::info!(
            "drift bound to '{canvas_id}' ({}x{}, {} emitters)",
            world.width(),
            world.height(),
            world.systems().len()
        );
        Ok(DriftApp {
            world,
            surface,
            canvas,
        })
    }
}

type Listener<E> = Closure<dyn FnMut(E)>;

/// Handle to a loop started by [`start`].
#[wasm_bindgen]
pub struct Running {
    app: Rc<RefCell<DriftApp>>,
    stop: StopSignal,
    on_move: Listener<MouseEvent>,
    on_wheel: Listener<WheelEvent>,
}

#[wasm_bindgen]
impl Running {
    /// Stops rescheduling frames and detaches the input listeners.
    pub fn stop(&self) {
        if self.stop.is_stopped() {
            return;
        }
        self.stop.stop();
        let app = self.app.borrow();
        let target = &app.canvas;
        let _ = target.remove_event_listener_with_callback(
            "mousemove",
            self.on_move.as_ref().unchecked_ref(),
        );
        let _ = target
            .remove_event_listener_with_callback("wheel", self.on_wheel.as_ref().unchecked_ref());
        log::info!("drift stopped at frame {}", app.frame_number());
    }

    pub fn frame_number(&self) -> u64 {
        self.app.borrow().frame_number()
    }

    pub fn params_json(&self) -> String {
        self.app.borrow().params_json()
    }
}

/// Dropping the handle (`free()` from JavaScript) stops the loop. The frame
/// callback releases itself on its next tick.
impl Drop for Running {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Binds `canvas_id`, installs input listeners, and starts the
/// `requestAnimationFrame` loop.
#[wasm_bindgen]
pub fn start(canvas_id: &str) -> Result<Running, JsValue> {
    let app = Rc::new(RefCell::new(DriftApp::new(canvas_id)?));
    let stop = StopSignal::new();

    let on_move: Listener<MouseEvent> = {
        let app = app.clone();
        Closure::new(move |e: MouseEvent| {
            app.borrow_mut()
                .on_pointer_move(f64::from(e.offset_x()), f64::from(e.offset_y()));
        })
    };
    let on_wheel: Listener<WheelEvent> = {
        let app = app.clone();
        Closure::new(move |e: WheelEvent| {
            e.prevent_default();
            app.borrow_mut()
                .on_wheel(e.delta_y(), e.shift_key(), e.alt_key());
        })
    };

    {
        let bound = app.borrow();
        let canvas = &bound.canvas;
        canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        // Non-passive so preventDefault can stop the page from scrolling.
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            on_wheel.as_ref().unchecked_ref(),
            &opts,
        )?;
    }

    schedule_frames(app.clone(), stop.clone())?;

    Ok(Running {
        app,
        stop,
        on_move,
        on_wheel,
    })
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Decides whether the loop schedules another frame. A failed frame stops
/// the loop for good.
fn keep_running<E: std::fmt::Debug>(stop: &StopSignal, frame: impl FnOnce() -> Result<(), E>) -> bool {
    if stop.is_stopped() {
        return false;
    }
    match frame() {
        Ok(()) => true,
        Err(e) => {
            log::error!("drift frame failed: {e:?}");
            stop.stop();
            false
        }
    }
}

/// Self-rescheduling `requestAnimationFrame` callback.
///
/// The callback owns `next`, the slot holding itself. When the loop ends it
/// empties that slot so the closure, and the app it captured, are freed once
/// it returns.
fn schedule_frames(app: Rc<RefCell<DriftApp>>, stop: StopSignal) -> Result<(), JsValue> {
    let next: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let first = next.clone();

    *first.borrow_mut() = Some(Closure::new(move || {
        if keep_running(&stop, || app.borrow_mut().frame()) {
            let requested = match next.borrow().as_ref() {
                Some(callback) => request_frame(callback),
                None => return,
            };
            match requested {
                Ok(_) => return,
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {e:?}");
                    stop.stop();
                }
            }
        }
        let _ = next.borrow_mut().take();
    }));

    let requested = match first.borrow().as_ref() {
        Some(callback) => request_frame(callback).map(|_| ()),
        None => Ok(()),
    };
    if requested.is_err() {
        let _ = first.borrow_mut().take();
    }
    requested
}
