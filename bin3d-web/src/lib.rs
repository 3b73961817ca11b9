/// bin3d Web - the bin scene on an HTML canvas
///
/// Binds mouse, wheel and touch input on a `<canvas>` to the animation
/// driver and redraws once per `requestAnimationFrame`.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bin3d_core::{AnimationDriver, BinScene, PointerEvent, ViewConfig, ViewDelta};
use tracing::{debug, info, warn};
use wasm_bindgen::closure::{IntoWasmClosure, WasmClosure};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList,
    WheelEvent, Window,
};

pub mod canvas;
pub mod console;

pub use canvas::CanvasSurface;

struct CanvasApp {
    driver: AnimationDriver<BinScene>,
    surface: CanvasSurface,
    last_time: Option<f64>,
}

impl CanvasApp {
    /// Draw one frame; `now` is the rAF timestamp in milliseconds.
    fn frame(&mut self, now: f64) {
        let dt = self.last_time.map_or(0.0, |last| (now - last) / 1000.0);
        self.last_time = Some(now);
        self.driver.frame(dt, &mut self.surface);
    }
}

/// The bin scene attached to a canvas element.
#[wasm_bindgen]
pub struct BinCanvas {
    app: Rc<RefCell<CanvasApp>>,
    started: StartGuard,
}

/// Remembers whether the animation loop is already running.
#[derive(Debug, Default)]
struct StartGuard(Cell<bool>);

impl StartGuard {
    /// True the first time, false while a loop is running.
    fn begin(&self) -> bool {
        !self.0.replace(true)
    }

    fn reset(&self) {
        self.0.set(false);
    }
}

#[wasm_bindgen]
impl BinCanvas {
    /// Attach to the canvas with the given element id and bind its input.
    pub fn attach(canvas_id: &str) -> Result<BinCanvas, JsValue> {
        let window = window()?;
        let canvas = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;

        let app = Rc::new(RefCell::new(CanvasApp {
            driver: AnimationDriver::new(ViewConfig::default(), BinScene::new()),
            surface: CanvasSurface::new(canvas.clone())?,
            last_time: None,
        }));

        bind_input(&window, &canvas, &app)?;
        info!(canvas_id, "bin canvas attached");
        Ok(BinCanvas {
            app,
            started: StartGuard::default(),
        })
    }

    /// Start the animation loop. It runs until the page goes away; later
    /// calls do nothing.
    pub fn start(&self) -> Result<(), JsValue> {
        if !self.started.begin() {
            debug!("animation loop already running");
            return Ok(());
        }
        let app = Rc::clone(&self.app);
        let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let first = Rc::clone(&tick);

        *first.borrow_mut() = Some(Closure::new(move |now: f64| {
            app.borrow_mut().frame(now);
            if let Some(callback) = tick.borrow().as_ref() {
                if let Err(err) = request_frame(callback) {
                    warn!(?err, "requestAnimationFrame failed");
                }
            }
        }));

        let requested = match first.borrow().as_ref() {
            Some(callback) => request_frame(callback),
            None => Ok(()),
        };
        if requested.is_err() {
            self.started.reset();
        }
        requested
    }

    /// Rotate by a drag of `dx`, `dy` pixels.
    pub fn rotate(&self, dx: f64, dy: f64) {
        self.app
            .borrow_mut()
            .driver
            .push_delta(ViewDelta::Drag { dx, dy });
    }

    /// Zoom by wheel units; positive zooms out.
    pub fn zoom(&self, delta: f64) {
        self.app
            .borrow_mut()
            .driver
            .push_delta(ViewDelta::Zoom { delta });
    }

    #[wasm_bindgen(getter)]
    pub fn yaw(&self) -> f64 {
        self.app.borrow().driver.view().rotation_y()
    }

    #[wasm_bindgen(getter)]
    pub fn pitch(&self) -> f64 {
        self.app.borrow().driver.view().rotation_x()
    }

    #[wasm_bindgen(getter, js_name = zoomLevel)]
    pub fn zoom_level(&self) -> f64 {
        self.app.borrow().driver.view().zoom()
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<(), JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}

/// Distance between two touch points.
pub fn touch_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn touch_point(touches: &TouchList, index: u32) -> Option<(f64, f64)> {
    let touch = touches.get(index)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Pointer event for the current touch list, if it means anything.
fn touch_event(touches: &TouchList) -> Option<PointerEvent> {
    match touches.length() {
        0 => None,
        1 => {
            let (x, y) = touch_point(touches, 0)?;
            Some(PointerEvent::Move { x, y })
        }
        _ => {
            let distance = touch_distance(touch_point(touches, 0)?, touch_point(touches, 1)?);
            Some(PointerEvent::Pinch { distance })
        }
    }
}

fn listen<E, F>(target: &EventTarget, kind: &str, handler: F) -> Result<(), JsValue>
where
    dyn FnMut(E): WasmClosure,
    F: IntoWasmClosure<dyn FnMut(E)> + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

fn bind_input(
    window: &Window,
    canvas: &HtmlCanvasElement,
    app: &Rc<RefCell<CanvasApp>>,
) -> Result<(), JsValue> {
    let feed = {
        let app = Rc::clone(app);
        move |event: PointerEvent| app.borrow_mut().driver.handle_pointer(event)
    };

    let press = feed.clone();
    listen(canvas, "mousedown", move |e: MouseEvent| {
        press(PointerEvent::Press {
            x: e.client_x() as f64,
            y: e.client_y() as f64,
        })
    })?;
    let release = feed.clone();
    listen(window, "mouseup", move |_: MouseEvent| release(PointerEvent::Release))?;
    let drag = feed.clone();
    listen(window, "mousemove", move |e: MouseEvent| {
        drag(PointerEvent::Move {
            x: e.client_x() as f64,
            y: e.client_y() as f64,
        })
    })?;

    let touch_start = feed.clone();
    listen(canvas, "touchstart", move |e: TouchEvent| {
        if let Some((x, y)) = touch_point(&e.touches(), 0) {
            touch_start(PointerEvent::Press { x, y });
        }
    })?;
    let touch_end = feed.clone();
    listen(window, "touchend", move |e: TouchEvent| {
        match e.touches().length() {
            0 => touch_end(PointerEvent::Release),
            1 => {
                if let Some((x, y)) = touch_point(&e.touches(), 0) {
                    touch_end(PointerEvent::PinchEnd { x, y });
                }
            }
            _ => {}
        }
    })?;
    let touch_move = feed.clone();
    listen(window, "touchmove", move |e: TouchEvent| {
        if let Some(event) = touch_event(&e.touches()) {
            touch_move(event);
        }
    })?;

    // Wheel needs a non-passive listener so the page does not scroll
    let wheel = feed;
    let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |e: WheelEvent| {
        wheel(PointerEvent::Wheel {
            delta_y: e.delta_y(),
        });
        e.prevent_default();
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        on_wheel.as_ref().unchecked_ref(),
        &options,
    )?;
    on_wheel.forget();

    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Panics and log events show up in the browser console
    console_error_panic_hook::set_once();
    console::init_logging();
    info!("bin3d-web v{} loaded", env!("CARGO_PKG_VERSION"));
    Ok(())
}
