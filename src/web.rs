// web.rs - Browser host for one field
//
// Creates the canvas, wires pointer/touch/resize/visibility listeners and
// drives `tick` from requestAnimationFrame. Unmounting (or dropping the
// mount) cancels the pending frame, drops every listener and removes the
// canvas, so mount/unmount cycles leak nothing.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::{Function, Reflect};
use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement, ImageData, MouseEvent,
    TouchEvent, Window,
};

use crate::{words_from, Constellation, FieldConfig, Motion, Theme, ARIA_LABEL};

struct Host {
    field: RefCell<Constellation>,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    frame: RefCell<Option<AnimationFrame>>,
}

impl Host {
    fn schedule(self: &Rc<Self>) {
        let host = Rc::clone(self);
        let handle = request_animation_frame(move |now| host.on_frame(now));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, now: f64) {
        self.frame.borrow_mut().take();

        let (running, visible) = {
            let mut field = self.field.borrow_mut();
            field.tick(now);
            (field.is_running(), field.is_visible())
        };

        if !running {
            warn!("field is no longer running, frame loop ends");
            return;
        }
        // Hidden tabs keep polling cheaply so the field resumes at once
        if visible {
            self.blit();
        }
        self.schedule();
    }

    fn blit(&self) {
        let field = self.field.borrow();
        let (w, h) = (field.width(), field.height());
        if w == 0 || h == 0 { return; }

        let pixels = field.renderer().pixels();
        match ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels), w, h) {
            Ok(image) => {
                if let Err(err) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                    warn!("put_image_data failed: {:?}", err);
                }
            }
            Err(err) => warn!("ImageData failed: {:?}", err),
        }
    }

    /// Size the canvas to the container and re-target the field
    fn measure(&self) {
        let rect = self.container.get_bounding_client_rect();
        let w = rect.width().max(0.0) as u32;
        let h = rect.height().max(0.0) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.field.borrow_mut().resize(w, h);
    }

    /// Client coordinates to canvas-local
    fn local(&self, client_x: i32, client_y: i32) -> (f32, f32) {
        let rect = self.canvas.get_bounding_client_rect();
        ((client_x as f64 - rect.left()) as f32, (client_y as f64 - rect.top()) as f32)
    }
}

/// A mounted field; keep it alive for as long as the field should run
#[wasm_bindgen]
pub struct FieldMount {
    host: Option<Rc<Host>>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl FieldMount {
    pub fn unmount(&mut self) {
        self.listeners.clear();
        if let Some(host) = self.host.take() {
            host.frame.borrow_mut().take();
            host.field.borrow_mut().stop();
            host.canvas.remove();
            info!("field unmounted");
        }
    }

    pub fn active_word(&self) -> Option<String> {
        let host = self.host.as_ref()?;
        let field = host.field.borrow();
        field.active_word().map(str::to_string)
    }
}

impl Drop for FieldMount {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount a field filling `container`, cycling through `words`
#[wasm_bindgen]
pub fn mount_constellation(
    container: HtmlElement,
    words: js_sys::Array,
    density: f32,
) -> Result<FieldMount, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window.document().ok_or_else(|| JsError::new("no document"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| JsError::new("created element is not a canvas"))?;
    canvas.set_attribute("role", "img").map_err(js_err)?;
    canvas.set_attribute("aria-label", ARIA_LABEL).map_err(js_err)?;
    canvas.style().set_property("display", "block").map_err(js_err)?;
    container.append_child(&canvas).map_err(js_err)?;

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| JsError::new("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| JsError::new("2d context unavailable"))?;

    let config = FieldConfig { density, ..FieldConfig::default() };
    let mut field = Constellation::new(0, 0, words_from(&words), config)?;
    field.set_motion(prefers_motion(&window));
    field.set_theme(prefers_theme(&window));
    field.set_visible(document_visible(&document));

    let host = Rc::new(Host {
        field: RefCell::new(field),
        container,
        canvas,
        ctx,
        frame: RefCell::new(None),
    });

    host.measure();
    host.field.borrow_mut().start();
    host.schedule();

    let listeners = listen(&host, &window, &document);
    info!("field mounted");

    Ok(FieldMount { host: Some(host), listeners })
}

fn listen(host: &Rc<Host>, window: &Window, document: &Document) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let canvas = host.canvas.clone();

    let h = Rc::clone(host);
    listeners.push(EventListener::new(&canvas, "pointermove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return; };
        let (x, y) = h.local(event.client_x(), event.client_y());
        h.field.borrow_mut().pointer_move(x, y);
    }));

    let h = Rc::clone(host);
    listeners.push(EventListener::new(&canvas, "touchmove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<TouchEvent>() else { return; };
        let Some(touch) = event.touches().get(0) else { return; };
        let (x, y) = h.local(touch.client_x(), touch.client_y());
        h.field.borrow_mut().pointer_move(x, y);
    }));

    for kind in ["pointerleave", "touchend", "touchcancel"] {
        let h = Rc::clone(host);
        listeners.push(EventListener::new(&canvas, kind, move |_event: &Event| {
            h.field.borrow_mut().pointer_leave();
        }));
    }

    let h = Rc::clone(host);
    listeners.push(EventListener::new(window, "resize", move |_event: &Event| {
        h.measure();
    }));

    let h = Rc::clone(host);
    let doc = document.clone();
    listeners.push(EventListener::new(document, "visibilitychange", move |_event: &Event| {
        h.field.borrow_mut().set_visible(document_visible(&doc));
    }));

    listeners
}

fn js_err(value: JsValue) -> JsError {
    JsError::new(&format!("{:?}", value))
}

/// `window.matchMedia(query).matches`, None when unsupported
fn media_matches(window: &Window, query: &str) -> Option<bool> {
    let match_media = Reflect::get(window, &"matchMedia".into()).ok()?;
    let match_media = match_media.dyn_into::<Function>().ok()?;
    let list = match_media.call1(window, &query.into()).ok()?;
    Reflect::get(&list, &"matches".into()).ok()?.as_bool()
}

fn prefers_motion(window: &Window) -> Motion {
    match media_matches(window, "(prefers-reduced-motion: reduce)") {
        Some(reduced) => Motion::from_reduced(reduced),
        None => Motion::Unknown,
    }
}

fn prefers_theme(window: &Window) -> Theme {
    match media_matches(window, "(prefers-color-scheme: dark)") {
        Some(false) => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Visible unless the document says it is hidden
fn document_visible(document: &Document) -> bool {
    Reflect::get(document, &"hidden".into())
        .ok()
        .and_then(|v| v.as_bool())
        .map_or(true, |hidden| !hidden)
}
