//! Browser side of the product viewer: canvas, WebGPU backend, input wiring
//! and page-unload teardown around the lifecycle in `showcase_core::viewer`.

mod gpu;

use crate::constants::*;
use crate::dom::{self, ListenerSet};
use crate::frame::{FrameTimer, InstantClock, RafScheduler};
use gpu::WebGpuBackend;
use showcase_core::constants::{RESIZE_THROTTLE_MS, VIEWER_MAX_PIXEL_RATIO};
use showcase_core::material::Material;
use showcase_core::throttle;
use showcase_core::viewer::{OrbitControls, OrbitParams, SceneDesc, Viewer, ViewerCommand};
use showcase_core::ViewerError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

pub type WebViewer = Viewer<WebGpuBackend, RafScheduler>;

/// Where the running viewer lives once it is up; other effects (the material
/// switcher) reach it through here. Empty before init and after unload.
#[derive(Clone, Default)]
pub struct ViewerSlot(Rc<RefCell<Option<Rc<RefCell<WebViewer>>>>>);

impl ViewerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self) -> Option<Rc<RefCell<WebViewer>>> {
        self.0.borrow().clone()
    }

    fn fill(&self, viewer: Rc<RefCell<WebViewer>>) {
        *self.0.borrow_mut() = Some(viewer);
    }

    fn take(&self) -> Option<Rc<RefCell<WebViewer>>> {
        self.0.borrow_mut().take()
    }

    /// Recolour the viewer's wood, if it is running.
    pub fn set_material(&self, material: Material) {
        if let Some(viewer) = self.get() {
            if let Ok(mut v) = viewer.try_borrow_mut() {
                v.set_material(material);
            }
        }
    }

    fn with_controls(&self, f: impl FnOnce(&mut OrbitControls)) {
        let Some(viewer) = self.get() else {
            return;
        };
        let Ok(mut v) = viewer.try_borrow_mut() else {
            return;
        };
        if let Some(controls) = v.controls() {
            f(controls);
        }
    }
}

pub fn show_fallback(document: &web::Document) {
    if let Some(el) = document
        .get_element_by_id(VIEWER_FALLBACK_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        dom::set_style(&el, "display", "flex");
    }
}

fn drawing_size(container: &web::HtmlElement) -> (u32, u32) {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .min(VIEWER_MAX_PIXEL_RATIO);
    let w = (container.client_width().max(1) as f64 * dpr).round() as u32;
    let h = (container.client_height().max(1) as f64 * dpr).round() as u32;
    (w.max(1), h.max(1))
}

fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> Result<web::HtmlCanvasElement, ViewerError> {
    let canvas = document
        .create_element("canvas")
        .ok()
        .and_then(|e| e.dyn_into::<web::HtmlCanvasElement>().ok())
        .ok_or_else(|| ViewerError::Resource {
            what: "canvas",
            reason: "createElement failed".into(),
        })?;
    canvas.set_class_name(VIEWER_CANVAS_CLASS);
    dom::set_style(&canvas, "width", "100%");
    dom::set_style(&canvas, "height", "100%");
    dom::set_style(&canvas, "display", "block");
    dom::set_style(&canvas, "touch-action", "none");
    let (w, h) = drawing_size(container);
    canvas.set_width(w);
    canvas.set_height(h);
    container
        .append_child(&canvas)
        .map_err(|e| ViewerError::Resource {
            what: "canvas",
            reason: format!("{:?}", e),
        })?;
    Ok(canvas)
}

/// Orbit input on the canvas; the set is torn down with the viewer.
fn wire_controls(listeners: &mut ListenerSet, canvas: &web::HtmlCanvasElement, slot: &ViewerSlot) {
    let s = slot.clone();
    listeners.add(canvas, "pointerdown", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            s.with_controls(|c| c.pointer_down(ev.client_x() as f32, ev.client_y() as f32));
        }
    });
    let s = slot.clone();
    let target = canvas.clone();
    listeners.add(canvas, "pointermove", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
            let h = target.client_height() as f32;
            s.with_controls(|c| c.pointer_move(ev.client_x() as f32, ev.client_y() as f32, h));
        }
    });
    if let Some(window) = web::window() {
        let s = slot.clone();
        listeners.add(&window, "pointerup", move |_| s.with_controls(|c| c.pointer_up()));
    }
    let s = slot.clone();
    listeners.add(canvas, "wheel", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::WheelEvent>() {
            ev.prevent_default();
            s.with_controls(|c| c.wheel(ev.delta_y() as f32));
        }
    });
}

fn wire_buttons(container: &web::HtmlElement, viewer: &Rc<RefCell<WebViewer>>) {
    for btn in dom::query_all(container, VIEWER_CONTROL_SELECTOR) {
        let class_name = btn.class_name();
        let Some(command) = ViewerCommand::from_classes(class_name.split_whitespace()) else {
            log::debug!("[viewer] control without a known command: {}", class_name);
            continue;
        };
        let viewer = Rc::downgrade(viewer);
        dom::listen(&btn, "click", move |_: web::MouseEvent| {
            if let Some(v) = viewer.upgrade() {
                v.borrow_mut().command(command);
            }
        });
    }
}

fn wire_resize(container: &web::HtmlElement, viewer: &Rc<RefCell<WebViewer>>) {
    let Some(window) = web::window() else {
        return;
    };
    let container = container.clone();
    let viewer = Rc::downgrade(viewer);
    let on_resize = throttle(
        InstantClock::new(),
        RESIZE_THROTTLE_MS,
        move |_: web::Event| {
            if let Some(v) = viewer.upgrade() {
                let (w, h) = drawing_size(&container);
                v.borrow_mut().resize(w, h);
            }
        },
    );
    dom::listen(&window, "resize", on_resize);
}

fn wire_unload(slot: &ViewerSlot) {
    let Some(window) = web::window() else {
        return;
    };
    let slot = slot.clone();
    dom::listen(&window, "beforeunload", move |_: web::Event| {
        if let Some(viewer) = slot.take() {
            viewer.borrow_mut().dispose();
        }
    });
}

/// Build the viewer inside `#3d-viewer`. A missing container shows the
/// fallback and is not an error; any other failure is returned after the
/// partial viewer has been cleaned up.
pub async fn init(document: web::Document, slot: ViewerSlot) -> anyhow::Result<()> {
    let Some(container) = document
        .get_element_by_id(VIEWER_CONTAINER_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    else {
        log::info!("[viewer] {}", ViewerError::MissingContainer);
        show_fallback(&document);
        return Ok(());
    };

    let canvas = create_canvas(&document, &container)?;
    let mut backend = match WebGpuBackend::new(canvas.clone()).await {
        Ok(b) => b,
        Err(e) => {
            canvas.remove();
            return Err(e.into());
        }
    };
    wire_controls(backend.controls_mut(), &canvas, &slot);

    let scheduler = RafScheduler::new();
    let mut viewer = Viewer::new(
        backend,
        scheduler.clone(),
        SceneDesc::showcase(),
        OrbitParams::default(),
    );
    let (w, h) = (canvas.width(), canvas.height());
    viewer.construct(w, h)?;
    let viewer = Rc::new(RefCell::new(viewer));

    let weak: Weak<RefCell<WebViewer>> = Rc::downgrade(&viewer);
    let mut timer = FrameTimer::new();
    scheduler.bind(move || {
        if let Some(v) = weak.upgrade() {
            v.borrow_mut().frame(timer.lap());
        }
    });

    wire_buttons(&container, &viewer);
    wire_resize(&container, &viewer);
    wire_unload(&slot);

    viewer.borrow_mut().start();
    slot.fill(viewer);
    log::info!("[viewer] running at {}x{}", w, h);
    Ok(())
}
