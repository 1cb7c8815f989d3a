use crate::constants::MAX_FRAME_DT_SEC;
use instant::Instant;
use showcase_core::{Clock, FrameHandle, FrameScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Wall clock for throttles, measured from page start.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Seconds since the previous call, clamped so a tab coming back from the
/// background does not fast-forward every animation.
pub struct FrameTimer {
    last: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn lap(&mut self) -> f64 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f64();
        self.last = now;
        dt.clamp(0.0, MAX_FRAME_DT_SEC)
    }
}

/// Run `tick` on every animation frame for the life of the page.
pub fn start_loop(mut tick: impl FnMut(f64) + 'static) {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let slot_inner = slot.clone();
    let mut timer = FrameTimer::new();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        tick(timer.lap());
        if let (Some(w), Some(cb)) = (web::window(), slot_inner.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), slot.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` with cancellation, for loops that must stop.
///
/// The callback is bound after construction because it usually captures the
/// object that owns this scheduler.
#[derive(Clone, Default)]
pub struct RafScheduler {
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, callback: impl FnMut() + 'static) {
        *self.callback.borrow_mut() = Some(Closure::wrap(Box::new(callback) as Box<dyn FnMut()>));
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let w = web::window()?;
        let cb = self.callback.borrow();
        let cb = cb.as_ref()?;
        w.request_animation_frame(cb.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle.0);
        }
    }
}
