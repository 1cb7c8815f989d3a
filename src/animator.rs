//! Frame-driven tweening of DOM elements.
//!
//! Elements are registered once and get a [`TargetId`]; tweens run in the
//! shared [`TweenEngine`] and every frame the animator writes the changed
//! values back as inline styles. Completion events go to observers, which
//! may start new tweens from inside the callback.

use crate::constants::ANIM_ID_ATTR;
use crate::dom;
use crate::frame;
use fnv::FnvHashMap;
use showcase_core::style::{percent, transform_css};
use showcase_core::{Property, TargetId, TweenEngine, TweenEvent, TweenSpec};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

type Observer = Box<dyn FnMut(&Animator, &TweenEvent)>;

#[derive(Default)]
struct Inner {
    engine: TweenEngine,
    elements: FnvHashMap<TargetId, web::HtmlElement>,
    next_id: u32,
    next_tag: u32,
    observers: Vec<Observer>,
}

#[derive(Clone, Default)]
pub struct Animator(Rc<RefCell<Inner>>);

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the animator from its own animation-frame loop.
    pub fn start(&self) {
        let me = self.clone();
        frame::start_loop(move |dt| me.tick(dt));
    }

    /// Target id for `el`, registering it on first use.
    pub fn register(&self, el: &web::HtmlElement) -> TargetId {
        if let Some(id) = el
            .get_attribute(ANIM_ID_ATTR)
            .and_then(|s| s.parse::<u32>().ok())
        {
            let id = TargetId(id);
            if self.0.borrow().elements.contains_key(&id) {
                return id;
            }
        }
        let mut inner = self.0.borrow_mut();
        inner.next_id += 1;
        let id = TargetId(inner.next_id);
        _ = el.set_attribute(ANIM_ID_ATTR, &id.0.to_string());
        inner.elements.insert(id, el.clone());
        id
    }

    /// Fresh tag for recognising a tween's completion event.
    pub fn next_tag(&self) -> u32 {
        let mut inner = self.0.borrow_mut();
        inner.next_tag = inner.next_tag.wrapping_add(1);
        inner.next_tag
    }

    pub fn value(&self, target: TargetId, property: Property) -> f64 {
        self.0.borrow().engine.value(target, property)
    }

    pub fn set(&self, target: TargetId, property: Property, value: f64) {
        self.0.borrow_mut().engine.set(target, property, value);
    }

    pub fn to(&self, target: TargetId, property: Property, spec: TweenSpec) {
        self.0.borrow_mut().engine.to(target, property, spec);
    }

    pub fn from_to(&self, target: TargetId, property: Property, from: f64, spec: TweenSpec) {
        self.0.borrow_mut().engine.from_to(target, property, from, spec);
    }

    pub fn on_event(&self, observer: impl FnMut(&Animator, &TweenEvent) + 'static) {
        self.0.borrow_mut().observers.push(Box::new(observer));
    }

    /// Advance all tweens, write styles, then notify observers.
    pub fn tick(&self, dt_sec: f64) {
        let events = {
            let mut inner = self.0.borrow_mut();
            let events = inner.engine.tick(dt_sec);
            let dirty = inner.engine.drain_dirty();
            for target in dirty {
                if let Some(el) = inner.elements.get(&target) {
                    apply_styles(el, &inner.engine, target);
                }
            }
            events
        };
        if events.is_empty() {
            return;
        }
        let mut observers = std::mem::take(&mut self.0.borrow_mut().observers);
        for ev in &events {
            for observer in observers.iter_mut() {
                observer(self, ev);
            }
        }
        let mut inner = self.0.borrow_mut();
        // keep observers registered while we were dispatching
        observers.append(&mut inner.observers);
        inner.observers = observers;
    }
}

fn apply_styles(el: &web::HtmlElement, engine: &TweenEngine, target: TargetId) {
    let has = |p| engine.try_value(target, p).is_some();
    if has(Property::X)
        || has(Property::Y)
        || has(Property::XPercent)
        || has(Property::YPercent)
        || has(Property::Rotation)
    {
        let v = |p| engine.value(target, p);
        let css = transform_css(
            v(Property::X),
            v(Property::Y),
            v(Property::XPercent),
            v(Property::YPercent),
            v(Property::Rotation),
        );
        dom::set_style(el, "transform", &css);
    }
    if let Some(o) = engine.try_value(target, Property::Opacity) {
        dom::set_style(el, "opacity", &o.to_string());
    }
    if let Some(w) = engine.try_value(target, Property::WidthPercent) {
        dom::set_style(el, "width", &percent(w));
    }
    if let Some(l) = engine.try_value(target, Property::LeftPercent) {
        dom::set_style(el, "left", &percent(l));
    }
}
