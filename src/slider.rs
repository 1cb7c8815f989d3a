//! Before/after comparison slider.

use crate::animator::Animator;
use crate::constants::*;
use crate::dom;
use showcase_core::constants::{
    SLIDER_FOLLOW_SEC, SLIDER_HANDLE_CENTER_X_PERCENT, SLIDER_HANDLE_SPIN_SEC,
    SLIDER_INTRO_DELAY_MS, SLIDER_INTRO_SEC,
};
use showcase_core::slider::{reveal_percent, SliderState};
use showcase_core::{Ease, Property, TargetId, TweenSpec};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Slider {
    el: web::HtmlElement,
    after: Option<TargetId>,
    handle: Option<TargetId>,
    state: SliderState,
}

impl Slider {
    fn offset_x(&self, ev: &web::MouseEvent) -> (f64, f64) {
        let rect = dom::rect_of(&self.el);
        (ev.client_x() as f64 - rect.left, rect.width)
    }

    fn targets(&self) -> impl Iterator<Item = (TargetId, Property)> {
        self.after
            .map(|t| (t, Property::WidthPercent))
            .into_iter()
            .chain(self.handle.map(|t| (t, Property::LeftPercent)))
    }

    fn jump(&self, animator: &Animator, percent: f64) {
        for (t, p) in self.targets() {
            animator.set(t, p, percent);
        }
    }

    fn glide(&self, animator: &Animator, percent: f64, duration: f64, ease: Ease) {
        for (t, p) in self.targets() {
            animator.to(t, p, TweenSpec::to(percent, duration).ease(ease));
        }
    }

    fn on_move(&mut self, animator: &Animator, ev: &web::MouseEvent) {
        let (x, width) = self.offset_x(ev);
        if let Some(p) = self.state.on_drag(x, width) {
            self.jump(animator, p);
        } else if let Some(p) = self.state.on_pointer_move(x, width) {
            self.glide(animator, p, SLIDER_FOLLOW_SEC, Ease::Power2Out);
        }
    }

    fn on_down(&mut self, animator: &Animator, ev: &web::MouseEvent) {
        let (x, width) = self.offset_x(ev);
        let p = self.state.on_pointer_down(x, width);
        self.jump(animator, p);
    }

    fn intro(&mut self, animator: &Animator) {
        let p = self.state.intro();
        self.glide(animator, p, SLIDER_INTRO_SEC, Ease::Power2InOut);
    }
}

fn setup(el: web::HtmlElement, animator: &Animator) -> Rc<RefCell<Slider>> {
    let after_el = dom::query_one(&el, SLIDER_AFTER_SELECTOR);
    let handle_el = dom::query_one(&el, SLIDER_HANDLE_SELECTOR);
    let initial = after_el
        .as_ref()
        .map(|a| reveal_percent(a.offset_width() as f64, el.offset_width() as f64))
        .unwrap_or(0.0);

    let after = after_el.map(|a| animator.register(&a));
    let handle = handle_el.map(|h| {
        let id = animator.register(&h);
        animator.set(id, Property::XPercent, SLIDER_HANDLE_CENTER_X_PERCENT);
        animator.from_to(
            id,
            Property::Rotation,
            0.0,
            TweenSpec::to(360.0, SLIDER_HANDLE_SPIN_SEC)
                .ease(Ease::Linear)
                .repeat(),
        );
        id
    });
    let slider = Slider {
        el,
        after,
        handle,
        state: SliderState::new(),
    };
    slider.jump(animator, initial);
    Rc::new(RefCell::new(slider))
}

fn schedule_intro(sliders: Vec<Rc<RefCell<Slider>>>, animator: Animator) {
    let Some(window) = web::window() else {
        return;
    };
    let cb = Closure::once(move || {
        for s in &sliders {
            s.borrow_mut().intro(&animator);
        }
    });
    _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        SLIDER_INTRO_DELAY_MS,
    );
    cb.forget();
}

pub fn init(document: &web::Document, animator: &Animator) -> anyhow::Result<()> {
    let elements = dom::query_all_in_document(document, SLIDER_SELECTOR);
    if elements.is_empty() {
        log::debug!("[slider] none on page, skipping");
        return Ok(());
    }
    log::info!("[slider] {} comparison sliders", elements.len());

    let mut sliders = Vec::with_capacity(elements.len());
    for el in elements {
        let slider = setup(el.clone(), animator);
        {
            let slider = slider.clone();
            let animator = animator.clone();
            dom::listen(&el, "mousemove", move |ev: web::MouseEvent| {
                slider.borrow_mut().on_move(&animator, &ev);
            });
        }
        {
            let slider = slider.clone();
            let animator = animator.clone();
            dom::listen(&el, "mousedown", move |ev: web::MouseEvent| {
                slider.borrow_mut().on_down(&animator, &ev);
            });
        }
        if let Some(window) = web::window() {
            let slider = slider.clone();
            dom::listen(&window, "mouseup", move |_: web::MouseEvent| {
                slider.borrow_mut().state.on_pointer_up();
            });
        }
        sliders.push(slider);
    }
    schedule_intro(sliders, animator.clone());
    Ok(())
}
