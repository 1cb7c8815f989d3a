//! Magnetic hover on call-to-action buttons.

use crate::animator::Animator;
use crate::constants::*;
use crate::dom;
use crate::frame::InstantClock;
use showcase_core::constants::{MAGNETIC_RESET_SEC, MAGNETIC_THROTTLE_MS};
use showcase_core::magnetic::{MagneticButton, MagneticOffset};
use showcase_core::style::px;
use showcase_core::{throttle, Ease, Property, TargetId, TweenSpec};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

struct Button {
    el: web::HtmlElement,
    target: TargetId,
    content: Option<TargetId>,
    state: MagneticButton,
}

impl Button {
    fn on_move(&mut self, animator: &Animator, ev: &web::MouseEvent) {
        let rect = dom::rect_of(&self.el);
        match self
            .state
            .on_move(ev.client_x() as f64, ev.client_y() as f64, rect)
        {
            Ok(offset) => {
                dom::set_style(&self.el, MAGNETIC_TX_VAR, &px(offset.dx));
                dom::set_style(&self.el, MAGNETIC_TY_VAR, &px(offset.dy));
                place(animator, self.target, offset);
                if let Some(content) = self.content {
                    place(animator, content, offset.content());
                }
            }
            Err(e) => log::warn!("[magnetic] {}", e),
        }
    }

    fn on_leave(&mut self, animator: &Animator) {
        self.state.on_leave();
        dom::set_style(&self.el, MAGNETIC_TX_VAR, "0px");
        dom::set_style(&self.el, MAGNETIC_TY_VAR, "0px");
        for target in std::iter::once(self.target).chain(self.content) {
            for property in [Property::X, Property::Y] {
                animator.to(
                    target,
                    property,
                    TweenSpec::to(0.0, MAGNETIC_RESET_SEC).ease(Ease::ELASTIC),
                );
            }
        }
    }
}

fn place(animator: &Animator, target: TargetId, offset: MagneticOffset) {
    animator.set(target, Property::X, offset.dx);
    animator.set(target, Property::Y, offset.dy);
}

pub fn init(document: &web::Document, animator: &Animator) -> anyhow::Result<()> {
    if dom::is_touch_device() {
        log::info!("[magnetic] touch device, disabled");
        return Ok(());
    }
    let elements = dom::query_all_in_document(document, MAGNETIC_BUTTON_SELECTOR);
    if elements.is_empty() {
        log::debug!("[magnetic] no buttons, skipping");
        return Ok(());
    }
    log::info!("[magnetic] {} buttons", elements.len());

    for el in elements {
        let content = dom::query_one(&el, MAGNETIC_CONTENT_SELECTOR).map(|c| animator.register(&c));
        let button = Rc::new(RefCell::new(Button {
            target: animator.register(&el),
            el: el.clone(),
            content,
            state: MagneticButton::new(),
        }));

        let on_move = {
            let button = button.clone();
            let animator = animator.clone();
            throttle(
                InstantClock::new(),
                MAGNETIC_THROTTLE_MS,
                move |ev: web::MouseEvent| button.borrow_mut().on_move(&animator, &ev),
            )
        };
        dom::listen(&el, "mousemove", on_move);

        let animator = animator.clone();
        dom::listen(&el, "mouseleave", move |_: web::MouseEvent| {
            button.borrow_mut().on_leave(&animator);
        });
    }
    Ok(())
}
