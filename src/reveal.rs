//! Scroll-triggered section reveals, image parallax and the hiding header.

use crate::animator::Animator;
use crate::constants::*;
use crate::dom;
use showcase_core::constants::{
    HEADER_HIDDEN_Y_PERCENT, HEADER_TWEEN_SEC, REVEAL_DURATION_SEC, REVEAL_OFFSET_Y,
    REVEAL_STAGGER_SEC,
};
use showcase_core::scroll::{
    parallax_offset, reveal_ease, scrub_progress, HeaderState, RevealParams, RevealTrigger,
    ToggleAction,
};
use showcase_core::tween::stagger_delays;
use showcase_core::{Ease, Property, TargetId, TweenSpec};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

struct Section {
    region: web::Element,
    trigger: RevealTrigger,
    targets: Vec<TargetId>,
}

struct ParallaxImage {
    el: web::HtmlElement,
    target: TargetId,
}

struct Header {
    el: web::HtmlElement,
    target: TargetId,
    state: HeaderState,
}

struct ScrollEffects {
    animator: Animator,
    sections: Vec<Section>,
    images: Vec<ParallaxImage>,
    header: Option<Header>,
}

impl ScrollEffects {
    fn on_scroll(&mut self) {
        let (_, vh) = dom::viewport_size();
        for section in &mut self.sections {
            let top = section.region.get_bounding_client_rect().top();
            match section.trigger.update(top, vh) {
                Some(ToggleAction::Play) => play(&self.animator, &section.targets),
                Some(ToggleAction::Reverse) => reverse(&self.animator, &section.targets),
                _ => {}
            }
        }
        for img in &self.images {
            let rect = dom::rect_of(&img.el);
            // measure without our own shift so the effect does not feed back
            let shift = self.animator.value(img.target, Property::Y);
            let progress = scrub_progress(rect.top - shift, rect.height, vh);
            self.animator
                .set(img.target, Property::Y, parallax_offset(progress));
        }
        if let Some(header) = self.header.as_mut() {
            let scroll_top = web::window()
                .and_then(|w| w.scroll_y().ok())
                .unwrap_or(0.0);
            let update = header.state.update(scroll_top);
            if let Some(hidden) = update.hidden {
                let y = if hidden { HEADER_HIDDEN_Y_PERCENT } else { 0.0 };
                self.animator.to(
                    header.target,
                    Property::YPercent,
                    TweenSpec::to(y, HEADER_TWEEN_SEC).ease(Ease::Power3Out),
                );
            }
            if let Some(scrolled) = update.scrolled {
                _ = header
                    .el
                    .class_list()
                    .toggle_with_force(HEADER_SCROLLED_CLASS, scrolled);
            }
        }
    }
}

fn play(animator: &Animator, targets: &[TargetId]) {
    for (&t, delay) in targets.iter().zip(stagger_delays(targets.len(), REVEAL_STAGGER_SEC)) {
        let spec = |to| {
            TweenSpec::to(to, REVEAL_DURATION_SEC)
                .ease(reveal_ease(ToggleAction::Play))
                .delay(delay)
        };
        animator.to(t, Property::Y, spec(0.0));
        animator.to(t, Property::Opacity, spec(1.0));
    }
}

/// Play the batch backwards: the last element to arrive leaves first.
fn reverse(animator: &Animator, targets: &[TargetId]) {
    let delays = stagger_delays(targets.len(), REVEAL_STAGGER_SEC);
    for (&t, delay) in targets.iter().rev().zip(delays) {
        let spec = |to| {
            TweenSpec::to(to, REVEAL_DURATION_SEC)
                .ease(reveal_ease(ToggleAction::Reverse))
                .delay(delay)
        };
        animator.to(t, Property::Y, spec(REVEAL_OFFSET_Y));
        animator.to(t, Property::Opacity, spec(0.0));
    }
}

pub fn init(document: &web::Document, animator: &Animator) -> anyhow::Result<()> {
    let regions = dom::query_all_in_document(document, SCROLL_SECTION_SELECTOR);
    let mut sections = Vec::with_capacity(regions.len());
    let mut images = Vec::new();
    for region in regions {
        let targets: Vec<TargetId> = dom::query_all(&region, REVEAL_TARGET_SELECTOR)
            .iter()
            .map(|el| {
                let id = animator.register(el);
                animator.set(id, Property::Y, REVEAL_OFFSET_Y);
                animator.set(id, Property::Opacity, 0.0);
                id
            })
            .collect();
        for el in dom::query_all(&region, PARALLAX_IMAGE_SELECTOR) {
            let target = animator.register(&el);
            images.push(ParallaxImage { el, target });
        }
        sections.push(Section {
            region: region.into(),
            trigger: RevealTrigger::new(RevealParams::default()),
            targets,
        });
    }

    let header = dom::query_all_in_document(document, HEADER_SELECTOR)
        .into_iter()
        .next()
        .map(|el| Header {
            target: animator.register(&el),
            el,
            state: HeaderState::new(),
        });

    if sections.is_empty() && header.is_none() {
        log::debug!("[reveal] no scroll sections or header, skipping");
        return Ok(());
    }
    log::info!(
        "[reveal] {} sections, {} parallax images, header={}",
        sections.len(),
        images.len(),
        header.is_some()
    );

    let effects = Rc::new(RefCell::new(ScrollEffects {
        animator: animator.clone(),
        sections,
        images,
        header,
    }));
    effects.borrow_mut().on_scroll();

    if let Some(window) = web::window() {
        for event in ["scroll", "resize"] {
            let effects = effects.clone();
            dom::listen(&window, event, move |_: web::Event| {
                effects.borrow_mut().on_scroll();
            });
        }
    }
    Ok(())
}
