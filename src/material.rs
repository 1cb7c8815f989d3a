//! Wood finish swatches: exclusive selection, then a dim → swap → restore
//! pass over the product cards driven by tween completion events.

use crate::animator::Animator;
use crate::constants::*;
use crate::dom;
use crate::viewer::ViewerSlot;
use showcase_core::constants::{
    MATERIAL_DIM_OPACITY, MATERIAL_DIM_SEC, MATERIAL_DIM_Y, MATERIAL_RESTORE_SEC,
};
use showcase_core::material::{CardSwap, Material};
use showcase_core::{Ease, Property, TargetId, TweenEvent, TweenSpec};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

struct Card {
    el: web::HtmlElement,
    target: TargetId,
    swap: CardSwap,
    dim_tag: Option<u32>,
    restore_tag: Option<u32>,
}

impl Card {
    fn is_visible(&self) -> bool {
        self.el.offset_parent().is_some()
    }

    fn dim(&mut self, animator: &Animator, swatch_id: &str) {
        self.swap.select(swatch_id);
        let tag = animator.next_tag();
        self.dim_tag = Some(tag);
        self.restore_tag = None;
        animator.to(
            self.target,
            Property::Y,
            TweenSpec::to(MATERIAL_DIM_Y, MATERIAL_DIM_SEC).tag(tag),
        );
        animator.to(
            self.target,
            Property::Opacity,
            TweenSpec::to(MATERIAL_DIM_OPACITY, MATERIAL_DIM_SEC),
        );
    }

    fn on_dimmed(&mut self, animator: &Animator) {
        self.dim_tag = None;
        if let Some(material) = self.swap.on_dim_complete() {
            if let Some(img) = dom::query_one(&self.el, PRODUCT_IMAGE_SELECTOR) {
                dom::set_style(&img, "filter", material.css_filter());
            }
        }
        let tag = animator.next_tag();
        self.restore_tag = Some(tag);
        let spec = |to| TweenSpec::to(to, MATERIAL_RESTORE_SEC).ease(Ease::Power2Out);
        animator.to(self.target, Property::Y, spec(0.0).tag(tag));
        animator.to(self.target, Property::Opacity, spec(1.0));
    }

    fn on_restored(&mut self) {
        self.restore_tag = None;
        self.swap.on_restore_complete();
    }
}

fn on_tween_event(cards: &mut [Card], animator: &Animator, ev: &TweenEvent) {
    let TweenEvent::Completed { tag: Some(tag), .. } = *ev else {
        return;
    };
    for card in cards.iter_mut() {
        if card.dim_tag == Some(tag) {
            card.on_dimmed(animator);
        } else if card.restore_tag == Some(tag) {
            card.on_restored();
        }
    }
}

fn mark_active(swatches: &[web::HtmlElement], chosen: &web::HtmlElement) {
    for s in swatches {
        _ = s
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, s == chosen);
    }
}

pub fn init(
    document: &web::Document,
    animator: &Animator,
    viewer: ViewerSlot,
) -> anyhow::Result<()> {
    let swatches = dom::query_all_in_document(document, MATERIAL_OPTION_SELECTOR);
    if swatches.is_empty() {
        log::debug!("[material] no swatches, skipping");
        return Ok(());
    }
    let cards: Vec<Card> = dom::query_all_in_document(document, PRODUCT_CARD_SELECTOR)
        .into_iter()
        .map(|el| Card {
            target: animator.register(&el),
            el,
            swap: CardSwap::new(),
            dim_tag: None,
            restore_tag: None,
        })
        .collect();
    log::info!(
        "[material] {} swatches, {} product cards",
        swatches.len(),
        cards.len()
    );
    let cards = Rc::new(RefCell::new(cards));

    {
        let cards = cards.clone();
        animator.on_event(move |animator, ev| {
            if let Ok(mut cards) = cards.try_borrow_mut() {
                on_tween_event(&mut cards, animator, ev);
            }
        });
    }

    let swatches = Rc::new(swatches);
    for swatch in swatches.iter() {
        let chosen = swatch.clone();
        let swatches = swatches.clone();
        let cards = cards.clone();
        let animator = animator.clone();
        let viewer = viewer.clone();
        dom::listen(swatch, "click", move |_: web::MouseEvent| {
            mark_active(&swatches, &chosen);
            let id = chosen.get_attribute(MATERIAL_ATTR).unwrap_or_default();
            for card in cards.borrow_mut().iter_mut().filter(|c| c.is_visible()) {
                card.dim(&animator, &id);
            }
            match Material::from_id(&id) {
                Some(material) => viewer.set_material(material),
                None => log::debug!("[material] unknown swatch '{}'", id),
            }
        });
    }
    Ok(())
}
