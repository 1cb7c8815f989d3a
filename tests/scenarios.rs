//! End-to-end behaviour of the page effects, driven through the core types
//! the way the browser handlers drive them.

use rand::rngs::StdRng;
use rand::SeedableRng;
use showcase_core::magnetic::MagneticButton;
use showcase_core::material::{CardSwap, Material, SwapPhase};
use showcase_core::particles::{particle_count, ParticleField};
use showcase_core::scroll::{RevealParams, RevealTrigger, ToggleAction};
use showcase_core::slider::SliderState;
use showcase_core::{
    throttle, Clock, Ease, Property, Rect, TargetId, TweenEngine, TweenEvent, TweenSpec,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Default)]
struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

#[test]
fn particle_field_sized_for_viewport() {
    let mut rng = StdRng::seed_from_u64(7);
    let field = ParticleField::new(800.0, 600.0, &mut rng);
    assert_eq!(field.len(), 40);
    assert_eq!(particle_count(4000.0), 80);
    assert_eq!(particle_count(0.0), 0);
}

#[test]
fn particles_stay_on_screen_after_resize() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut field = ParticleField::new(1200.0, 800.0, &mut rng);
    for _ in 0..500 {
        field.step();
    }
    field.resize(300.0, 200.0);
    for _ in 0..200 {
        field.step();
    }
    for p in field.particles() {
        assert!((0.0..300.0).contains(&p.position.x), "x = {}", p.position.x);
        assert!((0.0..200.0).contains(&p.position.y), "y = {}", p.position.y);
    }
}

#[test]
fn slider_follows_hover_then_drag() {
    let mut s = SliderState::new();
    assert_eq!(s.on_pointer_move(300.0, 400.0), Some(75.0));
    assert_eq!(s.on_pointer_move(-50.0, 400.0), Some(0.0));
    s.on_pointer_down(100.0, 400.0);
    assert_eq!(s.on_pointer_move(300.0, 400.0), None);
    assert_eq!(s.on_drag(300.0, 400.0), Some(75.0));
    s.on_pointer_up();
    assert_eq!(s.on_pointer_move(0.0, 0.0), Some(0.0));
}

#[test]
fn throttled_handlers_are_independent() {
    let clock = ManualClock::default();
    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut resize = {
        let hits = hits.clone();
        throttle(clock.clone(), 200.0, move |n: u32| hits.borrow_mut().push(("resize", n)))
    };
    let mut hover = {
        let hits = hits.clone();
        throttle(clock.clone(), 20.0, move |n: u32| hits.borrow_mut().push(("hover", n)))
    };

    resize(1);
    hover(1);
    clock.advance(10.0);
    resize(2);
    hover(2);
    clock.advance(15.0);
    resize(3);
    hover(3);
    clock.advance(200.0);
    resize(4);

    assert_eq!(
        *hits.borrow(),
        vec![("resize", 1), ("hover", 1), ("hover", 3), ("resize", 4)]
    );
}

#[test]
fn one_shot_reveal_never_fires_twice() {
    let mut t = RevealTrigger::new(RevealParams {
        once: true,
        ..RevealParams::default()
    });
    let vh = 1000.0;
    assert_eq!(t.update(900.0, vh), None);
    assert_eq!(t.update(700.0, vh), Some(ToggleAction::Play));
    assert!(t.is_spent());
    assert_eq!(t.update(900.0, vh), None);
    assert_eq!(t.update(700.0, vh), None);
}

#[test]
fn reversible_reveal_reverses_only_on_leave_back() {
    let mut t = RevealTrigger::new(RevealParams::default());
    let vh = 1000.0;
    assert_eq!(t.update(700.0, vh), Some(ToggleAction::Play));
    // scrolled past the end line, then back into range
    assert_eq!(t.update(100.0, vh), None);
    assert_eq!(t.update(500.0, vh), None);
    assert_eq!(t.update(950.0, vh), Some(ToggleAction::Reverse));
    assert_eq!(t.update(600.0, vh), Some(ToggleAction::Play));
}

#[test]
fn magnetic_button_springs_back_to_rest() {
    let mut b = MagneticButton::new();
    let rect = Rect::new(0.0, 0.0, 200.0, 60.0);
    let o = b.on_move(150.0, 40.0, rect).unwrap();
    assert_eq!((o.dx, o.dy), (5.0, 1.0));

    let mut engine = TweenEngine::new();
    let target = TargetId(1);
    engine.set(target, Property::X, o.dx);
    b.on_leave();
    assert_eq!((b.offset().dx, b.offset().dy), (0.0, 0.0));
    engine.to(target, Property::X, TweenSpec::to(0.0, 0.6).ease(Ease::ELASTIC));
    for _ in 0..60 {
        engine.tick(1.0 / 60.0);
    }
    assert!(engine.value(target, Property::X).abs() < 1e-9);
}

/// Card transition as the material switcher runs it: dim tween completes,
/// the filter swaps, the restore tween completes.
#[test]
fn card_swap_driven_by_tween_events() {
    let card = TargetId(3);
    let mut engine = TweenEngine::new();
    let mut swap = CardSwap::new();
    let mut filter = "none";

    swap.select("oak");
    engine.to(card, Property::Y, TweenSpec::to(-10.0, 0.3).tag(1));
    engine.to(card, Property::Opacity, TweenSpec::to(0.8, 0.3));

    let mut restored = false;
    for _ in 0..120 {
        for ev in engine.tick(1.0 / 60.0) {
            let TweenEvent::Completed { tag, .. } = ev;
            match tag {
                Some(1) => {
                    if let Some(m) = swap.on_dim_complete() {
                        filter = m.css_filter();
                    }
                    engine.to(
                        card,
                        Property::Y,
                        TweenSpec::to(0.0, 0.5).ease(Ease::Power2Out).tag(2),
                    );
                    engine.to(card, Property::Opacity, TweenSpec::to(1.0, 0.5));
                }
                Some(2) => {
                    swap.on_restore_complete();
                    restored = true;
                }
                _ => {}
            }
        }
    }
    assert!(restored);
    assert_eq!(swap.phase(), SwapPhase::Idle);
    assert_eq!(filter, "brightness(1.1) saturate(0.9)");
    assert_eq!(engine.value(card, Property::Y), 0.0);
    assert_eq!(engine.value(card, Property::Opacity), 1.0);
}

#[test]
fn unknown_swatch_keeps_the_current_filter() {
    let mut swap = CardSwap::new();
    let mut filter = Material::Walnut.css_filter();
    swap.select("rosewood");
    if let Some(m) = swap.on_dim_complete() {
        filter = m.css_filter();
    }
    assert_eq!(filter, "brightness(0.95) saturate(1.1)");
    swap.on_restore_complete();
    assert_eq!(swap.phase(), SwapPhase::Idle);
}
