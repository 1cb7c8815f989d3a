//! Per-property tween engine.
//!
//! Tweens are keyed by `(TargetId, Property)`. Registering a tween on a key
//! that already has one replaces it, and the replacement starts from whatever
//! value the old one had reached, so overlapping animations are
//! last-registered-wins without visual jumps.
//!
//! The engine owns the current value of every property it has touched. Hosts
//! read values back after [`TweenEngine::tick`] and apply them to elements or
//! scene objects; the engine itself never touches the DOM.

use crate::easing::Ease;
use fnv::{FnvHashMap, FnvHashSet};
use smallvec::SmallVec;

/// Identifies one animated object (a DOM element, a scene prop, the camera).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    /// Horizontal translation in % of the element's own width.
    XPercent,
    /// Vertical translation in % of the element's own height.
    YPercent,
    Opacity,
    /// Rotation in degrees (2D).
    Rotation,
    /// CSS width in %.
    WidthPercent,
    /// CSS left in %.
    LeftPercent,
    /// Rotation about the local Y axis in radians (3D).
    RotationY,
    /// Orbit distance from the camera target (3D).
    Distance,
}

impl Property {
    /// Value assumed for a property nobody has written yet.
    pub fn default_value(&self) -> f64 {
        match self {
            Property::Opacity => 1.0,
            _ => 0.0,
        }
    }
}

/// What a new tween should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub to: f64,
    pub duration_sec: f64,
    pub delay_sec: f64,
    pub ease: Ease,
    /// Loop forever from the start value, emitting no completion.
    pub repeat: bool,
    /// Reported back in [`TweenEvent::Completed`].
    pub tag: Option<u32>,
}

impl TweenSpec {
    pub fn to(value: f64, duration_sec: f64) -> Self {
        Self {
            to: value,
            duration_sec,
            delay_sec: 0.0,
            ease: Ease::default(),
            repeat: false,
            tag: None,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay_sec: f64) -> Self {
        self.delay_sec = delay_sec;
        self
    }

    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn tag(mut self, tag: u32) -> Self {
        self.tag = Some(tag);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEvent {
    Completed {
        target: TargetId,
        property: Property,
        tag: Option<u32>,
    },
}

#[derive(Clone, Debug)]
struct Tween {
    from: Option<f64>,
    spec: TweenSpec,
    elapsed: f64,
}

impl Tween {
    fn new(from: Option<f64>, spec: TweenSpec) -> Self {
        Self {
            from,
            spec,
            elapsed: 0.0,
        }
    }
}

/// Delays for a staggered batch: `0, step, 2*step, ...`.
pub fn stagger_delays(count: usize, step_sec: f64) -> impl Iterator<Item = f64> {
    (0..count).map(move |i| i as f64 * step_sec)
}

#[derive(Default)]
pub struct TweenEngine {
    tweens: FnvHashMap<(TargetId, Property), Tween>,
    values: FnvHashMap<(TargetId, Property), f64>,
    dirty: FnvHashSet<TargetId>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, or the property's default if it was never written.
    pub fn value(&self, target: TargetId, property: Property) -> f64 {
        self.try_value(target, property)
            .unwrap_or_else(|| property.default_value())
    }

    pub fn try_value(&self, target: TargetId, property: Property) -> Option<f64> {
        self.values.get(&(target, property)).copied()
    }

    /// Write a value immediately, cancelling any tween on the same key.
    pub fn set(&mut self, target: TargetId, property: Property, value: f64) {
        self.tweens.remove(&(target, property));
        self.write(target, property, value);
    }

    /// Tween from the value current when the tween starts (after its delay).
    pub fn to(&mut self, target: TargetId, property: Property, spec: TweenSpec) {
        self.tweens.insert((target, property), Tween::new(None, spec));
    }

    /// Tween from an explicit start value, which is applied right away so the
    /// element does not flash its final state during the delay.
    pub fn from_to(&mut self, target: TargetId, property: Property, from: f64, spec: TweenSpec) {
        self.write(target, property, from);
        self.tweens.insert((target, property), Tween::new(Some(from), spec));
    }

    pub fn is_active(&self, target: TargetId, property: Property) -> bool {
        self.tweens.contains_key(&(target, property))
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advance every tween by `dt_sec` and return completion events.
    pub fn tick(&mut self, dt_sec: f64) -> SmallVec<[TweenEvent; 8]> {
        let dt = dt_sec.max(0.0);
        let mut events = SmallVec::new();
        let mut finished: SmallVec<[(TargetId, Property); 8]> = SmallVec::new();
        let mut writes: SmallVec<[(TargetId, Property, f64); 16]> = SmallVec::new();

        for (&(target, property), tween) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            let local = tween.elapsed - tween.spec.delay_sec;
            if local < 0.0 {
                continue;
            }
            let from = *tween.from.get_or_insert_with(|| {
                self.values
                    .get(&(target, property))
                    .copied()
                    .unwrap_or_else(|| property.default_value())
            });
            let duration = tween.spec.duration_sec;
            let mut progress = if duration > 0.0 {
                local / duration
            } else {
                1.0
            };
            if tween.spec.repeat && duration > 0.0 {
                progress = progress.fract();
            } else if progress >= 1.0 {
                writes.push((target, property, tween.spec.to));
                finished.push((target, property));
                events.push(TweenEvent::Completed {
                    target,
                    property,
                    tag: tween.spec.tag,
                });
                continue;
            }
            let eased = tween.spec.ease.apply(progress);
            writes.push((target, property, from + (tween.spec.to - from) * eased));
        }

        for key in finished {
            self.tweens.remove(&key);
        }
        for (target, property, value) in writes {
            self.write(target, property, value);
        }
        events
    }

    /// Targets whose values changed since the last drain.
    pub fn drain_dirty(&mut self) -> Vec<TargetId> {
        let mut out: Vec<TargetId> = self.dirty.drain().collect();
        out.sort_unstable();
        out
    }

    fn write(&mut self, target: TargetId, property: Property, value: f64) {
        self.values.insert((target, property), value);
        self.dirty.insert(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: TargetId = TargetId(1);

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn to_runs_from_current_value() {
        let mut e = TweenEngine::new();
        e.set(T, Property::Y, 10.0);
        e.to(T, Property::Y, TweenSpec::to(20.0, 1.0).ease(Ease::Linear));
        e.tick(0.5);
        assert!(approx(e.value(T, Property::Y), 15.0));
        let done = e.tick(0.5);
        assert_eq!(e.value(T, Property::Y), 20.0);
        assert_eq!(done.len(), 1);
        assert!(!e.is_active(T, Property::Y));
    }

    #[test]
    fn newer_tween_replaces_older_from_its_current_value() {
        let mut e = TweenEngine::new();
        e.to(T, Property::X, TweenSpec::to(100.0, 1.0).ease(Ease::Linear));
        e.tick(0.25);
        assert!(approx(e.value(T, Property::X), 25.0));

        e.to(T, Property::X, TweenSpec::to(0.0, 1.0).ease(Ease::Linear));
        assert_eq!(e.active_count(), 1);
        e.tick(0.5);
        assert!(approx(e.value(T, Property::X), 12.5));
    }

    #[test]
    fn delay_holds_from_value() {
        let mut e = TweenEngine::new();
        e.from_to(
            T,
            Property::Opacity,
            0.0,
            TweenSpec::to(1.0, 1.0).delay(0.5).ease(Ease::Linear),
        );
        assert_eq!(e.value(T, Property::Opacity), 0.0);
        e.tick(0.4);
        assert_eq!(e.value(T, Property::Opacity), 0.0);
        e.tick(0.6);
        assert!(approx(e.value(T, Property::Opacity), 0.5));
    }

    #[test]
    fn completion_reports_tag_once() {
        let mut e = TweenEngine::new();
        e.to(T, Property::Y, TweenSpec::to(-10.0, 0.3).tag(7));
        let mut tags = Vec::new();
        for _ in 0..10 {
            for ev in e.tick(0.1) {
                let TweenEvent::Completed { tag, .. } = ev;
                tags.push(tag);
            }
        }
        assert_eq!(tags, vec![Some(7)]);
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let mut e = TweenEngine::new();
        e.to(T, Property::Y, TweenSpec::to(3.0, 0.0));
        let events = e.tick(0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(e.value(T, Property::Y), 3.0);
    }

    #[test]
    fn repeating_tween_wraps_and_never_completes() {
        let mut e = TweenEngine::new();
        e.from_to(
            T,
            Property::Rotation,
            0.0,
            TweenSpec::to(360.0, 8.0).ease(Ease::Linear).repeat(),
        );
        assert!(e.tick(10.0).is_empty());
        assert!(approx(e.value(T, Property::Rotation), 90.0));
        assert!(e.is_active(T, Property::Rotation));
    }

    #[test]
    fn set_cancels_running_tween() {
        let mut e = TweenEngine::new();
        e.to(T, Property::X, TweenSpec::to(50.0, 1.0));
        e.set(T, Property::X, 5.0);
        assert!(e.tick(2.0).is_empty());
        assert_eq!(e.value(T, Property::X), 5.0);
    }

    #[test]
    fn dirty_targets_drain_sorted_and_once() {
        let mut e = TweenEngine::new();
        e.set(TargetId(3), Property::X, 1.0);
        e.set(TargetId(1), Property::X, 1.0);
        e.set(TargetId(3), Property::Y, 1.0);
        assert_eq!(e.drain_dirty(), vec![TargetId(1), TargetId(3)]);
        assert!(e.drain_dirty().is_empty());
    }

    #[test]
    fn stagger_steps_evenly() {
        let d: Vec<f64> = stagger_delays(4, 0.1).collect();
        assert_eq!(d.len(), 4);
        assert!(approx(d[3], 0.3));
    }

    #[test]
    fn defaults_for_untouched_properties() {
        let e = TweenEngine::new();
        assert_eq!(e.value(T, Property::Opacity), 1.0);
        assert_eq!(e.value(T, Property::Y), 0.0);
        assert_eq!(e.try_value(T, Property::Y), None);
    }
}
