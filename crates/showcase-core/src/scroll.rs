//! Scroll-driven triggers: section reveals, image parallax and the header.

use crate::constants::*;
use crate::easing::Ease;

/// What a trigger does when its region crosses a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Reverse,
    None,
}

/// Actions for the four crossings, in the order
/// enter, leave, enter-back, leave-back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// "play none none reverse"
    pub const PLAY_THEN_REVERSE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::Reverse,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealParams {
    /// Region top crossing `start_ratio * viewport_height` enters the trigger.
    pub start_ratio: f64,
    /// Region top crossing `end_ratio * viewport_height` leaves it.
    pub end_ratio: f64,
    pub actions: ToggleActions,
    /// Fire the first `Play` and then never again.
    pub once: bool,
}

impl Default for RevealParams {
    fn default() -> Self {
        Self {
            start_ratio: REVEAL_START_RATIO,
            end_ratio: REVEAL_END_RATIO,
            actions: ToggleActions::PLAY_THEN_REVERSE,
            once: false,
        }
    }
}

/// Where the region sits relative to the trigger's active range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerZone {
    /// Region top is still below the start line.
    Before,
    Active,
    /// Region top has passed above the end line.
    After,
}

#[derive(Clone, Debug)]
pub struct RevealTrigger {
    params: RevealParams,
    zone: TriggerZone,
    spent: bool,
}

impl RevealTrigger {
    pub fn new(params: RevealParams) -> Self {
        Self {
            params,
            zone: TriggerZone::Before,
            spent: false,
        }
    }

    pub fn params(&self) -> &RevealParams {
        &self.params
    }

    pub fn zone(&self) -> TriggerZone {
        self.zone
    }

    /// One-shot triggers are spent after their first play.
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn zone_for(&self, region_top: f64, viewport_height: f64) -> TriggerZone {
        let start_line = viewport_height * self.params.start_ratio;
        let end_line = viewport_height * self.params.end_ratio;
        if region_top > start_line {
            TriggerZone::Before
        } else if region_top > end_line {
            TriggerZone::Active
        } else {
            TriggerZone::After
        }
    }

    /// Feed the region's current viewport-relative top. Returns the action to
    /// run when a threshold was crossed since the previous update.
    pub fn update(&mut self, region_top: f64, viewport_height: f64) -> Option<ToggleAction> {
        if self.spent {
            return None;
        }
        let next = self.zone_for(region_top, viewport_height);
        if next == self.zone {
            return None;
        }
        let actions = self.params.actions;
        let action = match (self.zone, next) {
            (TriggerZone::Before, _) => actions.on_enter,
            (TriggerZone::Active, TriggerZone::After) => actions.on_leave,
            (TriggerZone::After, TriggerZone::Active) => actions.on_enter_back,
            (_, TriggerZone::Before) => actions.on_leave_back,
            _ => ToggleAction::None,
        };
        self.zone = next;
        if self.params.once && action == ToggleAction::Play {
            self.spent = true;
        }
        (action != ToggleAction::None).then_some(action)
    }
}

/// Scrubbed progress of an element through the viewport: 0 when its top
/// touches the viewport bottom, 1 when its bottom touches the viewport top.
#[inline]
pub fn scrub_progress(element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
    let travel = viewport_height + element_height;
    if !(travel > 0.0) {
        return 0.0;
    }
    ((viewport_height - element_top) / travel).clamp(0.0, 1.0)
}

/// Parallax translateY for a scrub progress, in `[PARALLAX_SHIFT_PX, 0]`.
#[inline]
pub fn parallax_offset(progress: f64) -> f64 {
    PARALLAX_SHIFT_PX * progress.clamp(0.0, 1.0)
}

/// Curve for a reveal leg. A reverse retraces the play curve backwards, so
/// it eases in where the play eased out.
pub fn reveal_ease(action: ToggleAction) -> Ease {
    match action {
        ToggleAction::Reverse => Ease::Power3In,
        _ => Ease::Power3Out,
    }
}

/// Changes the header needs after a scroll event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderUpdate {
    /// `Some` when the hidden state flipped.
    pub hidden: Option<bool>,
    /// `Some` when the "scrolled" class should flip.
    pub scrolled: Option<bool>,
}

/// Hide-on-scroll-down header. Owns the last scroll position.
#[derive(Clone, Debug, Default)]
pub struct HeaderState {
    last_scroll_top: f64,
    hidden: bool,
    scrolled: bool,
}

impl HeaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn update(&mut self, scroll_top: f64) -> HeaderUpdate {
        let mut out = HeaderUpdate::default();
        let going_down = scroll_top > self.last_scroll_top;
        if going_down && scroll_top > HEADER_HIDE_AFTER_PX {
            if !self.hidden {
                self.hidden = true;
                out.hidden = Some(true);
            }
        } else {
            if self.hidden {
                self.hidden = false;
                out.hidden = Some(false);
            }
            let scrolled = scroll_top > HEADER_SCROLLED_AFTER_PX;
            if scrolled != self.scrolled {
                self.scrolled = scrolled;
                out.scrolled = Some(scrolled);
            }
        }
        self.last_scroll_top = scroll_top;
        out
    }
}
