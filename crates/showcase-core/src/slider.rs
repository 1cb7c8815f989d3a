//! Before/after comparison slider.

use crate::constants::SLIDER_INTRO_PERCENT;

/// Reveal percentage for a pointer `offset_x` px into a slider `width` px
/// wide, clamped to [0, 100]. A zero-width slider reveals nothing.
#[inline]
pub fn reveal_percent(offset_x: f64, width: f64) -> f64 {
    if !(width > 0.0) || offset_x.is_nan() {
        return 0.0;
    }
    (offset_x / width * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, Debug, Default)]
pub struct SliderState {
    percent: f64,
    active: bool,
}

impl SliderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Drag-locked: hover tracking is suspended while the pointer is held.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Hover tracking. `None` while drag-locked.
    pub fn on_pointer_move(&mut self, offset_x: f64, width: f64) -> Option<f64> {
        if self.active {
            return None;
        }
        self.percent = reveal_percent(offset_x, width);
        Some(self.percent)
    }

    pub fn on_pointer_down(&mut self, offset_x: f64, width: f64) -> f64 {
        self.active = true;
        self.percent = reveal_percent(offset_x, width);
        self.percent
    }

    /// Direct tracking while held. `None` when not dragging.
    pub fn on_drag(&mut self, offset_x: f64, width: f64) -> Option<f64> {
        if !self.active {
            return None;
        }
        self.percent = reveal_percent(offset_x, width);
        Some(self.percent)
    }

    pub fn on_pointer_up(&mut self) {
        self.active = false;
    }

    /// Initial reveal played once after load.
    pub fn intro(&mut self) -> f64 {
        self.percent = SLIDER_INTRO_PERCENT;
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(reveal_percent(300.0, 400.0), 75.0);
        assert_eq!(reveal_percent(-50.0, 400.0), 0.0);
        assert_eq!(reveal_percent(1000.0, 400.0), 100.0);
        assert_eq!(reveal_percent(f64::INFINITY, 400.0), 100.0);
        assert_eq!(reveal_percent(f64::NEG_INFINITY, 400.0), 0.0);
        assert_eq!(reveal_percent(10.0, 0.0), 0.0);
        assert_eq!(reveal_percent(f64::NAN, 400.0), 0.0);
    }

    #[test]
    fn hover_is_ignored_while_dragging() {
        let mut s = SliderState::new();
        assert_eq!(s.on_pointer_move(100.0, 400.0), Some(25.0));
        assert_eq!(s.on_pointer_down(200.0, 400.0), 50.0);
        assert_eq!(s.on_pointer_move(400.0, 400.0), None);
        assert_eq!(s.on_drag(360.0, 400.0), Some(90.0));
        s.on_pointer_up();
        assert_eq!(s.on_drag(0.0, 400.0), None);
        assert_eq!(s.percent(), 90.0);
    }

    #[test]
    fn intro_lands_in_the_middle() {
        let mut s = SliderState::new();
        assert_eq!(s.intro(), 50.0);
    }
}
