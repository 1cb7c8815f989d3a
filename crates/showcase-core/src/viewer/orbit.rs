//! Damped orbit camera around a fixed target.
//!
//! Input (pointer drags, wheel steps, auto-rotation) accumulates into
//! spherical deltas; each [`OrbitControls::update`] applies a fraction of the
//! pending delta and decays the rest, which gives the eased follow-through.

use glam::Vec3;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    /// Fraction of the pending delta applied per update.
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub auto_rotate: bool,
    /// Full turns per minute at 1.0, as in the usual orbit-controls idiom.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            damping: 0.08,
            rotate_speed: 0.5,
            zoom_speed: 0.5,
            auto_rotate: true,
            auto_rotate_speed: 0.75,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}

const PHI_EPS: f32 = 1e-4;

#[derive(Clone, Debug)]
pub struct OrbitControls {
    params: OrbitParams,
    target: Vec3,
    theta: f32,
    phi: f32,
    radius: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    drag_from: Option<(f32, f32)>,
    enabled: bool,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, params: OrbitParams) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(params.min_distance);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        Self {
            params,
            target,
            theta,
            phi,
            radius,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            drag_from: None,
            enabled: true,
        }
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Jump to a distance, bypassing damping (used by tweened zoom).
    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.radius = distance.clamp(self.params.min_distance, self.params.max_distance);
        }
    }

    /// Current eye position.
    pub fn position(&self) -> Vec3 {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        self.target + Vec3::new(sp * st, cp, sp * ct) * self.radius
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.enabled {
            self.drag_from = Some((x, y));
        }
    }

    /// Drag by screen pixels on a viewport `viewport_height` px tall.
    pub fn pointer_move(&mut self, x: f32, y: f32, viewport_height: f32) {
        let Some((px, py)) = self.drag_from else {
            return;
        };
        if viewport_height > 0.0 {
            let k = 2.0 * PI * self.params.rotate_speed / viewport_height;
            self.delta_theta -= (x - px) * k;
            self.delta_phi -= (y - py) * k;
        }
        self.drag_from = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Wheel step; negative `delta_y` (scroll up) moves closer.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.enabled || delta_y == 0.0 {
            return;
        }
        let step = 0.95_f32.powf(self.params.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Apply pending motion for a frame `dt_sec` long.
    pub fn update(&mut self, dt_sec: f32) {
        if !self.enabled {
            return;
        }
        if self.params.auto_rotate && self.drag_from.is_none() {
            self.delta_theta -= 2.0 * PI / 60.0 * self.params.auto_rotate_speed * dt_sec.max(0.0);
        }
        let d = self.params.damping.clamp(0.0, 1.0);
        self.theta += self.delta_theta * d;
        self.phi = (self.phi + self.delta_phi * d).clamp(PHI_EPS, PI - PHI_EPS);
        let scaled = self.radius * (1.0 + (self.scale - 1.0) * d);
        self.radius = scaled.clamp(self.params.min_distance, self.params.max_distance);

        self.delta_theta *= 1.0 - d;
        self.delta_phi *= 1.0 - d;
        self.scale = 1.0 + (self.scale - 1.0) * (1.0 - d);
    }

    /// Stop reacting to input. The host detaches its listeners alongside.
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.drag_from = None;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> OrbitParams {
        OrbitParams {
            auto_rotate: false,
            ..OrbitParams::default()
        }
    }

    #[test]
    fn round_trips_initial_eye() {
        let eye = Vec3::new(0.0, 1.0, 5.0);
        let c = OrbitControls::new(eye, Vec3::ZERO, still());
        assert!((c.position() - eye).length() < 1e-4);
        assert!((c.distance() - 26f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn auto_rotation_keeps_distance() {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::ZERO,
            OrbitParams::default(),
        );
        let start = c.position();
        for _ in 0..120 {
            c.update(1.0 / 60.0);
        }
        assert!((c.position().length() - start.length()).abs() < 1e-3);
        assert!((c.position() - start).length() > 1e-3);
    }

    #[test]
    fn drag_eases_out_over_frames() {
        let mut c = OrbitControls::new(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, still());
        c.pointer_down(100.0, 100.0);
        c.pointer_move(200.0, 100.0, 600.0);
        c.pointer_up();
        let p0 = c.position();
        c.update(0.016);
        let p1 = c.position();
        c.update(0.016);
        let p2 = c.position();
        let first = (p1 - p0).length();
        let second = (p2 - p1).length();
        assert!(first > 0.0);
        assert!(second < first);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut c = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, still());
        c.wheel(-100.0);
        for _ in 0..200 {
            c.update(0.016);
        }
        assert!(c.distance() < 5.0);
    }

    #[test]
    fn disposed_controls_ignore_input() {
        let mut c = OrbitControls::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            OrbitParams::default(),
        );
        c.dispose();
        let p = c.position();
        c.pointer_down(0.0, 0.0);
        c.pointer_move(300.0, 0.0, 600.0);
        c.wheel(-1.0);
        c.update(1.0);
        assert_eq!(c.position(), p);
        assert!(!c.is_enabled());
    }

    #[test]
    fn set_distance_clamps() {
        let mut c = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, still());
        c.set_distance(0.0);
        assert_eq!(c.distance(), 0.5);
        c.set_distance(f32::NAN);
        assert_eq!(c.distance(), 0.5);
    }
}
