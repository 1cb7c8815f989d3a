//! Ambient particle field drawn behind the hero section.

use crate::constants::*;
use glam::DVec2;
use rand::prelude::*;

/// Number of particles for a viewport `width` px wide.
#[inline]
pub fn particle_count(viewport_width: f64) -> usize {
    if !(viewport_width > 0.0) {
        return 0;
    }
    ((viewport_width / PARTICLE_SPACING_PX).floor() as usize).min(PARTICLE_MAX)
}

/// Wrap `v` into `[0, dim)`; anything that leaves one edge re-enters at the
/// opposite one. A non-positive `dim` collapses to 0.
#[inline]
pub fn wrap_coord(v: f64, dim: f64) -> f64 {
    if !(dim > 0.0) || !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(dim);
    // rem_euclid can round up to `dim` for tiny negative inputs
    if r >= dim {
        0.0
    } else {
        r
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub color: &'static str,
    pub opacity: f64,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        let half_span = PARTICLE_SPEED_SPAN / 2.0;
        Self {
            position: DVec2::new(
                rng.gen::<f64>() * width.max(0.0),
                rng.gen::<f64>() * height.max(0.0),
            ),
            velocity: DVec2::new(
                rng.gen::<f64>() * PARTICLE_SPEED_SPAN - half_span,
                rng.gen::<f64>() * PARTICLE_SPEED_SPAN - half_span,
            ),
            radius: rng.gen::<f64>() * PARTICLE_RADIUS_SPAN + PARTICLE_RADIUS_MIN,
            color: PARTICLE_PALETTE[rng.gen_range(0..PARTICLE_PALETTE.len())],
            opacity: rng.gen::<f64>() * PARTICLE_OPACITY_SPAN + PARTICLE_OPACITY_MIN,
        }
    }

    /// Canvas fill style: palette colour plus a two-digit hex alpha.
    pub fn fill_style(&self) -> String {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).floor() as u8;
        format!("{}{:02x}", self.color, alpha)
    }
}

/// Fixed-size particle set bound to a canvas size.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    /// Populate `particle_count(width)` particles spread over the canvas.
    pub fn new<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        let n = particle_count(width);
        let particles = (0..n)
            .map(|_| Particle::random(rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    pub fn from_particles(particles: Vec<Particle>, width: f64, height: f64) -> Self {
        Self {
            particles,
            width,
            height,
        }
    }

    /// Advance one frame: move every particle and wrap it at the edges.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.position.x = wrap_coord(p.position.x + p.velocity.x, self.width);
            p.position.y = wrap_coord(p.position.y + p.velocity.y, self.height);
        }
    }

    /// Adopt a new canvas size. Positions are left alone and settle back
    /// inside the bounds through wrap-around on the next step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            radius: 2.0,
            color: PARTICLE_PALETTE[0],
            opacity: 0.5,
        }
    }

    #[test]
    fn count_follows_width_and_caps_at_max() {
        assert_eq!(particle_count(800.0), 40);
        assert_eq!(particle_count(819.0), 40);
        assert_eq!(particle_count(1600.0), 80);
        assert_eq!(particle_count(4000.0), 80);
        assert_eq!(particle_count(19.0), 0);
        assert_eq!(particle_count(0.0), 0);
        assert_eq!(particle_count(-100.0), 0);
        assert_eq!(particle_count(f64::NAN), 0);
    }

    #[test]
    fn exits_reenter_at_opposite_edge() {
        let mut field = ParticleField::from_particles(
            vec![
                particle_at(99.9, 10.0, 0.2, 0.0),
                particle_at(0.1, 10.0, -0.2, 0.0),
                particle_at(10.0, 0.05, 0.0, -0.1),
            ],
            100.0,
            50.0,
        );
        field.step();
        let ps = field.particles();
        assert!(ps[0].position.x < 1.0);
        assert!(ps[1].position.x > 99.0);
        assert!(ps[2].position.y > 49.0);
    }

    #[test]
    fn resize_leaves_positions_then_wrap_corrects() {
        let mut field =
            ParticleField::from_particles(vec![particle_at(700.0, 300.0, 0.1, 0.1)], 800.0, 600.0);
        field.resize(400.0, 200.0);
        assert_eq!(field.particles()[0].position, DVec2::new(700.0, 300.0));
        field.step();
        let p = field.particles()[0].position;
        assert!(p.x >= 0.0 && p.x < 400.0);
        assert!(p.y >= 0.0 && p.y < 200.0);
    }

    #[test]
    fn fill_style_appends_hex_alpha() {
        let mut p = particle_at(0.0, 0.0, 0.0, 0.0);
        p.opacity = 0.5;
        assert_eq!(p.fill_style(), "#9C7C5D7f");
        p.opacity = 0.05;
        assert_eq!(p.fill_style(), "#9C7C5D0c");
    }

    #[test]
    fn random_particles_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::new(1200.0, 700.0, &mut rng);
        assert_eq!(field.len(), 60);
        for p in field.particles() {
            assert!(p.radius >= 1.0 && p.radius < 4.0);
            assert!(p.opacity >= 0.1 && p.opacity < 0.6);
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!(PARTICLE_PALETTE.contains(&p.color));
        }
    }
}
