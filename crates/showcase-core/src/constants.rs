use std::f32::consts::FRAC_PI_4;

// Shared tuning constants for every effect on the page.

// Particle field
pub const PARTICLE_MAX: usize = 80;
pub const PARTICLE_SPACING_PX: f64 = 20.0; // one particle per this many px of viewport width
pub const PARTICLE_PALETTE: [&str; 3] = ["#9C7C5D", "#D4C8B8", "#F5F1ED"];
pub const PARTICLE_RADIUS_MIN: f64 = 1.0;
pub const PARTICLE_RADIUS_SPAN: f64 = 3.0;
pub const PARTICLE_SPEED_SPAN: f64 = 0.5; // velocity in [-span/2, span/2) px per frame
pub const PARTICLE_OPACITY_MIN: f64 = 0.1;
pub const PARTICLE_OPACITY_SPAN: f64 = 0.5;

// Throttle windows (milliseconds)
pub const RESIZE_THROTTLE_MS: f64 = 200.0;
pub const MAGNETIC_THROTTLE_MS: f64 = 20.0;

// Magnetic buttons
pub const MAGNETIC_DAMPING: f64 = 10.0;
pub const MAGNETIC_CONTENT_FACTOR: f64 = 0.5;
pub const MAGNETIC_RESET_SEC: f64 = 0.6;
pub const ELASTIC_AMPLITUDE: f64 = 1.0;
pub const ELASTIC_PERIOD: f64 = 0.3;

// Scroll reveal
pub const REVEAL_OFFSET_Y: f64 = 50.0;
pub const REVEAL_DURATION_SEC: f64 = 0.8;
pub const REVEAL_STAGGER_SEC: f64 = 0.1;
pub const REVEAL_START_RATIO: f64 = 0.8; // region top at 80% of viewport height
pub const REVEAL_END_RATIO: f64 = 0.3;
pub const PARALLAX_SHIFT_PX: f64 = -30.0;

// Header
pub const HEADER_HIDE_AFTER_PX: f64 = 150.0;
pub const HEADER_SCROLLED_AFTER_PX: f64 = 50.0;
pub const HEADER_HIDDEN_Y_PERCENT: f64 = -100.0;
pub const HEADER_TWEEN_SEC: f64 = 0.3;

// Comparison slider
pub const SLIDER_INTRO_PERCENT: f64 = 50.0;
pub const SLIDER_INTRO_DELAY_MS: i32 = 500;
pub const SLIDER_INTRO_SEC: f64 = 0.8;
pub const SLIDER_FOLLOW_SEC: f64 = 0.3;
pub const SLIDER_HANDLE_SPIN_SEC: f64 = 8.0; // one full turn
pub const SLIDER_HANDLE_CENTER_X_PERCENT: f64 = -50.0;

// Material swap on product cards
pub const MATERIAL_DIM_Y: f64 = -10.0;
pub const MATERIAL_DIM_OPACITY: f64 = 0.8;
pub const MATERIAL_DIM_SEC: f64 = 0.3;
pub const MATERIAL_RESTORE_SEC: f64 = 0.5;

// Product viewer
pub const VIEWER_ROTATE_STEP_RAD: f32 = FRAC_PI_4;
pub const VIEWER_ROTATE_SEC: f64 = 1.0;
pub const VIEWER_ZOOM_STEP: f32 = 0.5;
pub const VIEWER_ZOOM_SEC: f64 = 0.5;
pub const VIEWER_MAX_PIXEL_RATIO: f64 = 2.0;
pub const VIEWER_MAX_DRAW_ITEMS: usize = 16;
pub const SHADOW_MAP_SIZE: u32 = 1024;
