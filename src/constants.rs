//! DOM anchors the effects look for.
//!
//! Every effect locates its elements through these ids, selectors and class
//! names; a missing anchor disables that effect and nothing else.

// Particle background
pub const PARTICLES_CANVAS_ID: &str = "particles-canvas";

// Scroll reveal
pub const SCROLL_SECTION_SELECTOR: &str = "[data-scroll-section]";
pub const REVEAL_TARGET_SELECTOR: &str =
    ".product-card, .about-title, .about-text, .section-title, .section-subtitle";
pub const PARALLAX_IMAGE_SELECTOR: &str = "img:not(.hero-video)";
pub const HEADER_SELECTOR: &str = ".header";
pub const HEADER_SCROLLED_CLASS: &str = "scrolled";

// Magnetic buttons
pub const MAGNETIC_BUTTON_SELECTOR: &str = ".magnetic-btn";
pub const MAGNETIC_CONTENT_SELECTOR: &str = ".btn-content";
pub const MAGNETIC_TX_VAR: &str = "--tx";
pub const MAGNETIC_TY_VAR: &str = "--ty";

// Product viewer
pub const VIEWER_CONTAINER_ID: &str = "3d-viewer";
pub const VIEWER_FALLBACK_ID: &str = "3d-viewer-fallback";
pub const VIEWER_CONTROL_SELECTOR: &str = ".control-btn";
pub const VIEWER_CANVAS_CLASS: &str = "viewer-canvas";

// Comparison slider
pub const SLIDER_SELECTOR: &str = ".comparison-slider";
pub const SLIDER_AFTER_SELECTOR: &str = ".comparison-after";
pub const SLIDER_HANDLE_SELECTOR: &str = ".comparison-handle";

// Material switcher
pub const MATERIAL_OPTION_SELECTOR: &str = ".material-option";
pub const MATERIAL_ATTR: &str = "data-material";
pub const ACTIVE_CLASS: &str = "active";
pub const PRODUCT_CARD_SELECTOR: &str = ".product-card";
pub const PRODUCT_IMAGE_SELECTOR: &str = ".product-img";

// Animator bookkeeping
pub const ANIM_ID_ATTR: &str = "data-anim-id";

// Frame delta clamp (seconds); a backgrounded tab resumes without a jump
pub const MAX_FRAME_DT_SEC: f64 = 0.1;
