//! Page-level constants: selectors, class names and timings shared by the
//! gradient and reveal layers.

// ============================================
// Gradient containers
// ============================================

/// Elements that each host one animated gradient.
pub const GRADIENT_CONTAINER_SELECTOR: &str = ".gradient-container";

/// Start-time offset between consecutive containers, in milliseconds.
pub const CONTAINER_STAGGER_MS: f64 = 1000.0;

/// Wall-clock milliseconds to shader seconds.
pub const MS_TO_SECONDS: f64 = 0.001;

/// Speed multiplier is drawn from `speed * [SPEED_JITTER_MIN, SPEED_JITTER_MIN + SPEED_JITTER_SPAN)`.
pub const SPEED_JITTER_MIN: f64 = 0.8;
pub const SPEED_JITTER_SPAN: f64 = 0.4;

/// Upper bound (exclusive) of the time offset baked into each fragment shader.
pub const BAKED_TIME_OFFSET_MAX: f64 = 10.0;

/// Largest accepted iteration count for the per-pixel loop. Well inside the
/// GLSL `int` range, and low enough that the CPU fallback stays interactive.
pub const MAX_COMPLEXITY: u32 = 256;

/// Container height is clamped to this before the aspect-ratio division.
pub const MIN_SURFACE_EXTENT: f32 = 1.0;

/// Canvas2D fallback renders at `1 / FALLBACK_DOWNSCALE` of the container size.
pub const FALLBACK_DOWNSCALE: u32 = 4;

// ============================================
// Reveal effects
// ============================================

/// Fraction of an element that must be visible before it reveals.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Per-position stagger for reveal transitions, in milliseconds.
pub const REVEAL_STEP_MS: i32 = 100;

pub const REVEAL_ROOT_MARGIN: &str = "0px";

pub const TIMELINE_ITEM_SELECTOR: &str = ".timeline-item";
pub const SECTION_SELECTOR: &str = ".first-container, .contact-container, .education-container, .timeline-container, .skills-container, .form-container";
pub const REVEAL_ITEM_SELECTOR: &str = ".reveal-item";
/// Cards tagged as reveal items when the controller installs.
pub const REVEAL_ITEM_SOURCES: &str = ".contact-card, .education-card";
pub const SKILL_ITEM_SELECTOR: &str = ".skills-item";

pub const VISIBLE_CLASS: &str = "visible";
pub const SECTION_VISIBLE_CLASS: &str = "section-visible";
pub const REVEAL_ITEM_CLASS: &str = "reveal-item";
pub const ITEM_VISIBLE_CLASS: &str = "item-visible";
pub const SKILL_VISIBLE_CLASS: &str = "skill-visible";

// ============================================
// Pointer light and form affordances
// ============================================

pub const CARD_SELECTOR: &str = ".timeline-content";
pub const LIGHT_EFFECT_SELECTOR: &str = ".light-effect";
pub const LIGHT_X_PROPERTY: &str = "--x";
pub const LIGHT_Y_PROPERTY: &str = "--y";

pub const FORM_FIELD_SELECTOR: &str = ".form-group input, .form-group textarea";
pub const FOCUSED_CLASS: &str = "focused";
pub const CONTACT_FORM_SELECTOR: &str = ".contact-form";
pub const SUBMIT_BUTTON_SELECTOR: &str = ".submit-btn";
pub const SENDING_CLASS: &str = "sending";
pub const SENDING_LABEL: &str = "Sending...";

// ============================================
// Dev server
// ============================================

/// Environment variable overriding the dev server port.
pub const PORT_ENV: &str = "GRADIENT_PORT";
pub const DEFAULT_PORT: u16 = 8000;
