//! Platform-independent logic behind the showcase page effects.
//!
//! Nothing in here touches the DOM or the GPU. The web front-end wires these
//! types to real elements and a WebGPU renderer; tests drive them with fake
//! clocks, schedulers and graphics backends.

pub mod constants;
pub mod easing;
pub mod error;
pub mod host;
pub mod magnetic;
pub mod material;
pub mod particles;
pub mod scroll;
pub mod slider;
pub mod style;
pub mod throttle;
pub mod tween;
pub mod viewer;

pub use easing::Ease;
pub use error::{MagneticError, ViewerError};
pub use host::{Clock, FrameHandle, FrameScheduler, Rect};
pub use throttle::{throttle, Throttle};
pub use tween::{Property, TargetId, TweenEngine, TweenEvent, TweenSpec};
