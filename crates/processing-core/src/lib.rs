//! Cursor Flow Processing Core
//!
//! Pure computation behind the editor preview and export:
//! - **Layout:** container sizing per aspect policy and contain-fit of content
//! - **Spring:** exact damped harmonic oscillator stepping
//! - **Camera:** the three-axis virtual camera that follows zoom events
//! - **Camera preview:** headless fixed-rate sampling of camera transforms
//! - **Cursor smoothing:** bidirectional EMA over captured pointer paths
//!
//! No I/O and no platform dependencies. All inputs are data; all outputs
//! are data.

pub mod camera;
pub mod camera_preview;
pub mod cursor_smooth;
pub mod layout;
pub mod spring;

pub use camera::{compute_zoom_target, CameraSimulator, CameraTransform};
pub use camera_preview::{simulate_camera_motion, CameraMotionFrame};
pub use cursor_smooth::CursorSmoother;
pub use layout::{compute_container_size, compute_fitted_size, FittedSize, LayoutParams};
pub use spring::SpringState;
