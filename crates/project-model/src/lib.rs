//! Cursor Flow Project Model
//!
//! Defines the core data contracts for Cursor Flow projects:
//! - **Zoom events:** timed camera instructions in percentage space
//! - **Clips:** video and title segments on the single clip track
//! - **Physics:** spring parameters and the named preset table
//! - **Timeline:** the store that owns clips and zooms and resolves the
//!   active item at a playback time
//! - **Project:** the persisted editor snapshot
//!
//! Zoom focus points are percentages `[0, 100]` of the frame; pointer samples
//! are normalized to `[0.0, 1.0]` of the capture surface.

pub mod clip;
pub mod geometry;
pub mod physics;
pub mod pointer;
pub mod project;
pub mod timeline;
pub mod zoom;

pub use clip::*;
pub use geometry::*;
pub use physics::*;
pub use pointer::*;
pub use project::*;
pub use timeline::*;
pub use zoom::*;
