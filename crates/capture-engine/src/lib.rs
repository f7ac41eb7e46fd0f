//! Cursor Flow Capture Engine
//!
//! Runs a recording session against a capture host: arm a source, start
//! media capture, play the timeline from zero, and stop on the timeline's
//! end or an external stop. Pointer samples are collected alongside and
//! returned with the captured media.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │              CaptureOrchestrator               │
//! │  ┌──────────────┐ ┌───────────┐ ┌────────────┐ │
//! │  │ CaptureHost  │ │ Pointer   │ │ Playback   │ │
//! │  │ MediaStream  │ │ Collector │ │ Control    │ │
//! │  └──────┬───────┘ └─────┬─────┘ └─────┬──────┘ │
//! │         │               │             │        │
//! │         ▼               ▼             ▼        │
//! │  ┌──────────────────────────────────────────┐  │
//! │  │   CaptureArtifact (media + samples)      │  │
//! │  └──────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────┘
//! ```

pub mod collector;
pub mod host;
pub mod orchestrator;

pub use collector::*;
pub use host::*;
pub use orchestrator::*;
