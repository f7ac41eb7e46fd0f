//! Cursor Flow Editor Runtime
//!
//! Glues the timeline store and camera simulator into an interactive
//! editor:
//! - **Interaction:** pointer-driven drag/resize/scrub state machine
//! - **Playback:** frame-clock driven playhead with an end-of-timeline signal
//! - **Engine:** per-frame update of playback, active zoom, and camera
//! - **Suggest:** async seam for zoom suggestion providers
//!
//! Nothing here touches a windowing system; hosts feed pointer events and
//! frame timestamps in.

pub mod engine;
pub mod interaction;
pub mod playback;
pub mod suggest;

pub use engine::{EditorEngine, FrameUpdate};
pub use interaction::{
    DragMode, DragState, DragTarget, InteractionContext, InteractionOutcome, ItemDrag, NoCapture,
    PointerCapture, PointerEvent, PointerTarget, TimelineInteraction,
};
pub use playback::{PlaybackDriver, PlaybackStatus, SharedPlayback};
pub use suggest::{apply_suggestions, request_suggestions, SuggestionRequest, ZoomSuggester};
