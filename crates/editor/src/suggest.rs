//! Zoom suggestions from an external provider.
//!
//! A provider looks at a recording and proposes zoom events. The editor
//! treats the result as untrusted input: every suggestion is clamped into
//! the zoom invariants and given a fresh id before it joins the timeline.

use cursorflow_common::FlowResult;
use cursorflow_project_model::{MediaSource, PointerSample, TimelineStore, ZoomEvent, ZoomId};

/// What a provider gets to look at.
#[derive(Debug, Clone, Default)]
pub struct SuggestionRequest {
    pub source: Option<MediaSource>,
    /// Timeline length in seconds.
    pub duration: f64,
    pub pointer_samples: Vec<PointerSample>,
}

/// Source of candidate zoom events.
#[async_trait::async_trait]
pub trait ZoomSuggester: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> FlowResult<Vec<ZoomEvent>>;
}

/// Append sanitized copies of `suggestions` to the timeline.
///
/// Returns the ids given to the new zooms. An empty list changes nothing.
pub fn apply_suggestions(
    timeline: &mut TimelineStore,
    suggestions: Vec<ZoomEvent>,
) -> Vec<ZoomId> {
    suggestions
        .into_iter()
        .map(|mut zoom| {
            zoom.id = ZoomId::new();
            timeline.insert_zoom(zoom)
        })
        .collect()
}

/// Ask `suggester` for zooms and append them.
pub async fn request_suggestions(
    suggester: &dyn ZoomSuggester,
    timeline: &mut TimelineStore,
    request: &SuggestionRequest,
) -> FlowResult<Vec<ZoomId>> {
    let suggestions = suggester.suggest(request).await.map_err(|e| {
        tracing::warn!(error = %e, "Zoom suggestion request failed");
        e
    })?;
    let added = apply_suggestions(timeline, suggestions);
    tracing::info!(count = added.len(), "Applied zoom suggestions");
    Ok(added)
}
