//! Output frame layout.
//!
//! Two pure computations: the size of the output container for an aspect
//! policy, and the contain-fit of the captured content (plus an optional
//! window-frame header) inside that container.

use cursorflow_project_model::{AspectRatio, Size};

/// Default container width used by the `Auto` policy.
pub const DEFAULT_BASE_WIDTH: f64 = 1280.0;

/// Default window-frame header height.
pub const DEFAULT_HEADER_HEIGHT: f64 = 40.0;

/// Inputs shared by the container computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Container width for the `Auto` policy.
    pub base_width: f64,
    /// Header height; zero when no window frame is shown.
    pub header_height: f64,
    /// Content magnification inside the frame.
    pub content_scale: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            base_width: DEFAULT_BASE_WIDTH,
            header_height: 0.0,
            content_scale: 1.0,
        }
    }
}

impl LayoutParams {
    /// Params with the header present only when the window frame is shown.
    pub fn new(base_width: f64, header_height: f64, show_window_frame: bool, content_scale: f64) -> Self {
        Self {
            base_width,
            header_height: if show_window_frame { header_height } else { 0.0 },
            content_scale,
        }
    }
}

/// Result of a contain-fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedSize {
    /// Width of the fitted content (and header).
    pub width: f64,
    /// Total height including the header.
    pub height: f64,
    /// Height of the content alone.
    pub content_height: f64,
}

/// Table size for a fixed aspect policy. `Auto` has no fixed size.
pub fn fixed_container_size(policy: AspectRatio) -> Option<Size> {
    match policy {
        AspectRatio::Auto => None,
        AspectRatio::Landscape16x9 => Some(Size::new(1280.0, 720.0)),
        AspectRatio::Portrait9x16 => Some(Size::new(720.0, 1280.0)),
        AspectRatio::Square => Some(Size::new(1080.0, 1080.0)),
        AspectRatio::Classic4x3 => Some(Size::new(1200.0, 900.0)),
        AspectRatio::Ultrawide21x9 => Some(Size::new(1680.0, 720.0)),
    }
}

/// Size of the output container.
///
/// Fixed policies return their table size. `Auto` keeps `base_width` and
/// derives the height from the content aspect `R` and effective scale
/// `s = min(content_scale, 1)`:
///
/// `height = W * (s * (R + H / content_width) + (1 - s))`
///
/// so margins around the content stay equal as the content shrinks, and the
/// frame never grows once the content is magnified past 1. Unknown content
/// falls back to a 16:9 frame of the base width.
pub fn compute_container_size(
    policy: AspectRatio,
    content: Option<Size>,
    params: &LayoutParams,
) -> Size {
    if let Some(size) = fixed_container_size(policy) {
        return size;
    }

    let width = params.base_width;
    let content = match content.filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => return Size::new(width, width * 9.0 / 16.0),
    };

    let ratio = content.height / content.width;
    let s = params.content_scale.clamp(0.0, 1.0);
    let header_share = params.header_height.max(0.0) / content.width;
    let height = width * (s * (ratio + header_share) + (1.0 - s));
    Size::new(width, height)
}

/// Contain-fit `native` content plus a header of `header_height` inside
/// `container`.
///
/// Fits by width first; if content plus header would overflow the container
/// height, refits by height. The content keeps its native aspect exactly.
pub fn compute_fitted_size(container: Size, native: Size, header_height: f64) -> FittedSize {
    let header = header_height.max(0.0);
    if native.is_empty() || container.is_empty() {
        return FittedSize {
            width: container.width.max(0.0),
            height: container.height.max(0.0),
            content_height: (container.height - header).max(0.0),
        };
    }

    let aspect = native.height / native.width;
    let mut width = container.width;
    let mut content_height = width * aspect;

    if content_height + header > container.height {
        content_height = (container.height - header).max(0.0);
        width = content_height / aspect;
    }

    FittedSize {
        width,
        height: content_height + header,
        content_height,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn params(content_scale: f64, header: f64) -> LayoutParams {
        LayoutParams {
            base_width: 1280.0,
            header_height: header,
            content_scale,
        }
    }

    #[test]
    fn test_fixed_policies_use_table() {
        let p = params(1.0, 40.0);
        let content = Some(Size::new(1920.0, 1200.0));
        assert_eq!(
            compute_container_size(AspectRatio::Landscape16x9, content, &p),
            Size::new(1280.0, 720.0)
        );
        assert_eq!(
            compute_container_size(AspectRatio::Portrait9x16, content, &p),
            Size::new(720.0, 1280.0)
        );
        assert_eq!(
            compute_container_size(AspectRatio::Square, None, &p),
            Size::new(1080.0, 1080.0)
        );
    }

    #[test]
    fn test_auto_full_scale_matches_content_aspect() {
        let size = compute_container_size(
            AspectRatio::Auto,
            Some(Size::new(1920.0, 1080.0)),
            &params(1.0, 0.0),
        );
        assert_eq!(size.width, 1280.0);
        assert_eq!(size.height, 1280.0 * (1080.0 / 1920.0));
    }

    #[test]
    fn test_auto_zero_scale_is_square() {
        let size = compute_container_size(
            AspectRatio::Auto,
            Some(Size::new(1920.0, 1080.0)),
            &params(0.0, 40.0),
        );
        assert_eq!(size.height, 1280.0);
    }

    #[test]
    fn test_auto_magnified_content_does_not_grow_frame() {
        let content = Some(Size::new(1600.0, 1000.0));
        let at_one = compute_container_size(AspectRatio::Auto, content, &params(1.0, 40.0));
        let at_two = compute_container_size(AspectRatio::Auto, content, &params(2.0, 40.0));
        assert_eq!(at_one, at_two);
        assert!((at_one.height - 1280.0 * (1000.0 / 1600.0 + 40.0 / 1600.0)).abs() < 1e-9);
    }

    #[test]
    fn test_auto_unknown_content_falls_back_to_16_9() {
        let size = compute_container_size(AspectRatio::Auto, None, &params(1.0, 0.0));
        assert_eq!(size, Size::new(1280.0, 720.0));
    }

    #[test]
    fn test_header_is_dropped_without_window_frame() {
        assert_eq!(LayoutParams::new(1280.0, 40.0, false, 1.0).header_height, 0.0);
        assert_eq!(LayoutParams::new(1280.0, 40.0, true, 1.0).header_height, 40.0);
    }

    #[test]
    fn test_fit_by_width() {
        let fitted = compute_fitted_size(Size::new(1280.0, 1280.0), Size::new(1920.0, 1080.0), 40.0);
        assert_eq!(fitted.width, 1280.0);
        assert_eq!(fitted.content_height, 720.0);
        assert_eq!(fitted.height, 760.0);
    }

    #[test]
    fn test_refit_by_height_on_overflow() {
        let fitted = compute_fitted_size(Size::new(1280.0, 720.0), Size::new(1920.0, 1080.0), 40.0);
        assert_eq!(fitted.height, 720.0);
        assert_eq!(fitted.content_height, 680.0);
        assert!((fitted.width - 680.0 * 1920.0 / 1080.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn test_fitted_content_stays_inside_and_keeps_aspect(
            cw in 100.0..4000.0f64,
            ch in 100.0..4000.0f64,
            nw in 100.0..4000.0f64,
            nh in 100.0..4000.0f64,
            header in 0.0..80.0f64,
        ) {
            let fitted = compute_fitted_size(Size::new(cw, ch), Size::new(nw, nh), header);
            prop_assert!(fitted.width <= cw + 1e-6);
            prop_assert!(fitted.height <= ch + 1e-6);
            prop_assert!((fitted.height - fitted.content_height - header).abs() < 1e-6);
            if fitted.width > 0.0 {
                let ratio = fitted.content_height / fitted.width;
                prop_assert!((ratio - nh / nw).abs() < 1e-9 * (1.0 + nh / nw));
            }
        }
    }
}
