//! Font descriptors and text measurement.
//!
//! Layout never inspects glyphs itself. It asks a [`TextMeasure`]
//! implementation how wide and how tall a label is for a given
//! [`FontDefinition`], which keeps sizing deterministic under test and lets
//! embedders plug in their own metrics.
//!
//! - [`CosmicTextMeasure`] shapes text with real fonts through cosmic-text.
//! - [`FnMeasure`] wraps two closures and is handy for tests and callers that
//!   already own a metrics source.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::{debug, info};
use serde::Deserialize;

/// Points to pixels at the standard 96 DPI.
const PT_TO_PX: f32 = 1.33;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Average glyph advance relative to the pixel size, used when shaping yields no runs.
const FALLBACK_ADVANCE_FACTOR: f32 = 0.55;

/// Font used for node labels.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Family | `"Arial"` |
/// | Size | `12` |
/// | Weight | `400` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontDefinition {
    family: String,
    size: f32,
    weight: u16,
}

impl FontDefinition {
    pub fn new(family: impl Into<String>, size: f32, weight: u16) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in points.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// CSS numeric weight, `400` is regular and `700` is bold.
    pub fn weight(&self) -> u16 {
        self.weight
    }
}

impl Default for FontDefinition {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 12.0,
            weight: 400,
        }
    }
}

/// Measures rendered text extents.
///
/// Implementations must be deterministic: measuring the same text with the
/// same font twice yields the same numbers.
pub trait TextMeasure {
    /// Width in pixels of `text` rendered with `font`.
    fn measure_width(&self, text: &str, font: &FontDefinition) -> f32;

    /// Height in pixels of `text` rendered with `font`.
    fn measure_height(&self, text: &str, font: &FontDefinition) -> f32;
}

/// A [`TextMeasure`] backed by a pair of closures.
///
/// # Examples
///
/// ```
/// # use ctxmap_core::text::{FnMeasure, FontDefinition, TextMeasure};
/// let measure = FnMeasure::new(|text: &str, _: &FontDefinition| text.len() as f32 * 7.0, |_: &str, font: &FontDefinition| font.size());
///
/// let font = FontDefinition::default();
/// assert_eq!(measure.measure_width("Orders", &font), 42.0);
/// assert_eq!(measure.measure_height("Orders", &font), 12.0);
/// ```
pub struct FnMeasure<W, H> {
    width: W,
    height: H,
}

impl<W, H> FnMeasure<W, H>
where
    W: Fn(&str, &FontDefinition) -> f32,
    H: Fn(&str, &FontDefinition) -> f32,
{
    pub fn new(width: W, height: H) -> Self {
        Self { width, height }
    }
}

impl<W, H> TextMeasure for FnMeasure<W, H>
where
    W: Fn(&str, &FontDefinition) -> f32,
    H: Fn(&str, &FontDefinition) -> f32,
{
    fn measure_width(&self, text: &str, font: &FontDefinition) -> f32 {
        (self.width)(text, font)
    }

    fn measure_height(&self, text: &str, font: &FontDefinition) -> f32 {
        (self.height)(text, font)
    }
}

impl<W, H> fmt::Debug for FnMeasure<W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMeasure").finish_non_exhaustive()
    }
}

/// Measures text by shaping it with cosmic-text against the system fonts.
///
/// Building a [`FontSystem`] scans the installed fonts, so one measurer is
/// meant to be created once and shared. The font system sits behind a mutex;
/// cloning the measurer shares the same font database.
#[derive(Clone)]
pub struct CosmicTextMeasure {
    font_system: Arc<Mutex<FontSystem>>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Shapes `text` and returns its `(width, height)` in pixels.
    fn measure(&self, text: &str, font: &FontDefinition) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }

        // A poisoned lock only means another measurement panicked; the font
        // database itself is still usable.
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size_px = font.size() * PT_TO_PX;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_FACTOR);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new()
            .family(Family::Name(font.family()))
            .weight(Weight(font.weight()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut runs = 0usize;

        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
            runs += 1;
        }

        if runs == 0 {
            max_width = text.chars().count() as f32 * font_size_px * FALLBACK_ADVANCE_FACTOR;
            total_height = metrics.line_height;
        }

        debug!(text, width = max_width, height = total_height; "Measured text");
        (max_width, total_height)
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CosmicTextMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmicTextMeasure").finish_non_exhaustive()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_width(&self, text: &str, font: &FontDefinition) -> f32 {
        self.measure(text, font).0
    }

    fn measure_height(&self, text: &str, font: &FontDefinition) -> f32 {
        self.measure(text, font).1
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_font_definition_default() {
        let font = FontDefinition::default();

        assert_eq!(font.family(), "Arial");
        assert_approx_eq!(f32, font.size(), 12.0);
        assert_eq!(font.weight(), 400);
    }

    #[test]
    fn test_fn_measure_delegates_to_closures() {
        let measure = FnMeasure::new(
            |text: &str, _: &FontDefinition| text.len() as f32 * 10.0,
            |_: &str, font: &FontDefinition| font.size() * 2.0,
        );
        let font = FontDefinition::new("Courier", 8.0, 700);

        assert_approx_eq!(f32, measure.measure_width("abc", &font), 30.0);
        assert_approx_eq!(f32, measure.measure_height("abc", &font), 16.0);
    }

    #[test]
    fn test_cosmic_measure_empty_text_is_zero() {
        let measure = CosmicTextMeasure::new();
        let font = FontDefinition::default();

        assert_approx_eq!(f32, measure.measure_width("", &font), 0.0);
        assert_approx_eq!(f32, measure.measure_height("", &font), 0.0);
    }

    #[test]
    fn test_cosmic_measure_grows_with_text() {
        let measure = CosmicTextMeasure::new();
        let font = FontDefinition::default();

        let short = measure.measure_width("Ctx", &font);
        let long = measure.measure_width("CustomerManagementContext", &font);

        assert!(short > 0.0);
        assert!(long > short);
        assert!(measure.measure_height("Ctx", &font) > 0.0);
    }

    #[test]
    fn test_cosmic_measure_is_deterministic() {
        let measure = CosmicTextMeasure::new();
        let font = FontDefinition::default();

        let first = measure.measure_width("PolicyManagementContext", &font);
        let second = measure.measure_width("PolicyManagementContext", &font);
        assert_approx_eq!(f32, first, second);
    }
}
