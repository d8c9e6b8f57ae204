use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use panel_core::surface::{FontSpec, TextExtents, TextMeasure};
use std::cell::RefCell;
use std::fmt;

/// Line height relative to font size; the canvas draws text with the same ratio.
pub const LINE_HEIGHT: f32 = 1.2;

/// [`TextMeasure`] backed by cosmic-text shaping.
///
/// `width` is the shaped advance width, which already spans both side
/// bearings, and `x_bearing` is the first glyph's pen offset (0 for
/// left-to-right text).  An allocation of `width + x_bearing + padding`
/// therefore always contains the ink.
///
/// Building the font system scans installed fonts, so create one at startup
/// and share it.
pub struct CosmicMeasure {
    font_system: RefCell<FontSystem>,
}

impl CosmicMeasure {
    pub fn new() -> Self {
        Self {
            font_system: RefCell::new(FontSystem::new()),
        }
    }
}

impl Default for CosmicMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CosmicMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmicMeasure").finish_non_exhaustive()
    }
}

impl TextMeasure for CosmicMeasure {
    fn extents(&self, text: &str, font: &FontSpec) -> TextExtents {
        let mut font_system = self.font_system.borrow_mut();

        let metrics = Metrics::new(font.size, font.size * LINE_HEIGHT);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, Some(f32::MAX), Some(f32::MAX));
        let attrs = Attrs::new().family(Family::Name(&font.family));
        buffer.set_text(&mut font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        let mut extents = TextExtents {
            height: metrics.line_height,
            ..TextExtents::default()
        };
        for run in buffer.layout_runs() {
            extents.width = extents.width.max(run.line_w);
            if let Some(first) = run.glyphs.first() {
                extents.x_bearing = first.x;
            }
        }
        extents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> FontSpec {
        FontSpec { family: "Droid Sans".into(), size: 14.0 }
    }

    fn has_fonts(measure: &CosmicMeasure) -> bool {
        measure.font_system.borrow().db().faces().next().is_some()
    }

    #[test]
    fn clock_strings_have_positive_width() {
        let measure = CosmicMeasure::new();
        if !has_fonts(&measure) {
            return;
        }
        for text in ["00:00", "23:59"] {
            let extents = measure.extents(text, &font());
            assert!(extents.width > 0.0, "{text}: {extents:?}");
            assert_eq!(extents.x_bearing, 0.0);
            assert_eq!(extents.height, 14.0 * LINE_HEIGHT);
        }
    }

    #[test]
    fn empty_text_measures_nothing() {
        let extents = CosmicMeasure::new().extents("", &font());
        assert_eq!(extents.width, 0.0);
        assert_eq!(extents.x_bearing, 0.0);
    }
}
