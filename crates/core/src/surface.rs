use crate::{
    color::Color,
    geometry::{Rect, Size},
};
use std::path::Path;

/// The two pieces of vector art painted under the applets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtLayer {
    Background,
    Shadow,
}

impl ArtLayer {
    /// Paint order, bottom first.
    pub const ALL: [Self; 2] = [Self::Shadow, Self::Background];

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Shadow => "shadow",
        }
    }
}

/// Font selection for text drawing and measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in pixels.
    pub size:   f32,
}

/// Ink metrics of a shaped string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    /// Offset from the pen origin to the left edge of the ink.
    pub x_bearing: f32,
    pub width:     f32,
    pub height:    f32,
}

/// Text measurement without drawing.  Must not block on I/O.
pub trait TextMeasure: std::fmt::Debug {
    fn extents(&self, text: &str, font: &FontSpec) -> TextExtents;
}

/// Drawing target handed to applets and to the background pass.
///
/// Coordinates are relative to the current clip origin.
pub trait Surface {
    fn size(&self) -> Size;

    /// Draw `text` with its layout box's top-left corner at `(bounds.x, bounds.y)`.
    fn fill_text(&mut self, text: &str, bounds: Rect, font: &FontSpec, color: Color);

    /// Draw an icon file scaled into `bounds`.
    fn draw_icon(&mut self, path: &Path, bounds: Rect);

    /// Rasterize a piece of panel art into `bounds` with the given opacity.
    fn paint_art(&mut self, layer: ArtLayer, bounds: Rect, alpha: f32);

    /// Run `draw` with the origin moved to `region` and painting clipped to it.
    fn with_clip(&mut self, region: Rect, draw: &mut dyn FnMut(&mut dyn Surface));
}
