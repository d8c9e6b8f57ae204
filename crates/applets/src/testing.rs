//! Fakes shared by the applet tests.

use panel_core::{
    host::{IconThemeResolver, MenuPresenter},
    surface::{ArtLayer, FontSpec, Surface, TextExtents, TextMeasure},
    Color, Point, Rect, Result, Size,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 8px per char, 1px bearing, 16px tall.
#[derive(Debug, Default)]
pub struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn extents(&self, text: &str, _font: &FontSpec) -> TextExtents {
        TextExtents {
            x_bearing: 1.0,
            width:     text.chars().count() as f32 * 8.0,
            height:    16.0,
        }
    }
}

/// Resolves `name` to `/icons/<name>.png` for the configured names.
#[derive(Debug, Default)]
pub struct CountingResolver {
    widths: HashMap<String, u32>,
    calls:  Cell<usize>,
}

impl CountingResolver {
    pub fn with_icons(icons: &[(&str, u32)]) -> Self {
        Self {
            widths: icons.iter().map(|(n, w)| (n.to_string(), *w)).collect(),
            calls:  Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl IconThemeResolver for CountingResolver {
    fn resolve(&self, name: &str, _size: u32, _extra: Option<&Path>) -> Option<PathBuf> {
        self.calls.set(self.calls.get() + 1);
        self.widths
            .contains_key(name)
            .then(|| PathBuf::from(format!("/icons/{name}.png")))
    }

    fn icon_width(&self, path: &Path, size: u32) -> u32 {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|name| self.widths.get(name).copied())
            .unwrap_or(size)
    }
}

#[derive(Debug, Default)]
pub struct RecordingMenus {
    calls: RefCell<Vec<(String, Point)>>,
}

impl RecordingMenus {
    pub fn calls(&self) -> Vec<(String, Point)> {
        self.calls.borrow().clone()
    }
}

impl MenuPresenter for RecordingMenus {
    fn present_menu(&self, item_id: &str, anchor: Point) -> Result<()> {
        self.calls.borrow_mut().push((item_id.to_string(), anchor));
        Ok(())
    }
}

/// Records draw calls in surface-local coordinates.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size:      Size,
    pub texts: Vec<(String, Rect)>,
    pub icons: Vec<(PathBuf, Rect)>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self { size, ..Self::default() }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn fill_text(&mut self, text: &str, bounds: Rect, _font: &FontSpec, _color: Color) {
        self.texts.push((text.to_string(), bounds));
    }

    fn draw_icon(&mut self, path: &Path, bounds: Rect) {
        self.icons.push((path.to_path_buf(), bounds));
    }

    fn paint_art(&mut self, _layer: ArtLayer, _bounds: Rect, _alpha: f32) {}

    fn with_clip(&mut self, _region: Rect, draw: &mut dyn FnMut(&mut dyn Surface)) {
        draw(self);
    }
}
