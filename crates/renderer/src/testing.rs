//! Fakes shared by the compositor and dispatcher tests.

use panel_core::{
    host::{Damage, WindowHost},
    surface::{ArtLayer, FontSpec, Surface},
    Applet, AppletCore, AppletInput, Color, PanelError, Point, Rect, Result, Size,
};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Shared {
    width:   Cell<f32>,
    redraws: Cell<u32>,
    clicks:  RefCell<Vec<Point>>,
}

/// Test-side remote control for a [`FixedApplet`].
#[derive(Debug, Clone)]
pub struct FixedHandle(Rc<Shared>);

impl FixedHandle {
    /// Takes effect on the applet's next tick.
    pub fn set_width(&self, width: f32) {
        self.0.width.set(width);
    }

    /// Emitted on the applet's next tick.
    pub fn queue_redraw(&self) {
        self.0.redraws.set(self.0.redraws.get() + 1);
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.0.clicks.borrow().clone()
    }
}

/// Applet with a fixed, externally adjustable width.
#[derive(Debug)]
pub struct FixedApplet {
    core:   AppletCore,
    shared: Rc<Shared>,
    fail:   bool,
}

impl FixedApplet {
    pub fn new(width: f32) -> Self {
        Self::with_handle(width).0
    }

    pub fn failing(width: f32) -> Self {
        Self { fail: true, ..Self::new(width) }
    }

    pub fn with_handle(width: f32) -> (Self, FixedHandle) {
        let shared = Rc::new(Shared::default());
        shared.width.set(width);
        let applet = Self {
            core:   AppletCore::new("fixed"),
            shared: shared.clone(),
            fail:   false,
        };
        (applet, FixedHandle(shared))
    }
}

impl Applet for FixedApplet {
    fn core(&self) -> &AppletCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AppletCore {
        &mut self.core
    }

    fn allocate(&mut self, target_height: f32) -> Size {
        let size = Size::new(self.shared.width.get(), target_height);
        self.core.set_allocation(size);
        size
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        if self.fail {
            return Err(PanelError::Render {
                applet: "fixed".into(),
                reason: "asked to fail".into(),
            });
        }
        let font = FontSpec { family: "test".into(), size: 10.0 };
        surface.fill_text("fixed", Rect::new(0.0, 0.0, 1.0, 1.0), &font, Color::INK);
        Ok(())
    }

    fn handle_input(&mut self, input: &AppletInput) {
        match input {
            AppletInput::Click(p) => self.shared.clicks.borrow_mut().push(*p),
            AppletInput::Tick => {
                if let Some(current) = self.core.allocation() {
                    if current.width != self.shared.width.get() {
                        self.allocate(current.height);
                    }
                }
                for _ in 0..self.shared.redraws.replace(0) {
                    self.core.request_redraw();
                }
            }
            AppletInput::Item(_) => {}
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub damages: Vec<Damage>,
}

impl WindowHost for RecordingHost {
    fn invalidate(&mut self, damage: Damage) {
        self.damages.push(damage);
    }
}

/// Records clip regions, art paints and successful applet renders.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size:         Size,
    pub clips:    Vec<Rect>,
    pub art:      Vec<(ArtLayer, Rect, f32)>,
    pub rendered: usize,
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

    fn fill_text(&mut self, _text: &str, _bounds: Rect, _font: &FontSpec, _color: Color) {
        self.rendered += 1;
    }

    fn draw_icon(&mut self, _path: &Path, _bounds: Rect) {
        self.rendered += 1;
    }

    fn paint_art(&mut self, layer: ArtLayer, bounds: Rect, alpha: f32) {
        self.art.push((layer, bounds, alpha));
    }

    fn with_clip(&mut self, region: Rect, draw: &mut dyn FnMut(&mut dyn Surface)) {
        self.clips.push(region);
        draw(self);
    }
}
