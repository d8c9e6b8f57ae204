//! Canvas plumbing: the strip's retained layers, the [`Surface`] adapter
//! over an iced frame, and the canvas program that ties them to the panel.

use iced::{
    mouse,
    widget::canvas::{self, Action, Cache, Event, Frame, Geometry, Image},
    advanced::svg::Svg,
    widget::{image, svg},
    Rectangle, Renderer, Theme,
};
use panel_core::{
    host::{Damage, WindowHost},
    surface::{ArtLayer, FontSpec, Surface},
    AppletId, Color, Message as PanelMessage, PanelError, Point, Rect, Result, Size,
};
use panel_renderer::Panel;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

use crate::Message;

// ─── Art ─────────────────────────────────────────────────────────────────────

/// Background and shadow SVGs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Art {
    background: svg::Handle,
    shadow:     svg::Handle,
}

impl Art {
    /// Read both art files.  A missing or empty file is fatal.
    pub fn load(background: &Path, shadow: &Path) -> Result<Self> {
        Ok(Self {
            background: svg::Handle::from_memory(read_art(ArtLayer::Background, background)?),
            shadow:     svg::Handle::from_memory(read_art(ArtLayer::Shadow, shadow)?),
        })
    }

    fn handle(&self, layer: ArtLayer) -> &svg::Handle {
        match layer {
            ArtLayer::Background => &self.background,
            ArtLayer::Shadow => &self.shadow,
        }
    }
}

fn read_art(layer: ArtLayer, path: &Path) -> Result<Vec<u8>> {
    let fail = |reason: String| PanelError::AssetLoad {
        name: format!("{} ({})", layer.name(), path.display()),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
    if bytes.is_empty() {
        return Err(fail("file is empty".into()));
    }
    Ok(bytes)
}

// ─── Retained layers ─────────────────────────────────────────────────────────

/// One geometry cache for the background art plus one per applet.
///
/// Invalidating an applet clears only its cache, so the next frame
/// re-tessellates just that rectangle.
#[derive(Debug, Default)]
pub struct StripLayers {
    background: Cache,
    applets:    RefCell<HashMap<AppletId, Cache>>,
}

impl WindowHost for StripLayers {
    fn invalidate(&mut self, damage: Damage) {
        match damage {
            Damage::Full => {
                self.background.clear();
                self.applets.get_mut().clear();
            }
            Damage::Applet { id, region } => {
                trace!("invalidate {id} at {region:?}");
                if let Some(cache) = self.applets.get_mut().get(&id) {
                    cache.clear();
                }
            }
        }
    }
}

// ─── Surface adapter ─────────────────────────────────────────────────────────

/// [`Surface`] over an iced canvas frame.
pub struct FrameSurface<'a> {
    frame:  &'a mut Frame,
    art:    &'a Art,
    /// Font family the panel was configured with, interned for iced.
    family: &'static str,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut Frame, art: &'a Art, family: &'static str) -> Self {
        Self { frame, art, family }
    }

    fn font(&self, spec: &FontSpec) -> iced::Font {
        if spec.family == self.family {
            iced::Font::with_name(self.family)
        } else {
            iced::Font::DEFAULT
        }
    }
}

fn rectangle(r: Rect) -> Rectangle {
    Rectangle::new(iced::Point::new(r.x, r.y), iced::Size::new(r.width, r.height))
}

fn iced_color(c: Color) -> iced::Color {
    iced::Color::from_rgba(c.r, c.g, c.b, c.a)
}

impl Surface for FrameSurface<'_> {
    fn size(&self) -> Size {
        let size = self.frame.size();
        Size::new(size.width, size.height)
    }

    fn fill_text(&mut self, text: &str, bounds: Rect, font: &FontSpec, color: Color) {
        self.frame.fill_text(canvas::Text {
            content: text.to_string(),
            position: iced::Point::new(bounds.x, bounds.y),
            color: iced_color(color),
            size: font.size.into(),
            line_height: iced::widget::text::LineHeight::Relative(panel_theme::metrics::LINE_HEIGHT),
            font: self.font(font),
            ..canvas::Text::default()
        });
    }

    fn draw_icon(&mut self, path: &Path, bounds: Rect) {
        let is_svg = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            self.frame.draw_svg(rectangle(bounds), Svg::new(svg::Handle::from_path(path)));
        } else {
            self.frame.draw_image(rectangle(bounds), Image::new(image::Handle::from_path(path)));
        }
    }

    fn paint_art(&mut self, layer: ArtLayer, bounds: Rect, alpha: f32) {
        let art = Svg::new(self.art.handle(layer).clone()).opacity(alpha);
        self.frame.draw_svg(rectangle(bounds), art);
    }

    fn with_clip(&mut self, region: Rect, draw: &mut dyn FnMut(&mut dyn Surface)) {
        let (art, family) = (self.art, self.family);
        self.frame.with_clip(rectangle(region), |inner| {
            draw(&mut FrameSurface::new(inner, art, family));
        });
    }
}

// ─── Canvas program ──────────────────────────────────────────────────────────

/// Borrowed view of the panel handed to the canvas each frame.
pub struct StripView<'a> {
    pub panel:  &'a Panel,
    pub layers: &'a StripLayers,
    pub art:    &'a Art,
    pub family: &'static str,
}

/// Last canvas size seen, to turn surface reconfiguration into exposure.
#[derive(Debug, Default)]
pub struct StripState {
    size: Option<iced::Size>,
}

impl StripState {
    /// The panel message an event produces, if any.
    ///
    /// A left release inside the strip wins over a pending size change; the
    /// size is left unrecorded so the next event reports it.
    fn react(
        &mut self,
        event: &Event,
        size: iced::Size,
        pointer: Option<iced::Point>,
    ) -> Option<PanelMessage> {
        if let Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) = event {
            if let Some(p) = pointer {
                return Some(PanelMessage::PointerReleased(Point::new(p.x, p.y)));
            }
        }

        if self.size == Some(size) {
            return None;
        }
        match self.size.replace(size) {
            Some(old) if old.width == size.width => Some(PanelMessage::Exposed),
            _ => Some(PanelMessage::ScreenResized(size.width)),
        }
    }
}

impl canvas::Program<Message> for StripView<'_> {
    type State = StripState;

    fn update(
        &self,
        state: &mut StripState,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let message = state.react(event, bounds.size(), cursor.position_in(bounds))?;
        let captured = matches!(message, PanelMessage::PointerReleased(_));
        let action = Action::publish(Message::App(message));
        Some(if captured { action.and_capture() } else { action })
    }

    fn draw(
        &self,
        _state: &StripState,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let compositor = self.panel.compositor();
        let mut layers = Vec::with_capacity(1 + compositor.applets().count());

        layers.push(self.layers.background.draw(renderer, bounds.size(), |frame| {
            compositor.paint_background(&mut FrameSurface::new(frame, self.art, self.family));
        }));

        let mut caches = self.layers.applets.borrow_mut();
        for applet in compositor.applets() {
            let id = applet.id();
            let cache = caches.entry(id).or_default();
            layers.push(cache.draw(renderer, bounds.size(), |frame| {
                compositor.paint_applet(id, &mut FrameSurface::new(frame, self.art, self.family));
            }));
        }

        layers
    }
}
