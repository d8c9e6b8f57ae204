use crate::indicator::Indicator;
use panel_core::{
    host::{IconThemeResolver, MenuPresenter},
    item::ItemEvent,
    surface::Surface,
    Applet, AppletCore, AppletInput, PanelError, Point, Rect, Result, Size,
};
use panel_theme::Style;
use std::rc::Rc;
use tracing::{debug, warn};

/// Mirrors the status notifier host's items as a row of icons.
///
/// Layout: `pad, icon₁, pad, icon₂, pad, …`.  Hit boxes use the same offsets
/// and each indicator's real resolved width, so clicks land on what is drawn.
#[derive(Debug)]
pub struct IndicatorRow {
    core:       AppletCore,
    style:      Style,
    resolver:   Rc<dyn IconThemeResolver>,
    menus:      Rc<dyn MenuPresenter>,
    indicators: Vec<Indicator>,
}

impl IndicatorRow {
    pub fn new(
        style: Style,
        resolver: Rc<dyn IconThemeResolver>,
        menus: Rc<dyn MenuPresenter>,
    ) -> Self {
        Self {
            core: AppletCore::new("indicators"),
            style,
            resolver,
            menus,
            indicators: Vec::new(),
        }
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// The indicator whose box contains the applet-local point `p`.
    pub fn hit_test(&self, p: Point) -> Option<&Indicator> {
        self.hit(p).map(|(indicator, _)| indicator)
    }

    fn hit(&self, p: Point) -> Option<(&Indicator, Rect)> {
        let height = self.core.allocation()?.height;
        self.indicators
            .iter()
            .zip(self.boxes(height))
            .find(|(_, bounds)| bounds.contains(p))
    }

    fn icon_size(height: f32) -> u32 {
        height.max(0.0).round() as u32
    }

    /// One box per indicator, left to right.
    fn boxes(&self, height: f32) -> Vec<Rect> {
        let size = Self::icon_size(height);
        let pad = self.style.icon_padding;
        let mut x = pad;
        self.indicators
            .iter()
            .map(|indicator| {
                let width = indicator.width(size, self.resolver.as_ref());
                let bounds = Rect::new(x, 0.0, width, height);
                x += width + pad;
                bounds
            })
            .collect()
    }

    fn measure(&self, height: f32) -> f32 {
        let size = Self::icon_size(height);
        let pad = self.style.icon_padding;
        self.indicators
            .iter()
            .map(|indicator| indicator.width(size, self.resolver.as_ref()) + pad)
            .fold(pad, |acc, w| acc + w)
    }

    /// Re-allocate when registered, otherwise wait for the compositor.
    fn reallocate(&mut self) {
        if let Some(current) = self.core.allocation() {
            self.allocate(current.height);
        }
    }

    fn apply_item_event(&mut self, event: &ItemEvent) {
        match event {
            ItemEvent::Added { id, properties } => {
                if let Err(e) = properties.validate(id) {
                    warn!("dropping status item: {e}");
                    return;
                }
                self.indicators.retain(|i| i.id() != id);
                self.indicators.push(Indicator::new(id.clone(), properties.clone()));
                debug!("indicator added: {id} ({} total)", self.indicators.len());
                self.reallocate();
                self.core.request_redraw();
            }
            ItemEvent::Removed { id } => {
                let before = self.indicators.len();
                self.indicators.retain(|i| i.id() != id);
                if self.indicators.len() != before {
                    debug!("indicator removed: {id}");
                    self.reallocate();
                    self.core.request_redraw();
                }
            }
            ItemEvent::Changed { id, change } => {
                let Some(indicator) = self.indicators.iter_mut().find(|i| i.id() == id) else {
                    debug!("change for unknown item {id}; ignoring");
                    return;
                };
                indicator.apply(change.clone());

                // A new icon may be wider or narrower than the old one.
                let Some(current) = self.core.allocation() else {
                    return;
                };
                if self.measure(current.height) != current.width {
                    self.reallocate();
                }
                self.core.request_redraw();
            }
        }
    }

    fn click(&self, p: Point) {
        let Some(allocation) = self.core.allocation() else {
            return;
        };
        let origin = self.core.position().unwrap_or(Point::ORIGIN);

        if let Some((indicator, bounds)) = self.hit(p) {
            // Menus open below the strip, aligned with the icon.
            let anchor = Point::new(origin.x + bounds.x, origin.y + allocation.height);
            if let Err(e) = self.menus.present_menu(indicator.id(), anchor) {
                warn!("context menu for {} failed: {e}", indicator.id());
            }
        }
    }
}

impl Applet for IndicatorRow {
    fn core(&self) -> &AppletCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AppletCore {
        &mut self.core
    }

    fn allocate(&mut self, target_height: f32) -> Size {
        let size = Size::new(self.measure(target_height), target_height);
        self.core.set_allocation(size);
        size
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let allocation = self.core.allocation().ok_or_else(|| PanelError::Render {
            applet: format!("indicators{}", self.core.id()),
            reason: "rendered before allocation".into(),
        })?;

        let size = Self::icon_size(allocation.height);
        let y = (allocation.height - size as f32) / 2.0;

        for (indicator, bounds) in self.indicators.iter().zip(self.boxes(allocation.height)) {
            match indicator.resolve_icon(size, self.resolver.as_ref()) {
                Ok(icon) => surface.draw_icon(
                    &icon.path,
                    Rect::new(bounds.x, y, icon.width as f32, size as f32),
                ),
                // The slot stays reserved; the next status change retries.
                Err(e) => debug!("{}: {e}", indicator.id()),
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, input: &AppletInput) {
        match input {
            AppletInput::Click(p) => self.click(*p),
            AppletInput::Item(event) => self.apply_item_event(event),
            AppletInput::Tick => {}
        }
    }
}
