use chrono::{Local, NaiveTime};
use panel_core::{
    surface::{Surface, TextMeasure},
    Applet, AppletCore, AppletInput, PanelError, Rect, Result, Size,
};
use panel_theme::Style;
use std::fmt;
use std::rc::Rc;

/// 24-hour `HH:MM`.
pub const TIME_FORMAT: &str = "%H:%M";

/// Where the clock reads the current time from.
pub type TimeSource = Box<dyn Fn() -> NaiveTime>;

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Displays the current time.
///
/// Width is measured once at allocation and then frozen; the ticks only
/// request redraws.  That holds as long as every `HH:MM` string has the same
/// advance in the configured font, which is true for tabular digits but not
/// guaranteed for arbitrary fonts.
pub struct ClockApplet {
    core:    AppletCore,
    style:   Style,
    measure: Rc<dyn TextMeasure>,
    now:     TimeSource,
}

impl ClockApplet {
    pub fn new(style: Style, measure: Rc<dyn TextMeasure>) -> Self {
        Self::with_time_source(style, measure, Box::new(|| Local::now().time()))
    }

    pub fn with_time_source(style: Style, measure: Rc<dyn TextMeasure>, now: TimeSource) -> Self {
        Self {
            core: AppletCore::new("clock"),
            style,
            measure,
            now,
        }
    }

    fn text(&self) -> String {
        format_time((self.now)())
    }
}

impl fmt::Debug for ClockApplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockApplet")
            .field("core", &self.core)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Applet for ClockApplet {
    fn core(&self) -> &AppletCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AppletCore {
        &mut self.core
    }

    fn allocate(&mut self, target_height: f32) -> Size {
        let extents = self.measure.extents(&self.text(), &self.style.font);
        let width = extents.width + extents.x_bearing + 2.0 * self.style.padding;
        let size = Size::new(width, target_height);
        self.core.set_allocation(size);
        size
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let allocation = self.core.allocation().ok_or_else(|| PanelError::Render {
            applet: format!("clock{}", self.core.id()),
            reason: "rendered before allocation".into(),
        })?;

        let text = self.text();
        let extents = self.measure.extents(&text, &self.style.font);
        let y = (allocation.height - extents.height) / 2.0;

        surface.fill_text(
            &text,
            Rect::new(self.style.padding, y, extents.width + extents.x_bearing, extents.height),
            &self.style.font,
            self.style.color,
        );
        Ok(())
    }

    fn handle_input(&mut self, input: &AppletInput) {
        if matches!(input, AppletInput::Tick) {
            self.core.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedAdvance, RecordingSurface};
    use panel_core::{AppletEvent, Point};
    use tokio::sync::mpsc;

    fn clock_at(h: u32, m: u32) -> ClockApplet {
        let time = NaiveTime::from_hms_opt(h, m, 0).unwrap();
        ClockApplet::with_time_source(
            Style::default(),
            Rc::new(FixedAdvance::default()),
            Box::new(move || time),
        )
    }

    #[test]
    fn formats_24_hour_with_leading_zeroes() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 59).unwrap()), "09:05");
        assert_eq!(format_time(NaiveTime::from_hms_opt(23, 0, 0).unwrap()), "23:00");
        assert_eq!(format_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()), "00:00");
    }

    #[test]
    fn allocation_is_text_plus_bearing_plus_padding() {
        // FixedAdvance: 8px per char, 1px bearing.
        let mut clock = clock_at(9, 5);
        let size = clock.allocate(24.0);
        assert_eq!(size, Size::new(5.0 * 8.0 + 1.0 + 20.0, 24.0));
        assert_eq!(clock.core().allocation(), Some(size));
    }

    #[test]
    fn renders_time_after_padding_vertically_centered() {
        let mut clock = clock_at(9, 5);
        clock.allocate(24.0);

        let mut surface = RecordingSurface::new(Size::new(61.0, 24.0));
        clock.render(&mut surface).unwrap();

        assert_eq!(surface.texts.len(), 1);
        let (text, bounds) = &surface.texts[0];
        assert_eq!(text, "09:05");
        assert_eq!(bounds.origin(), Point::new(10.0, (24.0 - 16.0) / 2.0));
    }

    #[test]
    fn render_before_allocate_is_an_error() {
        let clock = clock_at(12, 0);
        let mut surface = RecordingSurface::new(Size::new(100.0, 24.0));
        assert!(clock.render(&mut surface).is_err());
        assert!(surface.texts.is_empty());
    }

    #[test]
    fn tick_requests_redraw_without_reallocating() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clock = clock_at(12, 0);
        clock.core_mut().attach(tx);
        clock.allocate(24.0);
        let _ = rx.try_recv();

        clock.handle_input(&AppletInput::Tick);
        clock.handle_input(&AppletInput::Tick);

        let id = clock.id();
        assert_eq!(rx.try_recv().unwrap(), AppletEvent::RenderRequested(id));
        assert_eq!(rx.try_recv().unwrap(), AppletEvent::RenderRequested(id));
        assert!(rx.try_recv().is_err());
    }
}
