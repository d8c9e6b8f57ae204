use crate::{compositor::Compositor, visibility::VisibilityController};
use panel_core::{host::WindowHost, Applet, AppletId, AppletInput, Message};
use tracing::{debug, trace};

/// Single serialized owner of the panel state.
///
/// Every host, timer and tray message goes through [`Panel::handle`] on one
/// thread; applet events raised while handling it are flushed to the host
/// before the call returns, so a redraw always sees the latest allocation
/// and position.
#[derive(Debug)]
pub struct Panel {
    compositor: Compositor,
    visibility: VisibilityController,
}

impl Panel {
    pub fn new(mut compositor: Compositor, visibility: VisibilityController) -> Self {
        compositor.set_alpha(visibility.alpha());
        Self { compositor, visibility }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn is_animating(&self) -> bool {
        self.visibility.is_animating()
    }

    pub fn add_applet(&mut self, applet: Box<dyn Applet>, host: &mut dyn WindowHost) -> AppletId {
        let id = self.compositor.add_applet(applet);
        self.compositor.flush(host);
        id
    }

    pub fn handle(&mut self, message: Message, host: &mut dyn WindowHost) {
        match message {
            Message::PointerReleased(p) => {
                if self.compositor.click(p).is_none() {
                    trace!("click at {p:?} hit no applet");
                }
            }
            Message::Exposed => self.compositor.expose(),
            Message::ScreenResized(width) => self.compositor.resize(width),
            Message::Tick => self.compositor.dispatch(&AppletInput::Tick),
            Message::FullscreenPolled { fullscreen, at } => {
                if self.visibility.observe(fullscreen, at) {
                    debug!("fullscreen={fullscreen}; fade started");
                }
            }
            Message::Frame(now) => {
                if let Some(alpha) = self.visibility.advance(now) {
                    self.compositor.set_alpha(alpha);
                }
            }
            Message::Item(event) => self.compositor.dispatch(&AppletInput::Item(event)),
        }
        self.compositor.flush(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedApplet, RecordingHost};
    use panel_core::{host::Damage, Alpha, Size};
    use std::time::{Duration, Instant};

    const FADE: Duration = Duration::from_millis(500);

    fn panel() -> Panel {
        Panel::new(
            Compositor::new(Size::new(1440.0, 40.0), 24.0, Alpha::OPAQUE),
            VisibilityController::new(FADE),
        )
    }

    fn full_repaints(host: &RecordingHost) -> usize {
        host.damages.iter().filter(|d| **d == Damage::Full).count()
    }

    #[test]
    fn tick_repaints_only_the_ticking_applet() {
        let mut p = panel();
        let mut host = RecordingHost::default();
        let (applet, handle) = FixedApplet::with_handle(61.0);
        let id = p.add_applet(Box::new(applet), &mut host);
        p.add_applet(Box::new(FixedApplet::new(30.0)), &mut host);
        host.damages.clear();

        handle.queue_redraw();
        p.handle(Message::Tick, &mut host);

        let region = p.compositor().bounds_of(id).unwrap();
        assert_eq!(host.damages, vec![Damage::Applet { id, region }]);
    }

    #[test]
    fn each_fade_frame_is_a_full_repaint() {
        let mut p = panel();
        let mut host = RecordingHost::default();
        let t0 = Instant::now();

        p.handle(Message::FullscreenPolled { fullscreen: true, at: t0 }, &mut host);
        host.damages.clear();

        let mut frames = 0;
        for ms in (0..=600).step_by(16) {
            p.handle(Message::Frame(t0 + Duration::from_millis(ms)), &mut host);
            frames += 1;
            if !p.is_animating() {
                break;
            }
        }

        assert_eq!(full_repaints(&host), frames);
        assert_eq!(p.compositor().alpha(), Alpha::TRANSLUCENT);
    }

    #[test]
    fn flapping_fullscreen_within_one_fade_settles_on_the_last_state() {
        let mut p = panel();
        let mut host = RecordingHost::default();
        let t0 = Instant::now();
        let at = |ms| t0 + Duration::from_millis(ms);

        p.handle(Message::FullscreenPolled { fullscreen: true, at: at(0) }, &mut host);
        p.handle(Message::Frame(at(100)), &mut host);
        p.handle(Message::FullscreenPolled { fullscreen: false, at: at(200) }, &mut host);
        p.handle(Message::Frame(at(300)), &mut host);
        p.handle(Message::FullscreenPolled { fullscreen: true, at: at(400) }, &mut host);
        host.damages.clear();

        // Only the last transition is live; it runs its full 500ms.
        p.handle(Message::Frame(at(800)), &mut host);
        assert!(p.is_animating());
        p.handle(Message::Frame(at(900)), &mut host);
        assert!(!p.is_animating());

        assert_eq!(p.compositor().alpha(), Alpha::TRANSLUCENT);
        assert_eq!(full_repaints(&host), 2);

        // Polls are not repaints.
        host.damages.clear();
        p.handle(Message::FullscreenPolled { fullscreen: true, at: at(1000) }, &mut host);
        assert!(host.damages.is_empty());
    }

    #[test]
    fn pointer_release_reaches_the_applet_under_it() {
        let mut p = panel();
        let mut host = RecordingHost::default();
        let (applet, handle) = FixedApplet::with_handle(30.0);
        p.add_applet(Box::new(applet), &mut host);

        p.handle(Message::PointerReleased(panel_core::Point::new(1420.0, 12.0)), &mut host);
        assert_eq!(handle.clicks(), vec![panel_core::Point::new(10.0, 12.0)]);
    }

    #[test]
    fn resize_and_expose_repaint_everything() {
        let mut p = panel();
        let mut host = RecordingHost::default();
        p.add_applet(Box::new(FixedApplet::new(30.0)), &mut host);
        host.damages.clear();

        p.handle(Message::ScreenResized(1920.0), &mut host);
        p.handle(Message::Exposed, &mut host);
        assert_eq!(host.damages, vec![Damage::Full, Damage::Full]);
        assert_eq!(p.compositor().strip().width, 1920.0);
    }
}
