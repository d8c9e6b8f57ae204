use panel_core::{
    event::{AppletEvent, EventReceiver, EventSender},
    host::{Damage, WindowHost},
    surface::{ArtLayer, Surface},
    Alpha, Applet, AppletId, AppletInput, Point, Rect, Size,
};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Owns the ordered applet collection and decides what gets repainted.
///
/// Applets are packed right-to-left in registration order against the strip's
/// right edge.  Redraw requests become invalidations of exactly the
/// requesting applet's rectangle; anything that moves applets or changes the
/// art (allocation, resize, alpha, exposure) becomes a full repaint.
#[derive(Debug)]
pub struct Compositor {
    applets:       Vec<Box<dyn Applet>>,
    /// Screen width × window height.
    strip:         Size,
    applet_height: f32,
    alpha:         Alpha,
    events_tx:     EventSender,
    events_rx:     EventReceiver,
    full_pending:  bool,
}

impl Compositor {
    pub fn new(strip: Size, applet_height: f32, alpha: Alpha) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            applets: Vec::new(),
            strip,
            applet_height,
            alpha,
            events_tx,
            events_rx,
            full_pending: true,
        }
    }

    pub fn strip(&self) -> Size {
        self.strip
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn applets(&self) -> impl Iterator<Item = &dyn Applet> {
        self.applets.iter().map(|a| a.as_ref())
    }

    /// Window-relative rectangle of a registered, allocated applet.
    pub fn bounds_of(&self, id: AppletId) -> Option<Rect> {
        self.find(id)?.core().bounds()
    }

    /// Register an applet at the left end of the packed run.
    pub fn add_applet(&mut self, mut applet: Box<dyn Applet>) -> AppletId {
        let id = applet.id();
        applet.core_mut().attach(self.events_tx.clone());
        applet.allocate(self.applet_height);
        applet.core().request_redraw();
        debug!("registered {}{id}", applet.core().name());
        self.applets.push(applet);
        id
    }

    pub fn remove_applet(&mut self, id: AppletId) -> Option<Box<dyn Applet>> {
        let index = self.applets.iter().position(|a| a.id() == id)?;
        let applet = self.applets.remove(index);
        self.repack();
        self.full_pending = true;
        Some(applet)
    }

    /// Adopt a new screen width; everything moves, so repaint it all.
    pub fn resize(&mut self, width: f32) {
        if width == self.strip.width {
            return;
        }
        debug!("strip width {} -> {width}", self.strip.width);
        self.strip.width = width;
        self.repack();
        self.full_pending = true;
    }

    pub fn set_alpha(&mut self, alpha: Alpha) {
        self.alpha = alpha;
        self.full_pending = true;
    }

    pub fn expose(&mut self) {
        self.full_pending = true;
    }

    /// Deliver `input` to every applet in registration order.
    pub fn dispatch(&mut self, input: &AppletInput) {
        for applet in &mut self.applets {
            applet.handle_input(input);
        }
    }

    /// Route a pointer release to the applet under `p`, in its local coordinates.
    pub fn click(&mut self, p: Point) -> Option<AppletId> {
        let applet = self
            .applets
            .iter_mut()
            .find(|a| a.core().bounds().is_some_and(|b| b.contains(p)))?;

        let bounds = applet.core().bounds()?;
        applet.handle_input(&AppletInput::Click(bounds.to_local(p)));
        Some(applet.id())
    }

    /// Drain applet events and turn them into host invalidations.
    ///
    /// Duplicate redraw requests collapse into one, and a full repaint
    /// subsumes every partial one.
    pub fn flush(&mut self, host: &mut dyn WindowHost) {
        let mut repack = false;
        let mut partial: Vec<AppletId> = Vec::new();

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppletEvent::AllocationChanged(id, size) => {
                    trace!("{id} allocation -> {size:?}");
                    repack = true;
                }
                AppletEvent::RenderRequested(id) => {
                    if !partial.contains(&id) {
                        partial.push(id);
                    }
                }
            }
        }

        if repack {
            self.repack();
            self.full_pending = true;
        }

        if std::mem::take(&mut self.full_pending) {
            host.invalidate(Damage::Full);
            return;
        }

        for id in partial {
            match self.bounds_of(id) {
                Some(region) => host.invalidate(Damage::Applet { id, region }),
                None => trace!("{id} not placed yet; redraw dropped"),
            }
        }
    }

    /// Recompute every applet's position from the right edge.
    fn repack(&mut self) {
        let mut right = self.strip.width;
        for applet in &mut self.applets {
            if let Some(allocation) = applet.core().allocation() {
                right -= allocation.width;
                applet.core_mut().set_position(Point::new(right, 0.0));
            }
        }
    }

    fn find(&self, id: AppletId) -> Option<&dyn Applet> {
        self.applets.iter().find(|a| a.id() == id).map(|a| a.as_ref())
    }

    // ── Painting ──────────────────────────────────────────────────────────────

    /// Paint the shadow and background art stretched over the whole window.
    pub fn paint_background(&self, surface: &mut dyn Surface) {
        let bounds = Rect::new(0.0, 0.0, self.strip.width, self.strip.height);
        for layer in ArtLayer::ALL {
            surface.paint_art(layer, bounds, self.alpha.of(layer));
        }
    }

    /// Render one applet into its own clipped rectangle.
    pub fn paint_applet(&self, id: AppletId, surface: &mut dyn Surface) {
        if let Some(applet) = self.find(id) {
            paint_one(applet, surface);
        }
    }

    pub fn paint_full(&self, surface: &mut dyn Surface) {
        self.paint_background(surface);
        for applet in &self.applets {
            paint_one(applet.as_ref(), surface);
        }
    }

    pub fn repaint(&self, damage: Damage, surface: &mut dyn Surface) {
        match damage {
            Damage::Full => self.paint_full(surface),
            Damage::Applet { id, .. } => self.paint_applet(id, surface),
        }
    }
}

/// A failing applet is skipped for this frame; the rest still paint.
fn paint_one(applet: &dyn Applet, surface: &mut dyn Surface) {
    let Some(bounds) = applet.core().bounds() else {
        return;
    };

    let mut result = Ok(());
    surface.with_clip(bounds, &mut |clipped| result = applet.render(clipped));

    if let Err(e) = result {
        warn!("{e}; skipped this frame");
    }
}
