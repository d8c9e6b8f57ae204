use crate::{
    error::Result,
    event::{AppletEvent, AppletInput, EventSender},
    geometry::{Point, Rect, Size},
    surface::Surface,
};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Process-unique applet identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppletId(u32);

impl AppletId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AppletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State every applet carries: identity, negotiated footprint, the position
/// the compositor assigned, and the channel its events travel on.
///
/// Events emitted before the compositor attaches a sender are dropped.
#[derive(Debug)]
pub struct AppletCore {
    id:         AppletId,
    name:       &'static str,
    allocation: Option<Size>,
    position:   Option<Point>,
    events:     Option<EventSender>,
}

impl AppletCore {
    pub fn new(name: &'static str) -> Self {
        Self {
            id: AppletId::next(),
            name,
            allocation: None,
            position: None,
            events: None,
        }
    }

    pub fn id(&self) -> AppletId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Connect this applet to a compositor's event channel.
    pub fn attach(&mut self, events: EventSender) {
        self.events = Some(events);
    }

    pub fn allocation(&self) -> Option<Size> {
        self.allocation
    }

    /// Commit a new footprint.  Always emits `AllocationChanged`.
    pub fn set_allocation(&mut self, allocation: Size) {
        self.allocation = Some(allocation);
        self.emit(AppletEvent::AllocationChanged(self.id, allocation));
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Only the compositor calls this.
    pub fn set_position(&mut self, position: Point) {
        self.position = Some(position);
    }

    /// Window-relative rectangle, once both position and allocation exist.
    pub fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_parts(self.position?, self.allocation?))
    }

    /// Ask the compositor to repaint this applet.  Redundant calls are harmless.
    pub fn request_redraw(&self) {
        self.emit(AppletEvent::RenderRequested(self.id));
    }

    fn emit(&self, event: AppletEvent) {
        match &self.events {
            Some(tx) => {
                if tx.send(event).is_err() {
                    trace!("{}{}: compositor gone, dropping {event:?}", self.name, self.id);
                }
            }
            None => trace!("{}{}: not registered, dropping {event:?}", self.name, self.id),
        }
    }
}

/// Every panel widget implements this trait.
///
/// Applets negotiate their own width for a fixed strip height, paint only
/// inside `[0, 0] × allocation`, and emit redraw requests when their content
/// changes.  Position is always assigned by the compositor.
pub trait Applet: fmt::Debug {
    fn core(&self) -> &AppletCore;

    fn core_mut(&mut self) -> &mut AppletCore;

    fn id(&self) -> AppletId {
        self.core().id()
    }

    /// Compute, store and return this applet's footprint for `target_height`.
    /// Must be deterministic for fixed content and must not block on I/O.
    fn allocate(&mut self, target_height: f32) -> Size;

    /// Paint into applet-local coordinates.  Never called before `allocate`.
    fn render(&self, surface: &mut dyn Surface) -> Result<()>;

    fn handle_input(&mut self, _input: &AppletInput) {}
}
