use crate::{
    applet::AppletId,
    geometry::{Point, Size},
    item::ItemEvent,
};
use std::time::Instant;
use tokio::sync::mpsc;

/// Events an applet emits towards the compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppletEvent {
    /// The applet wants its own rectangle repainted.
    RenderRequested(AppletId),
    /// The applet committed a new `(width, height)` footprint.
    AllocationChanged(AppletId, Size),
}

pub type EventSender = mpsc::UnboundedSender<AppletEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AppletEvent>;

/// Input the compositor delivers to an applet.
#[derive(Debug, Clone, PartialEq)]
pub enum AppletInput {
    /// Pointer release in applet-local coordinates.
    Click(Point),
    /// One-second timer tick.
    Tick,
    /// Upstream status-notifier change.
    Item(ItemEvent),
}

/// All messages that can flow into the panel's single dispatch owner.
///
/// Sources:
/// - Host window           → `PointerReleased`, `Exposed`, `ScreenResized`
/// - Clock timer           → `Tick`
/// - Fullscreen poll       → `FullscreenPolled`
/// - Animation frames      → `Frame`
/// - Status notifier host  → `Item`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Host window ───────────────────────────────────────────────────────────
    /// Pointer button released at window-relative coordinates.
    PointerReleased(Point),
    /// The host lost its retained contents; everything must be repainted.
    Exposed,
    /// The windowing environment reported the screen width.
    ScreenResized(f32),

    // ── Timers ────────────────────────────────────────────────────────────────
    /// Clock timer tick.
    Tick,
    /// Result of one fullscreen poll, stamped with when it was taken.
    FullscreenPolled { fullscreen: bool, at: Instant },
    /// Animation frame while an opacity transition is in flight.
    Frame(Instant),

    // ── Status notifier host ──────────────────────────────────────────────────
    Item(ItemEvent),
}
