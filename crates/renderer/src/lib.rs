//! Layout, repaint and visibility engine for the panel strip.
//!
//! - [`Compositor`] packs applets and turns their events into invalidations.
//! - [`VisibilityController`] fades the art when a window goes fullscreen.
//! - [`Panel`] is the single dispatch owner tying both to incoming messages.

pub mod compositor;
pub mod panel;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use compositor::Compositor;
pub use panel::Panel;
pub use visibility::{sine_ease, Transition, VisibilityController};
