//! Interfaces of the collaborators the panel core drives but does not own.

use crate::{
    applet::AppletId,
    error::Result,
    geometry::{Point, Rect},
};
use std::fmt;
use std::path::{Path, PathBuf};

/// Scope of a repaint request sent to the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Damage {
    /// Background art and every applet.
    Full,
    /// Exactly one applet's `(position, allocation)` rectangle.
    Applet { id: AppletId, region: Rect },
}

/// The host window: accepts invalidation and repaints on its own schedule.
pub trait WindowHost {
    fn invalidate(&mut self, damage: Damage);
}

/// Icon-theme lookup.  Expected to answer fast enough not to stall the
/// dispatch loop.
pub trait IconThemeResolver: fmt::Debug {
    fn resolve(&self, name: &str, size: u32, extra_search_path: Option<&Path>) -> Option<PathBuf>;

    /// Rendered width of `path` when scaled to `size` pixels tall.
    fn icon_width(&self, _path: &Path, size: u32) -> u32 {
        size
    }
}

/// Presents a status item's context menu.  Rendering the menu is entirely
/// the item's business.
pub trait MenuPresenter: fmt::Debug {
    fn present_menu(&self, item_id: &str, anchor: Point) -> Result<()>;
}
