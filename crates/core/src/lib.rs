pub mod applet;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod item;
pub mod state;
pub mod surface;

pub use applet::{Applet, AppletCore, AppletId};
pub use color::Color;
pub use error::{PanelError, Result};
pub use event::{AppletEvent, AppletInput, Message};
pub use geometry::{Point, Rect, Size};
pub use state::Alpha;
