use panel_core::{host::MenuPresenter, Point, Result};
use tokio::sync::mpsc;

/// A context-menu request waiting to be sent to its item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuRequest {
    pub item_id: String,
    pub anchor:  Point,
}

/// [`MenuPresenter`] that hands requests to the application loop, which
/// performs the D-Bus call as an async task outside the dispatch path.
#[derive(Debug)]
pub struct MenuQueue {
    tx: mpsc::UnboundedSender<MenuRequest>,
}

impl MenuQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MenuRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MenuPresenter for MenuQueue {
    fn present_menu(&self, item_id: &str, anchor: Point) -> Result<()> {
        self.tx
            .send(MenuRequest { item_id: item_id.to_string(), anchor })
            .map_err(|_| panel_core::PanelError::Tray("menu queue closed".into()))
    }
}
