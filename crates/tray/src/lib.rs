//! Status notifier host for the panel's indicator row.
//!
//! The `org.kde.StatusNotifierWatcher` service tracks which items exist; this
//! crate registers a host with it, mirrors every item's icon and status as
//! [`ItemEvent`](panel_core::item::ItemEvent)s, forwards context-menu
//! requests back to items, and resolves icon names against the installed
//! icon themes.

pub mod icons;
pub mod proxy;

mod host;
mod menu;

pub use host::spawn_host;
pub use icons::ThemeIconResolver;
pub use menu::present_context_menu;

use panel_core::PanelError;
use tokio::sync::OnceCell;

pub(crate) mod names {
    pub const HOST_BUS_PREFIX: &str = "org.kde.StatusNotifierHost";

    pub const ITEM_OBJECT: &str = "/StatusNotifierItem";
}

static SESSION: OnceCell<zbus::Connection> = OnceCell::const_new();

/// The session bus connection shared by the host and menu requests.
pub(crate) async fn session() -> panel_core::Result<&'static zbus::Connection> {
    SESSION
        .get_or_try_init(zbus::Connection::session)
        .await
        .map_err(tray_err)
}

pub(crate) fn tray_err(e: zbus::Error) -> PanelError {
    PanelError::Tray(e.to_string())
}

/// Split a registered item service into bus name and object path.
///
/// Items register either as a bare bus name, which implies the default item
/// path, or as `bus/object/path`.
pub(crate) fn split_service(service: &str) -> (&str, &str) {
    match service.find('/') {
        Some(i) => (&service[..i], &service[i..]),
        None => (service, names::ITEM_OBJECT),
    }
}
