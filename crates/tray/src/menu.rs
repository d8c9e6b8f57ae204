use crate::{proxy::StatusNotifierItemProxy, session, split_service, tray_err};
use panel_core::{Point, Result};
use tracing::debug;
use zbus::proxy::CacheProperties;

/// Ask the item identified by `item_id` to show its context menu at the
/// screen coordinates `anchor`.
pub async fn present_context_menu(item_id: String, anchor: Point) -> Result<()> {
    let conn = session().await?;
    let (destination, path) = split_service(&item_id);
    let item = StatusNotifierItemProxy::builder(conn)
        .destination(destination)
        .map_err(tray_err)?
        .path(path)
        .map_err(tray_err)?
        .cache_properties(CacheProperties::No)
        .build()
        .await
        .map_err(tray_err)?;

    debug!("context menu for {item_id} at ({}, {})", anchor.x, anchor.y);
    item.context_menu(anchor.x.round() as i32, anchor.y.round() as i32)
        .await
        .map_err(tray_err)
}
