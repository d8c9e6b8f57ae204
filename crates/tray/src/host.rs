use crate::{
    names,
    proxy::{StatusNotifierItemProxy, StatusNotifierWatcherProxy},
    session, split_service, tray_err,
};
use futures::StreamExt;
use panel_core::{
    item::{ItemChange, ItemEvent, ItemProperties, ItemStatus},
    PanelError, Result,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use zbus::{proxy::CacheProperties, Connection};

/// Spawn the status notifier host and return the stream of item changes.
///
/// Host failures (no session bus, no watcher) are logged and end the stream;
/// the panel keeps running with an empty indicator row.
pub fn spawn_host() -> mpsc::Receiver<ItemEvent> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        if let Err(e) = run_host(tx).await {
            error!("Status notifier host stopped: {e}");
        }
    });

    rx
}

async fn run_host(tx: mpsc::Sender<ItemEvent>) -> Result<()> {
    let conn = session().await?;
    let name = format!("{}-{}", names::HOST_BUS_PREFIX, std::process::id());
    conn.request_name(name.as_str()).await.map_err(tray_err)?;

    let watcher = StatusNotifierWatcherProxy::new(conn).await.map_err(tray_err)?;
    watcher.register_status_notifier_host(&name).await.map_err(tray_err)?;
    info!("Registered status notifier host {name}");

    let mut registered = watcher
        .receive_status_notifier_item_registered()
        .await
        .map_err(tray_err)?;
    let mut unregistered = watcher
        .receive_status_notifier_item_unregistered()
        .await
        .map_err(tray_err)?;

    let mut items: HashMap<String, JoinHandle<()>> = HashMap::new();
    for service in watcher.registered_status_notifier_items().await.map_err(tray_err)? {
        let task = spawn_item(conn.clone(), service.clone(), tx.clone());
        items.insert(service, task);
    }

    loop {
        tokio::select! {
            Some(signal) = registered.next() => {
                let Ok(args) = signal.args() else { continue };
                let service = args.service.to_string();
                debug!("status item registered: {service}");
                let task = spawn_item(conn.clone(), service.clone(), tx.clone());
                if let Some(old) = items.insert(service, task) {
                    old.abort();
                }
            }
            Some(signal) = unregistered.next() => {
                let Ok(args) = signal.args() else { continue };
                debug!("status item unregistered: {}", args.service);
                if let Some(task) = items.remove(args.service) {
                    task.abort();
                    let removed = ItemEvent::Removed { id: args.service.to_string() };
                    if tx.send(removed).await.is_err() {
                        break;
                    }
                }
            }
            else => break,
        }
    }

    warn!("Status notifier watcher went away");
    Ok(())
}

fn spawn_item(conn: Connection, service: String, tx: mpsc::Sender<ItemEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = watch_item(&conn, &service, &tx).await {
            warn!("Dropping status item {service}: {e}");
        }
    })
}

/// Announce one item, then forward its icon and status changes until it
/// disappears or the panel stops listening.
async fn watch_item(conn: &Connection, service: &str, tx: &mpsc::Sender<ItemEvent>) -> Result<()> {
    let (destination, path) = split_service(service);
    let item = StatusNotifierItemProxy::builder(conn)
        .destination(destination)
        .map_err(tray_err)?
        .path(path)
        .map_err(tray_err)?
        .cache_properties(CacheProperties::No)
        .build()
        .await
        .map_err(tray_err)?;

    let properties = read_properties(&item, service).await?;
    properties.validate(service)?;

    let mut icons = item.receive_new_icon().await.map_err(tray_err)?;
    let mut attention_icons = item.receive_new_attention_icon().await.map_err(tray_err)?;
    let mut statuses = item.receive_new_status().await.map_err(tray_err)?;

    let added = ItemEvent::Added { id: service.to_string(), properties };
    if tx.send(added).await.is_err() {
        return Ok(());
    }

    loop {
        let event = tokio::select! {
            Some(_) = icons.next() => {
                icon_event(service, "IconName", item.icon_name().await, ItemChange::Icon)
            }
            Some(_) = attention_icons.next() => icon_event(
                service,
                "AttentionIconName",
                item.attention_icon_name().await,
                ItemChange::AttentionIcon,
            ),
            Some(signal) = statuses.next() => {
                let args = signal.args().map_err(tray_err)?;
                match ItemStatus::parse(service, &args.status) {
                    Ok(status) => ItemEvent::Changed {
                        id:     service.to_string(),
                        change: ItemChange::Status(status),
                    },
                    Err(e) => {
                        warn!("{e}");
                        continue;
                    }
                }
            }
            else => return Ok(()),
        };

        let gone = matches!(event, ItemEvent::Removed { .. });
        if tx.send(event).await.is_err() || gone {
            return Ok(());
        }
    }
}

/// Turn the icon name re-read after a `NewIcon`/`NewAttentionIcon` signal
/// into an event.  An item that can't answer is dropped from the row.
fn icon_event(
    service: &str,
    property: &str,
    read: zbus::Result<String>,
    change: fn(String) -> ItemChange,
) -> ItemEvent {
    match read {
        Ok(name) => ItemEvent::Changed { id: service.to_string(), change: change(name) },
        Err(e) => {
            let err = PanelError::ItemProtocol {
                item:   service.to_string(),
                reason: format!("{property} unavailable: {e}"),
            };
            warn!("{err}; removing it");
            ItemEvent::Removed { id: service.to_string() }
        }
    }
}

async fn read_properties(item: &StatusNotifierItemProxy<'_>, service: &str) -> Result<ItemProperties> {
    let raw_status = item.status().await.map_err(|e| PanelError::ItemProtocol {
        item:   service.to_string(),
        reason: format!("Status unavailable: {e}"),
    })?;

    Ok(ItemProperties {
        status:              ItemStatus::parse(service, &raw_status)?,
        icon_name:           item.icon_name().await.unwrap_or_default(),
        attention_icon_name: item.attention_icon_name().await.unwrap_or_default(),
        icon_theme_path:     item
            .icon_theme_path()
            .await
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reread_icon_becomes_a_change() {
        let event = icon_event(":1.7", "IconName", Ok("mail-unread".into()), ItemChange::Icon);
        assert_eq!(
            event,
            ItemEvent::Changed { id: ":1.7".into(), change: ItemChange::Icon("mail-unread".into()) }
        );
    }

    #[test]
    fn unreadable_icon_removes_the_item() {
        let read = Err(zbus::Error::Failure("no such object".into()));
        let event = icon_event(":1.7", "AttentionIconName", read, ItemChange::AttentionIcon);
        assert_eq!(event, ItemEvent::Removed { id: ":1.7".into() });
    }
}
