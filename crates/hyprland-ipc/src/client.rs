use crate::events::{parse_event, ClientInfo, HyprlandEvent, MonitorInfo, WorkspaceRef};
use panel_core::{state::fullscreen_condition, PanelError, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Hyprland IPC client.
///
/// Queries go over the command socket; [`HyprlandIpc::spawn_listener`]
/// streams the event socket and reconnects if it drops.
#[derive(Debug, Clone)]
pub struct HyprlandIpc {
    /// Path to `.socket2.sock` (the event socket).
    event_socket: PathBuf,
    /// Path to `.socket.sock` (the command socket).
    cmd_socket:   PathBuf,
    /// Upper bound on one command round trip.
    timeout:      Duration,
}

/// Round-trip bound unless overridden with `with_timeout`.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

impl HyprlandIpc {
    /// Discover the sockets from `$HYPRLAND_INSTANCE_SIGNATURE`.
    pub fn new() -> Result<Self> {
        let sig = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
            .map_err(|_| PanelError::Ipc("HYPRLAND_INSTANCE_SIGNATURE not set; is Hyprland running?".into()))?;

        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .unwrap_or_else(|_| "/run/user/1000".to_string());

        Ok(Self::at(PathBuf::from(format!("{runtime_dir}/hypr/{sig}"))))
    }

    /// Client for an instance directory holding both sockets.
    pub fn at(base: PathBuf) -> Self {
        Self {
            event_socket: base.join(".socket2.sock"),
            cmd_socket:   base.join(".socket.sock"),
            timeout:      DEFAULT_TIMEOUT,
        }
    }

    /// Bound every command so a stalled compositor can't hold a query open.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Spawn a background task forwarding typed events on the returned channel.
    pub fn spawn_listener(&self) -> mpsc::Receiver<HyprlandEvent> {
        let (tx, rx) = mpsc::channel(32);
        let path = self.event_socket.clone();

        tokio::spawn(async move {
            loop {
                match UnixStream::connect(&path).await {
                    Ok(stream) => {
                        info!("Connected to Hyprland event socket");
                        let mut lines = BufReader::new(stream).lines();

                        while let Ok(Some(line)) = lines.next_line().await {
                            if tx.send(parse_event(&line)).await.is_err() {
                                return;
                            }
                        }

                        warn!("Hyprland IPC connection lost; reconnecting in 2s");
                    }
                    Err(e) => error!("Cannot connect to Hyprland IPC: {e}; retrying in 2s"),
                }

                tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
            }
        });

        rx
    }

    /// Send a one-shot command and return the raw response.
    ///
    /// Fails with [`PanelError::Ipc`] if the reply doesn't complete within
    /// the client's timeout.
    pub async fn command(&self, cmd: &str) -> Result<String> {
        tokio::time::timeout(self.timeout, self.exchange(cmd))
            .await
            .map_err(|_| PanelError::Ipc(format!("'{cmd}' timed out after {:?}", self.timeout)))?
    }

    async fn exchange(&self, cmd: &str) -> Result<String> {
        let mut stream = UnixStream::connect(&self.cmd_socket)
            .await
            .map_err(|e| PanelError::Ipc(format!("connect: {e}")))?;

        stream
            .write_all(cmd.as_bytes())
            .await
            .map_err(|e| PanelError::Ipc(format!("write: {e}")))?;

        let mut buf = String::new();
        stream
            .read_to_string(&mut buf)
            .await
            .map_err(|e| PanelError::Ipc(format!("read: {e}")))?;
        Ok(buf)
    }

    async fn query<T: DeserializeOwned>(&self, what: &str) -> Result<T> {
        let raw = self.command(&format!("j/{what}")).await?;
        serde_json::from_str(&raw).map_err(|e| PanelError::Ipc(format!("parse {what}: {e}")))
    }
}

pub async fn fetch_clients(ipc: &HyprlandIpc) -> Result<Vec<ClientInfo>> {
    ipc.query("clients").await
}

pub async fn fetch_active_workspace(ipc: &HyprlandIpc) -> Result<WorkspaceRef> {
    ipc.query("activeworkspace").await
}

pub async fn fetch_monitors(ipc: &HyprlandIpc) -> Result<Vec<MonitorInfo>> {
    ipc.query("monitors").await
}

/// Evaluate the fullscreen condition: is some visible window on the active
/// workspace maximized?
pub async fn poll_fullscreen(ipc: &HyprlandIpc) -> Result<bool> {
    let active = fetch_active_workspace(ipc).await?;
    let windows: Vec<_> = fetch_clients(ipc)
        .await?
        .iter()
        .map(ClientInfo::window_info)
        .collect();
    let fullscreen = fullscreen_condition(&windows, active.id);
    debug!("fullscreen poll: workspace {} with {} windows -> {fullscreen}", active.id, windows.len());
    Ok(fullscreen)
}
