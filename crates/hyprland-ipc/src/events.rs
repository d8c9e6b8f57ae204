use panel_core::state::{WindowInfo, WorkspaceId};
use serde::Deserialize;

/// Events from the Hyprland event socket (`.socket2.sock`) the panel cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum HyprlandEvent {
    /// Active workspace changed.  Carries the workspace name.
    Workspace(String),
    Fullscreen(bool),
    ActiveWindow,
    WindowOpened,
    WindowClosed,
    WindowMoved,
    /// A window toggled floating/tiled, which can change what covers the viewport.
    FloatingChanged,
    /// A monitor was added or removed; the strip width may need refreshing.
    MonitorsChanged,
    /// An event we don't handle.  Carries the raw line for debugging.
    Unknown(String),
}

impl HyprlandEvent {
    /// Whether this event can flip the fullscreen condition and so deserves
    /// an immediate poll instead of waiting for the next periodic one.
    pub fn triggers_poll(&self) -> bool {
        !matches!(self, Self::MonitorsChanged | Self::Unknown(_))
    }
}

/// Parse a raw IPC event line.  Hyprland events have the form `name>>data`.
pub fn parse_event(line: &str) -> HyprlandEvent {
    let Some((event, data)) = line.split_once(">>") else {
        return HyprlandEvent::Unknown(line.to_string());
    };

    match event {
        "workspace" => HyprlandEvent::Workspace(data.trim().to_string()),
        // workspacev2 format: "id,name"
        "workspacev2" => {
            let name = data.split_once(',').map_or(data, |(_, name)| name);
            HyprlandEvent::Workspace(name.trim().to_string())
        }
        "fullscreen" => HyprlandEvent::Fullscreen(data.trim() == "1"),
        "activewindow" | "activewindowv2" => HyprlandEvent::ActiveWindow,
        "openwindow" => HyprlandEvent::WindowOpened,
        "closewindow" => HyprlandEvent::WindowClosed,
        "movewindow" | "movewindowv2" => HyprlandEvent::WindowMoved,
        "changefloatingmode" => HyprlandEvent::FloatingChanged,
        "monitoradded" | "monitoraddedv2" | "monitorremoved" => HyprlandEvent::MonitorsChanged,
        _ => HyprlandEvent::Unknown(line.to_string()),
    }
}

// ─── JSON replies ────────────────────────────────────────────────────────────

/// `{ "id": .., "name": .. }` as embedded in clients, monitors and `j/activeworkspace`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceRef {
    pub id:   WorkspaceId,
    #[serde(default)]
    pub name: String,
}

/// Hyprland reports `fullscreen` as a bool on older releases and as a mode
/// number (0 none, 1 maximized, 2 fullscreen, 3 both) on newer ones.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum FullscreenField {
    Flag(bool),
    Mode(u8),
}

impl Default for FullscreenField {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl FullscreenField {
    fn covers_viewport(self) -> bool {
        match self {
            Self::Flag(on) => on,
            Self::Mode(mode) => mode != 0,
        }
    }
}

/// One entry of `j/clients`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    #[serde(default)]
    pub class:     String,
    pub workspace: WorkspaceRef,
    #[serde(default = "yes")]
    pub mapped:    bool,
    #[serde(default)]
    pub hidden:    bool,
    #[serde(default)]
    fullscreen:    FullscreenField,
}

fn yes() -> bool {
    true
}

impl ClientInfo {
    pub fn is_maximized(&self) -> bool {
        self.fullscreen.covers_viewport()
    }

    pub fn window_info(&self) -> WindowInfo {
        WindowInfo {
            workspace: self.workspace.id,
            maximized: self.is_maximized(),
            visible:   self.mapped && !self.hidden,
        }
    }
}

/// One entry of `j/monitors`.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorInfo {
    pub name:    String,
    pub width:   u32,
    pub height:  u32,
    #[serde(default = "unit_scale")]
    pub scale:   f32,
    #[serde(default)]
    pub focused: bool,
}

fn unit_scale() -> f32 {
    1.0
}

impl MonitorInfo {
    /// Width in layout pixels, which is what the layer surface is sized in.
    pub fn logical_width(&self) -> f32 {
        if self.scale > 0.0 {
            (self.width as f32 / self.scale).round()
        } else {
            self.width as f32
        }
    }
}
