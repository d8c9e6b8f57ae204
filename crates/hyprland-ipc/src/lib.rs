//! Hyprland IPC: the window-state queries behind the fullscreen poll, the
//! monitor geometry behind the strip width, and the event socket that
//! triggers early re-evaluation.

pub mod client;
pub mod events;

pub use client::{fetch_active_workspace, fetch_clients, fetch_monitors, poll_fullscreen, HyprlandIpc};
pub use events::{parse_event, ClientInfo, HyprlandEvent, MonitorInfo, WorkspaceRef};
