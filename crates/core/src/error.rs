use thiserror::Error;

/// Top-level error type used across the entire panel.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("tray error: {0}")]
    Tray(String),

    /// The icon theme has no file for this name at this size.
    #[error("icon '{name}' not found at {size}px")]
    IconNotFound { name: String, size: u32 },

    /// Background or shadow art could not be loaded.  Fatal at startup.
    #[error("cannot load asset '{name}': {reason}")]
    AssetLoad { name: String, reason: String },

    /// A single applet failed to paint itself this frame.
    #[error("applet {applet} failed to render: {reason}")]
    Render { applet: String, reason: String },

    /// A status item supplied malformed or unavailable data.
    #[error("status item '{item}' is malformed: {reason}")]
    ItemProtocol { item: String, reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PanelError {
    /// `false` for failures the panel cannot run without.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AssetLoad { .. } | Self::Config(_))
    }
}

pub type Result<T, E = PanelError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_failures_are_fatal() {
        let err = PanelError::AssetLoad {
            name:   "background".into(),
            reason: "missing".into(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "cannot load asset 'background': missing");
    }

    #[test]
    fn icon_and_render_failures_are_recoverable() {
        let icon = PanelError::IconNotFound { name: "nm-applet".into(), size: 24 };
        let render = PanelError::Render { applet: "clock#1".into(), reason: "boom".into() };
        assert!(icon.is_recoverable());
        assert!(render.is_recoverable());
    }
}
