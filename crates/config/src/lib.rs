pub mod schema;

pub use schema::{
    AssetConfig, PanelConfig, Position, StyleConfig, TimingConfig, TrayConfig, WindowConfig,
};

use panel_core::{PanelError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PanelConfig::default()` if
/// the file doesn't exist so the panel always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PanelConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PanelConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PanelError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| PanelError::Config(format!("TOML parse error: {e}")))
}

/// Directory holding `panel.toml` and the default art, honouring `$XDG_CONFIG_HOME`.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("panel")
}

/// Return the default config path.
pub fn default_path() -> PathBuf {
    config_dir().join("panel.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.panel.height, 40);
        assert_eq!(cfg.panel.reserved_height, 24);
        assert_eq!(cfg.timing.fade_ms, 500);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[style]\nfont = \"Inter\"\npadding = 12.0\n\n[timing]\nfullscreen_poll_ms = 100"
        )
        .unwrap();

        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.style.font, "Inter");
        assert_eq!(cfg.style.padding, 12.0);
        assert_eq!(cfg.style.font_size, 14.0);
        assert_eq!(cfg.timing.fullscreen_poll_ms, 100);
        assert_eq!(cfg.timing.clock_ms, 1000);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[panel\nheight = ").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }
}
