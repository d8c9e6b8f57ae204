use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure parsed from `panel.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Strip geometry.
    pub panel:  WindowConfig,
    /// Timer periods and animation length.
    pub timing: TimingConfig,
    /// Style injected into every applet.
    pub style:  StyleConfig,
    /// Background and shadow art.
    pub assets: AssetConfig,
    /// Status notifier tray.
    pub tray:   TrayConfig,
}

/// Host window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window height in logical pixels (includes the shadow below the strip).
    pub height: u32,
    /// Screen region reserved from other windows.
    pub reserved_height: u32,
    /// Height every applet is allocated against.
    pub applet_height: u32,
    /// Strip width used until the windowing environment reports the screen.
    pub fallback_width: u32,
    /// Whether the panel sits at the top or the bottom.
    pub position: Position,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            height:          40,
            reserved_height: 24,
            applet_height:   24,
            fallback_width:  1920,
            position:        Position::Top,
        }
    }
}

/// Panel position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub clock_ms:           u64,
    pub fullscreen_poll_ms: u64,
    pub fade_ms:            u64,
    /// Interval between animation frames while a fade is running.
    pub frame_ms:           u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_ms:           1_000,
            fullscreen_poll_ms: 200,
            fade_ms:            500,
            frame_ms:           16,
        }
    }
}

impl TimingConfig {
    pub fn clock(&self) -> Duration {
        Duration::from_millis(self.clock_ms.max(1))
    }

    pub fn fullscreen_poll(&self) -> Duration {
        Duration::from_millis(self.fullscreen_poll_ms.max(1))
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

/// Font, color and spacing shared by the applets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Font family name.
    pub font:         String,
    /// Font size in pixels.
    pub font_size:    f32,
    /// Text color (hex, e.g. `"#1a1a1a"`).
    pub color:        String,
    /// Horizontal padding on both sides of text applets.
    pub padding:      f32,
    /// Padding before, between and after tray icons.
    pub icon_padding: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font:         "Droid Sans".to_string(),
            font_size:    14.0,
            color:        "#1a1a1a".to_string(),
            padding:      10.0,
            icon_padding: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub background: PathBuf,
    pub shadow:     PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        let dir = crate::config_dir();
        Self {
            background: dir.join("background.svg"),
            shadow:     dir.join("shadow.svg"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    pub enabled:    bool,
    /// Icon theme searched before `hicolor`.
    pub icon_theme: String,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            enabled:    true,
            icon_theme: "hicolor".to_string(),
        }
    }
}
