use panel_config::StyleConfig;
use panel_core::{surface::FontSpec, Color};

/// Visual settings handed to each applet at construction.
///
/// Calling [`Style::from_config`] is infallible: an invalid color string
/// falls back to the default ink.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font:         FontSpec,
    pub color:        Color,
    /// Horizontal padding on both sides of text applets.
    pub padding:      f32,
    /// Padding before, between and after tray icons.
    pub icon_padding: f32,
}

impl Style {
    /// Build a [`Style`] from the config file's `[style]` section.
    pub fn from_config(cfg: &StyleConfig) -> Self {
        let color = Color::from_hex(&cfg.color).unwrap_or_else(|| {
            tracing::warn!("invalid style color '{}'; using default", cfg.color);
            Color::INK
        });

        Self {
            font: FontSpec {
                family: cfg.font.clone(),
                size:   cfg.font_size,
            },
            color,
            padding:      cfg.padding.max(0.0),
            icon_padding: cfg.icon_padding.max(0.0),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::from_config(&StyleConfig::default())
    }
}
