use crate::surface::ArtLayer;

/// Opacity pair applied to the panel art.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alpha {
    /// Background art opacity in `[0, 1]`.
    pub background: f32,
    /// Shadow art opacity in `[0, 1]`.
    pub shadow:     f32,
}

impl Alpha {
    pub const OPAQUE:      Self = Self { background: 1.0, shadow: 0.0 };
    pub const TRANSLUCENT: Self = Self { background: 0.5, shadow: 1.0 };

    /// Linear interpolation from `self` to `to` at progress `s ∈ [0, 1]`.
    #[must_use]
    pub fn lerp(self, to: Self, s: f32) -> Self {
        Self {
            background: self.background + (to.background - self.background) * s,
            shadow:     self.shadow + (to.shadow - self.shadow) * s,
        }
    }

    /// Opacity for one art layer.
    pub fn of(self, layer: ArtLayer) -> f32 {
        match layer {
            ArtLayer::Background => self.background,
            ArtLayer::Shadow => self.shadow,
        }
    }
}

/// The two resting states of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Opaque,
    Translucent,
}

impl Visibility {
    /// Fullscreen content gets the unobtrusive look.
    pub fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            Self::Translucent
        } else {
            Self::Opaque
        }
    }

    pub fn alpha(self) -> Alpha {
        match self {
            Self::Opaque => Alpha::OPAQUE,
            Self::Translucent => Alpha::TRANSLUCENT,
        }
    }
}

pub type WorkspaceId = i64;

/// What the windowing environment reports about one toplevel window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub workspace: WorkspaceId,
    /// Maximized or fullscreen.
    pub maximized: bool,
    /// Mapped and not hidden.
    pub visible:   bool,
}

impl WindowInfo {
    pub fn occupies_viewport(&self, workspace: WorkspaceId) -> bool {
        self.visible && self.workspace == workspace
    }
}

/// `true` when some window on the active workspace is maximized.
pub fn fullscreen_condition(windows: &[WindowInfo], active: WorkspaceId) -> bool {
    windows
        .iter()
        .any(|w| w.maximized && w.occupies_viewport(active))
}
