use panel_core::{
    host::IconThemeResolver,
    item::{ItemChange, ItemProperties, ItemStatus},
    PanelError, Result,
};
use std::cell::RefCell;
use std::path::PathBuf;

/// An icon file and the width it renders at for the requested size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIcon {
    pub path:  PathBuf,
    pub width: u32,
}

/// Outcome of the last theme lookup.  A miss is remembered too, so a
/// missing icon costs one lookup per invalidation rather than one per frame.
#[derive(Debug, Clone)]
struct Resolution {
    status: ItemStatus,
    size:   u32,
    icon:   Option<ResolvedIcon>,
}

/// One status item as the row sees it, plus its resolved-icon cache.
///
/// The cache is reused while the item's status (and the requested size) is
/// unchanged; every upstream change clears it.
#[derive(Debug)]
pub struct Indicator {
    id:         String,
    properties: ItemProperties,
    resolution: RefCell<Option<Resolution>>,
}

impl Indicator {
    pub fn new(id: impl Into<String>, properties: ItemProperties) -> Self {
        Self {
            id: id.into(),
            properties,
            resolution: RefCell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolve the icon for the current status at `size` pixels.
    pub fn resolve_icon(&self, size: u32, resolver: &dyn IconThemeResolver) -> Result<ResolvedIcon> {
        let cached = self
            .resolution
            .borrow()
            .as_ref()
            .filter(|r| r.status == self.properties.status && r.size == size)
            .map(|r| r.icon.clone());

        let icon = match cached {
            Some(icon) => icon,
            None => {
                let icon = self.lookup(size, resolver);
                *self.resolution.borrow_mut() = Some(Resolution {
                    status: self.properties.status,
                    size,
                    icon:   icon.clone(),
                });
                icon
            }
        };

        icon.ok_or_else(|| PanelError::IconNotFound {
            name: self.properties.current_icon_name().to_string(),
            size,
        })
    }

    pub fn resolve_icon_path(&self, size: u32, resolver: &dyn IconThemeResolver) -> Result<PathBuf> {
        self.resolve_icon(size, resolver).map(|icon| icon.path)
    }

    /// Layout width at `size`; a missing icon keeps a square slot.
    pub fn width(&self, size: u32, resolver: &dyn IconThemeResolver) -> f32 {
        self.resolve_icon(size, resolver)
            .map_or(size, |icon| icon.width) as f32
    }

    /// Apply an upstream change and drop the cached resolution.
    pub fn apply(&mut self, change: ItemChange) {
        match change {
            ItemChange::Icon(name) => self.properties.icon_name = name,
            ItemChange::AttentionIcon(name) => self.properties.attention_icon_name = name,
            ItemChange::Status(status) => self.properties.status = status,
        }
        self.invalidate();
    }

    pub fn invalidate(&self) {
        self.resolution.borrow_mut().take();
    }

    fn lookup(&self, size: u32, resolver: &dyn IconThemeResolver) -> Option<ResolvedIcon> {
        let name = self.properties.current_icon_name();
        let path = resolver.resolve(name, size, self.properties.icon_theme_path.as_deref())?;
        let width = resolver.icon_width(&path, size);
        Some(ResolvedIcon { path, width })
    }
}
