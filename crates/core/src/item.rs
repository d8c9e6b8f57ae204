use crate::error::{PanelError, Result};
use std::path::PathBuf;

/// Status reported by a status notifier item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Active,
    NeedsAttention,
    Passive,
}

impl ItemStatus {
    /// Parse the wire spelling used by `org.kde.StatusNotifierItem.Status`.
    pub fn parse(item: &str, raw: &str) -> Result<Self> {
        match raw {
            "Active" => Ok(Self::Active),
            "NeedsAttention" => Ok(Self::NeedsAttention),
            "Passive" => Ok(Self::Passive),
            other => Err(PanelError::ItemProtocol {
                item:   item.to_string(),
                reason: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// Read-only snapshot of one external item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemProperties {
    pub status:              ItemStatus,
    pub icon_name:           String,
    pub attention_icon_name: String,
    /// Extra directory to search before the system icon themes.
    pub icon_theme_path:     Option<PathBuf>,
}

impl ItemProperties {
    /// The icon name that applies to the current status.
    pub fn current_icon_name(&self) -> &str {
        match self.status {
            ItemStatus::NeedsAttention if !self.attention_icon_name.is_empty() => {
                &self.attention_icon_name
            }
            _ => &self.icon_name,
        }
    }

    /// Reject snapshots that give the panel nothing to draw.
    pub fn validate(&self, item: &str) -> Result<()> {
        if self.icon_name.is_empty() && self.attention_icon_name.is_empty() {
            return Err(PanelError::ItemProtocol {
                item:   item.to_string(),
                reason: "no icon name".into(),
            });
        }
        Ok(())
    }
}

/// Upstream change on a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemChange {
    Icon(String),
    AttentionIcon(String),
    Status(ItemStatus),
}

/// Changes to the host's item set, in the order they were observed.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    Added { id: String, properties: ItemProperties },
    Removed { id: String },
    Changed { id: String, change: ItemChange },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(status: ItemStatus) -> ItemProperties {
        ItemProperties {
            status,
            icon_name:           "mail".into(),
            attention_icon_name: "mail-unread".into(),
            icon_theme_path:     None,
        }
    }

    #[test]
    fn attention_status_selects_attention_icon() {
        assert_eq!(props(ItemStatus::Active).current_icon_name(), "mail");
        assert_eq!(props(ItemStatus::Passive).current_icon_name(), "mail");
        assert_eq!(props(ItemStatus::NeedsAttention).current_icon_name(), "mail-unread");
    }

    #[test]
    fn attention_without_attention_icon_falls_back() {
        let mut p = props(ItemStatus::NeedsAttention);
        p.attention_icon_name.clear();
        assert_eq!(p.current_icon_name(), "mail");
    }

    #[test]
    fn unknown_status_is_a_protocol_error() {
        let err = ItemStatus::parse(":1.42", "Blinking").unwrap_err();
        assert!(matches!(err, PanelError::ItemProtocol { .. }));
        assert_eq!(ItemStatus::parse(":1.42", "Passive").unwrap(), ItemStatus::Passive);
    }

    #[test]
    fn iconless_item_is_rejected() {
        let mut p = props(ItemStatus::Active);
        p.icon_name.clear();
        p.attention_icon_name.clear();
        assert!(p.validate("x").is_err());
    }
}
