//! Card templates.

use serde::{Deserialize, Serialize};

/// Layout family a template renders with. Unknown keys fall back to
/// [`TemplateKind::Classic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Classic,
    Modern,
    Minimal,
    Bold,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Classic,
        TemplateKind::Modern,
        TemplateKind::Minimal,
        TemplateKind::Bold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Classic => "classic",
            TemplateKind::Modern => "modern",
            TemplateKind::Minimal => "minimal",
            TemplateKind::Bold => "bold",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "modern" => TemplateKind::Modern,
            "minimal" => TemplateKind::Minimal,
            "bold" => TemplateKind::Bold,
            _ => TemplateKind::Classic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateInfo {
    pub id: i32,
    pub name: String,
    pub component_key: String,
    pub description: Option<String>,
}

impl TemplateInfo {
    pub fn kind(&self) -> TemplateKind {
        TemplateKind::from_key(&self.component_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(TemplateKind::from_key("Modern"), TemplateKind::Modern);
        assert_eq!(TemplateKind::from_key(" bold "), TemplateKind::Bold);
        assert_eq!(TemplateKind::from_key("neon"), TemplateKind::Classic);
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_key(kind.as_str()), kind);
        }
    }
}
