use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification tag of a graph node, used for colour and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Disease,
    Species,
    Gene,
    Chemical,
    Pathway,
    SpaceEnvironmentFactor,
    Publication,
    Unclassified,
}

/// Colours used to draw a node of a given category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

const NEUTRAL_STYLE: CategoryStyle = CategoryStyle {
    background: "linear-gradient(135deg, #ffffff 0%, #f8fafc 100%)",
    border: "#e2e8f0",
    text: "#1e293b",
};

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Disease,
        Category::Species,
        Category::Gene,
        Category::Chemical,
        Category::Pathway,
        Category::SpaceEnvironmentFactor,
        Category::Publication,
        Category::Unclassified,
    ];

    /// Categories governed by the per-category filter.
    /// Publications are always shown and have no filter entry.
    pub const FILTERABLE: [Category; 7] = [
        Category::Disease,
        Category::Species,
        Category::Gene,
        Category::Chemical,
        Category::Pathway,
        Category::SpaceEnvironmentFactor,
        Category::Unclassified,
    ];

    /// Map a raw backend label onto a category.
    ///
    /// Exact matches win, then a case-insensitive match; anything else
    /// (including the backend's generic `Node`) is `Unclassified`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == label)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str().eq_ignore_ascii_case(label))
            })
            .unwrap_or(Category::Unclassified)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Disease => "Disease",
            Category::Species => "Species",
            Category::Gene => "Gene",
            Category::Chemical => "Chemical",
            Category::Pathway => "Pathway",
            Category::SpaceEnvironmentFactor => "SpaceEnvironmentFactor",
            Category::Publication => "Publication",
            Category::Unclassified => "Unclassified",
        }
    }

    /// Whether the per-category filter applies to this category.
    pub fn is_filterable(self) -> bool {
        self != Category::Publication
    }

    pub fn style(self) -> CategoryStyle {
        match self {
            Category::Disease => CategoryStyle {
                background: "linear-gradient(135deg, #fee2e2 0%, #fecaca 100%)",
                border: "#ef4444",
                text: "#991b1b",
            },
            Category::Species => CategoryStyle {
                background: "linear-gradient(135deg, #dbeafe 0%, #bfdbfe 100%)",
                border: "#3b82f6",
                text: "#1e3a8a",
            },
            Category::Gene => CategoryStyle {
                background: "linear-gradient(135deg, #dcfce7 0%, #bbf7d0 100%)",
                border: "#22c55e",
                text: "#14532d",
            },
            Category::Chemical => CategoryStyle {
                background: "linear-gradient(135deg, #fef3c7 0%, #fde047 100%)",
                border: "#eab308",
                text: "#713f12",
            },
            Category::Pathway => CategoryStyle {
                background: "linear-gradient(135deg, #e9d5ff 0%, #d8b4fe 100%)",
                border: "#a855f7",
                text: "#581c87",
            },
            Category::SpaceEnvironmentFactor => CategoryStyle {
                background: "linear-gradient(135deg, #fed7aa 0%, #fdba74 100%)",
                border: "#f97316",
                text: "#7c2d12",
            },
            Category::Publication => CategoryStyle {
                background: "linear-gradient(135deg, #e0f2fe 0%, #bae6fd 100%)",
                border: "#0ea5e9",
                text: "#0c4a6e",
            },
            Category::Unclassified => NEUTRAL_STYLE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a category name that is not known.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Strict parse for user input: unknown names are an error rather than
    /// silently becoming `Unclassified`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Category::from_label("Gene"), Category::Gene);
        assert_eq!(Category::from_label("publication"), Category::Publication);
        assert_eq!(Category::from_label("Node"), Category::Unclassified);
        assert_eq!(Category::from_label(""), Category::Unclassified);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!("pathway".parse::<Category>(), Ok(Category::Pathway));
        assert!("Protein".parse::<Category>().is_err());
    }

    #[test]
    fn test_publication_not_filterable() {
        assert!(!Category::FILTERABLE.contains(&Category::Publication));
        assert!(!Category::Publication.is_filterable());
        assert!(Category::Unclassified.is_filterable());
    }

    #[test]
    fn test_unclassified_uses_neutral_style() {
        assert_eq!(Category::Unclassified.style(), NEUTRAL_STYLE);
        assert_ne!(Category::Gene.style(), NEUTRAL_STYLE);
    }
}
