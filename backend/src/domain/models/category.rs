use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart colour for categories without a palette entry
pub const FALLBACK_COLOR: &str = "#64748b";

/// Accent colour used for savings rows
pub const SUCCESS_COLOR: &str = "#10b981";

/// Expense category. `Savings` marks money moved toward the savings goal
/// rather than spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Savings,
    Other,
}

/// Icon and accent colour for a category in expense lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Savings,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Savings => "Savings",
            Category::Other => "Other",
        }
    }

    /// Parse a category label. Anything unrecognized is `Other`.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Category::Other)
    }

    pub fn is_savings(&self) -> bool {
        matches!(self, Category::Savings)
    }

    /// Palette colour for the spending chart; `None` when the category has no
    /// dedicated colour
    pub fn chart_color(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("#f59e0b"),
            Category::Transport => Some("#3b82f6"),
            Category::Entertainment => Some("#8b5cf6"),
            Category::Shopping => Some("#ec4899"),
            Category::Bills => Some("#ef4444"),
            Category::Other => Some(FALLBACK_COLOR),
            Category::Savings => None,
        }
    }

    pub fn style(&self) -> CategoryStyle {
        let (icon, color) = match self {
            Category::Food => ("cutlery", "#f59e0b"),
            Category::Transport => ("car", "#3b82f6"),
            Category::Entertainment => ("film", "#8b5cf6"),
            Category::Shopping => ("shopping-bag", "#ec4899"),
            Category::Bills => ("file-text-o", "#ef4444"),
            Category::Savings => ("bank", SUCCESS_COLOR),
            Category::Other => ("money", FALLBACK_COLOR),
        };
        CategoryStyle { icon, color }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
