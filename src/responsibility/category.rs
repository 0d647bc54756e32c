//! Responsibility categories and the evidence recorded for them.

use serde::Serialize;

/// The kinds of work a file can be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "UI Rendering")]
    UiRendering,
    #[serde(rename = "UI Interaction")]
    UiInteraction,
    #[serde(rename = "Business Logic")]
    BusinessLogic,
    #[serde(rename = "Data Access")]
    DataAccess,
    #[serde(rename = "Input Validation")]
    Validation,
    #[serde(rename = "State Management")]
    StateManagement,
    #[serde(rename = "API Communication")]
    ApiCommunication,
    #[serde(rename = "Utility Functions")]
    Utility,
    #[serde(rename = "Configuration")]
    Configuration,
    /// Reserved; no predicate produces it yet.
    #[serde(rename = "Testing")]
    Testing,
}

impl Category {
    /// Every category, in predicate order.
    pub const ALL: [Category; 10] = [
        Category::UiRendering,
        Category::UiInteraction,
        Category::BusinessLogic,
        Category::DataAccess,
        Category::Validation,
        Category::StateManagement,
        Category::ApiCommunication,
        Category::Utility,
        Category::Configuration,
        Category::Testing,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::UiRendering => "UI Rendering",
            Category::UiInteraction => "UI Interaction",
            Category::BusinessLogic => "Business Logic",
            Category::DataAccess => "Data Access",
            Category::Validation => "Input Validation",
            Category::StateManagement => "State Management",
            Category::ApiCommunication => "API Communication",
            Category::Utility => "Utility Functions",
            Category::Configuration => "Configuration",
            Category::Testing => "Testing",
        }
    }

    /// Short kebab-case tag used in evidence and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::UiRendering => "ui-rendering",
            Category::UiInteraction => "ui-interaction",
            Category::BusinessLogic => "business-logic",
            Category::DataAccess => "data-access",
            Category::Validation => "validation",
            Category::StateManagement => "state-management",
            Category::ApiCommunication => "api-communication",
            Category::Utility => "utility",
            Category::Configuration => "configuration",
            Category::Testing => "testing",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One scored piece of evidence that a file performs a category of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsibilityIndicator {
    pub category: Category,
    pub description: String,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub evidence: Vec<String>,
}
