//! Keyword and confidence tables for the category predicates.
//!
//! The table is plain data so it can be tuned from the `[heuristics]`
//! section of `archscope.toml` and tested on its own.

use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::syntax::CallShape;

/// Base confidence and keywords of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRule {
    pub confidence: f64,
    pub keywords: Vec<String>,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            confidence: 0.5,
            keywords: Vec::new(),
        }
    }
}

impl CategoryRule {
    fn new(confidence: f64, keywords: &[&str]) -> Self {
        Self {
            confidence,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn has_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    /// Case-insensitive substring match against the keywords.
    fn mentioned_in(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

/// Heuristic table driving the responsibility classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTable {
    /// JSX elements and fragments.
    pub ui_rendering: CategoryRule,
    /// Substrings of handler names (besides the `on` prefix).
    pub ui_interaction: CategoryRule,
    pub business_logic: CategoryRule,
    /// Methods that mark a call chain on a data object as data access.
    pub data_access: CategoryRule,
    /// Callee names that validate or parse input.
    pub validation: CategoryRule,
    /// State hooks.
    pub state_management: CategoryRule,
    /// HTTP-verb method names.
    pub api_communication: CategoryRule,
    /// Substrings of helper names.
    pub utility: CategoryRule,
    /// Substrings of configuration names.
    pub configuration: CategoryRule,
    pub testing: CategoryRule,

    /// Prefix of handler names, followed by an uppercase letter (`onClick`).
    pub handler_prefix: String,
    /// Branch/loop statements a function needs to count as business logic.
    pub min_branches: usize,
    /// Objects whose call chains are data access (`supabase.from(..)`).
    pub data_access_objects: Vec<String>,
    /// Import sources that are data-access clients.
    pub data_access_imports: Vec<String>,
    /// Objects whose calls are API communication (`axios.get(..)`).
    pub api_objects: Vec<String>,

    /// Minimum `count * average confidence` for a category to be present.
    pub presence_threshold: f64,
    /// Presence threshold used in strict mode.
    pub strict_presence_threshold: f64,
    /// Cap on the indicator-count bonus added to the overall confidence.
    pub max_diversity_bonus: f64,
}

impl Default for HeuristicTable {
    fn default() -> Self {
        Self {
            ui_rendering: CategoryRule::new(0.9, &[]),
            ui_interaction: CategoryRule::new(0.7, &["handle", "click"]),
            business_logic: CategoryRule::new(0.8, &[]),
            data_access: CategoryRule::new(
                0.9,
                &[
                    "query", "find", "create", "update", "delete", "save", "fetch", "select",
                    "insert", "from", "where", "eq", "single",
                ],
            ),
            validation: CategoryRule::new(0.8, &["validate", "parse", "safeParse", "check"]),
            state_management: CategoryRule::new(
                0.9,
                &["useState", "useReducer", "useContext", "useStore", "useSelector"],
            ),
            api_communication: CategoryRule::new(0.8, &["get", "post", "put", "patch", "delete"]),
            utility: CategoryRule::new(
                0.6,
                &["format", "parse", "convert", "transform", "helper", "util"],
            ),
            configuration: CategoryRule::new(
                0.7,
                &["config", "constant", "setting", "option", "default", "api_", "max_", "min_"],
            ),
            testing: CategoryRule::new(0.9, &[]),
            handler_prefix: "on".to_string(),
            min_branches: 2,
            data_access_objects: ["supabase", "prisma", "db", "database"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data_access_imports: ["supabase", "prisma", "mongoose", "sequelize"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_objects: ["fetch", "axios", "http"].iter().map(|s| s.to_string()).collect(),
            presence_threshold: 0.3,
            strict_presence_threshold: 0.6,
            max_diversity_bonus: 0.2,
        }
    }
}

impl HeuristicTable {
    /// The rule of a category.
    pub fn rule(&self, category: Category) -> &CategoryRule {
        match category {
            Category::UiRendering => &self.ui_rendering,
            Category::UiInteraction => &self.ui_interaction,
            Category::BusinessLogic => &self.business_logic,
            Category::DataAccess => &self.data_access,
            Category::Validation => &self.validation,
            Category::StateManagement => &self.state_management,
            Category::ApiCommunication => &self.api_communication,
            Category::Utility => &self.utility,
            Category::Configuration => &self.configuration,
            Category::Testing => &self.testing,
        }
    }

    /// Base confidence of a category, clamped to `[0, 1]`.
    pub fn confidence(&self, category: Category) -> f64 {
        self.rule(category).confidence.clamp(0.0, 1.0)
    }

    /// Presence threshold for the given mode.
    pub fn presence_threshold(&self, strict: bool) -> f64 {
        if strict {
            self.strict_presence_threshold
        } else {
            self.presence_threshold
        }
    }

    /// `onSubmit`, `handleChange`, `buttonClick`.
    pub fn is_handler_name(&self, name: &str) -> bool {
        let prefixed = name
            .strip_prefix(self.handler_prefix.as_str())
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase());
        prefixed || self.ui_interaction.mentioned_in(name)
    }

    pub fn is_business_logic(&self, branches: usize) -> bool {
        branches >= self.min_branches
    }

    /// A chain on a data object that calls a data method:
    /// `supabase.from('x').select()`, `prisma.user.findMany()`.
    pub fn is_data_access_call(&self, call: &CallShape<'_>) -> bool {
        let on_data_object = call
            .root
            .into_iter()
            .chain(call.chain.iter().copied())
            .any(|name| self.data_access_objects.iter().any(|o| o == name));
        on_data_object
            && call.chain.iter().any(|method| {
                self.data_access
                    .keywords
                    .iter()
                    .any(|k| method.starts_with(k.as_str()))
            })
    }

    pub fn is_data_access_import(&self, source: &str) -> bool {
        let source = source.to_lowercase();
        self.data_access_imports
            .iter()
            .any(|client| source.contains(client.as_str()))
    }

    pub fn is_validation_call(&self, call: &CallShape<'_>) -> bool {
        call.callee().is_some_and(|c| self.validation.has_keyword(c))
    }

    pub fn is_state_call(&self, call: &CallShape<'_>) -> bool {
        call.callee().is_some_and(|c| self.state_management.has_keyword(c))
    }

    pub fn is_api_call(&self, call: &CallShape<'_>) -> bool {
        let on_api_object = call
            .root
            .is_some_and(|root| self.api_objects.iter().any(|o| o == root));
        let verb = call
            .method
            .is_some_and(|m| self.api_communication.has_keyword(m));
        on_api_object || verb
    }

    pub fn is_utility_name(&self, name: &str) -> bool {
        self.utility.mentioned_in(name)
    }

    /// Names like `apiConfig`, `MAX_RETRIES` or `defaultOptions`.
    pub fn is_configuration_name(&self, name: &str) -> bool {
        self.configuration.mentioned_in(name) || is_all_caps(name)
    }

    /// Checks that every confidence and threshold is usable.
    pub fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let confidence = self.rule(category).confidence;
            if !(0.0..=1.0).contains(&confidence) {
                return Err(format!(
                    "heuristics.{} confidence must be between 0 and 1, got {}",
                    category.tag().replace('-', "_"),
                    confidence
                ));
            }
        }
        for (name, value) in [
            ("presence_threshold", self.presence_threshold),
            ("strict_presence_threshold", self.strict_presence_threshold),
            ("max_diversity_bonus", self.max_diversity_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("heuristics.{} must be a non-negative number", name));
            }
        }
        Ok(())
    }
}

/// `API_URL`, `MAX_SIZE`: uppercase letters, digits and underscores, longer than two.
fn is_all_caps(name: &str) -> bool {
    name.len() > 2
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call<'a>(
        root: Option<&'a str>,
        method: Option<&'a str>,
        chain: Vec<&'a str>,
    ) -> CallShape<'a> {
        CallShape { root, method, chain }
    }

    #[test]
    fn test_default_confidences() {
        let table = HeuristicTable::default();
        assert_eq!(table.confidence(Category::UiRendering), 0.9);
        assert_eq!(table.confidence(Category::UiInteraction), 0.7);
        assert_eq!(table.confidence(Category::DataAccess), 0.9);
        assert_eq!(table.confidence(Category::Utility), 0.6);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_handler_names() {
        let table = HeuristicTable::default();
        assert!(table.is_handler_name("onClick"));
        assert!(table.is_handler_name("handleSubmit"));
        assert!(table.is_handler_name("buttonClick"));
        assert!(!table.is_handler_name("options"));
        assert!(!table.is_handler_name("once"));
    }

    #[test]
    fn test_data_access_call() {
        let table = HeuristicTable::default();
        let supabase = call(Some("supabase"), Some("select"), vec!["from", "select"]);
        assert!(table.is_data_access_call(&supabase));
        let prisma = call(Some("prisma"), Some("findMany"), vec!["user", "findMany"]);
        assert!(table.is_data_access_call(&prisma));
        assert!(table.is_data_access_call(&call(Some("this"), Some("query"), vec!["db", "query"])));
        assert!(!table.is_data_access_call(&call(Some("list"), Some("find"), vec!["find"])));
        assert!(!table.is_data_access_call(&call(Some("db"), Some("close"), vec!["close"])));
    }

    #[test]
    fn test_data_access_import() {
        let table = HeuristicTable::default();
        assert!(table.is_data_access_import("@supabase/supabase-js"));
        assert!(table.is_data_access_import("@prisma/client"));
        assert!(!table.is_data_access_import("react"));
    }

    #[test]
    fn test_call_predicates() {
        let table = HeuristicTable::default();
        let safe_parse = call(Some("schema"), Some("safeParse"), vec!["safeParse"]);
        assert!(table.is_validation_call(&safe_parse));
        assert!(table.is_state_call(&call(Some("useState"), None, vec![])));
        assert!(table.is_api_call(&call(Some("fetch"), None, vec![])));
        assert!(table.is_api_call(&call(Some("client"), Some("post"), vec!["post"])));
        assert!(!table.is_api_call(&call(Some("list"), Some("map"), vec!["map"])));
    }

    #[test]
    fn test_name_predicates() {
        let table = HeuristicTable::default();
        assert!(table.is_utility_name("formatDate"));
        assert!(table.is_utility_name("stringUtils"));
        assert!(!table.is_utility_name("Button"));
        assert!(table.is_configuration_name("apiConfig"));
        assert!(table.is_configuration_name("MAX_RETRIES"));
        assert!(table.is_configuration_name("defaultOptions"));
        assert!(!table.is_configuration_name("ID"));
        assert!(!table.is_configuration_name("user"));
    }

    #[test]
    fn test_presence_threshold_modes() {
        let table = HeuristicTable::default();
        assert_eq!(table.presence_threshold(false), 0.3);
        assert_eq!(table.presence_threshold(true), 0.6);
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut table = HeuristicTable::default();
        table.validation.confidence = 1.5;
        let err = table.validate().unwrap_err();
        assert!(err.contains("heuristics.validation"));
    }
}
