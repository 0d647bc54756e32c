//! Single-pass responsibility classification.
//!
//! Every node of the tree is mapped to a [`NodeShape`] and tested against the
//! category predicates in [`Category::ALL`] order. Each match becomes a
//! [`ResponsibilityIndicator`]. Indicators are then grouped by category to
//! decide which responsibilities are present.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::category::{Category, ResponsibilityIndicator};
use super::rules::HeuristicTable;
use crate::config::ResponsibilityConfig;
use crate::report::{
    Effort, Issue, IssueType, Location, Recommendation, RecommendationType, Severity,
};
use crate::syntax::{walk_tree, NodeShape, ParsedSource, Visit};

/// Classification of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponsibilityResult {
    pub file: String,
    /// Present categories, in [`Category::ALL`] order.
    pub responsibilities: Vec<Category>,
    pub has_multiple_responsibilities: bool,
    /// Overall confidence in `[0, 1]`.
    pub confidence: f64,
    pub indicators: Vec<ResponsibilityIndicator>,
    /// Separation suggestions, one per present category, when the file has
    /// too many responsibilities.
    pub suggestions: Vec<String>,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

impl ResponsibilityResult {
    /// Empty result for a file that could not be parsed, with one low issue.
    pub fn parse_failure(file: &str, reason: &str) -> Self {
        Self {
            file: file.to_string(),
            issues: vec![Issue::new(
                IssueType::ParseFailure,
                Severity::Low,
                format!("Could not classify responsibilities: {}", reason),
                Location::file(file),
            )],
            ..Self::default()
        }
    }

    /// Labels of the present categories.
    pub fn labels(&self) -> Vec<&'static str> {
        self.responsibilities.iter().map(|c| c.label()).collect()
    }

    pub fn has(&self, category: Category) -> bool {
        self.responsibilities.contains(&category)
    }
}

/// Classifies the responsibilities of parsed files.
#[derive(Debug, Clone)]
pub struct ResponsibilityClassifier {
    config: ResponsibilityConfig,
    table: HeuristicTable,
}

impl Default for ResponsibilityClassifier {
    fn default() -> Self {
        Self::new(ResponsibilityConfig::default(), HeuristicTable::default())
    }
}

impl ResponsibilityClassifier {
    pub fn new(config: ResponsibilityConfig, table: HeuristicTable) -> Self {
        Self { config, table }
    }

    /// Classifies one parsed file.
    pub fn classify(&self, parsed: &ParsedSource<'_>, file: &str) -> ResponsibilityResult {
        let indicators = self.collect_indicators(parsed);
        let mut result = self.aggregate(file, indicators);

        debug!(
            "{}: {} indicators, responsibilities [{}]",
            file,
            result.indicators.len(),
            result.labels().join(", ")
        );

        result.issues = self.issues(&result);
        if result.has_multiple_responsibilities {
            result.recommendations = result
                .responsibilities
                .iter()
                .map(|&c| separation_template(c))
                .collect();
            result.suggestions = result
                .recommendations
                .iter()
                .map(|r| r.description.clone())
                .collect();
        }
        result
    }

    /// Walks the tree once and tests each node against the predicates.
    pub fn collect_indicators(&self, parsed: &ParsedSource<'_>) -> Vec<ResponsibilityIndicator> {
        let heuristics = self.config.enable_heuristics;
        let table = &self.table;
        let mut indicators = Vec::new();

        walk_tree(parsed.root(), |node| {
            let position = node.start_position();
            let mut emit = |category: Category, description: String, evidence: Vec<String>| {
                indicators.push(ResponsibilityIndicator {
                    category,
                    description,
                    line: position.row + 1,
                    column: position.column + 1,
                    confidence: table.confidence(category),
                    evidence,
                });
            };

            match NodeShape::of(node, parsed) {
                NodeShape::Markup { tag } => {
                    let tag = tag.unwrap_or("fragment");
                    emit(
                        Category::UiRendering,
                        format!("Renders <{}>", tag),
                        vec!["jsx".to_string(), format!("tag:{}", tag)],
                    );
                }
                NodeShape::Call(call) => {
                    let callee = call.callee().unwrap_or("");
                    if table.is_data_access_call(&call) {
                        emit(
                            Category::DataAccess,
                            format!("Data access call chain {}", chain_text(&call)),
                            vec!["call-chain".to_string(), chain_text(&call)],
                        );
                    }
                    if table.is_validation_call(&call) {
                        emit(
                            Category::Validation,
                            format!("Validation call {}()", callee),
                            vec!["call".to_string(), callee.to_string()],
                        );
                    }
                    if table.is_state_call(&call) {
                        emit(
                            Category::StateManagement,
                            format!("State hook {}()", callee),
                            vec!["hook".to_string(), callee.to_string()],
                        );
                    }
                    if table.is_api_call(&call) {
                        emit(
                            Category::ApiCommunication,
                            format!("API call {}", chain_text(&call)),
                            vec!["call".to_string(), chain_text(&call)],
                        );
                    }
                }
                NodeShape::Function { name, branches } => {
                    if let Some(name) = name.filter(|n| heuristics && table.is_handler_name(n)) {
                        emit(
                            Category::UiInteraction,
                            format!("Event handler {}", name),
                            vec!["handler".to_string(), name.to_string()],
                        );
                    }
                    if table.is_business_logic(branches) {
                        emit(
                            Category::BusinessLogic,
                            format!(
                                "Function {} has {} branches",
                                name.unwrap_or("<anonymous>"),
                                branches
                            ),
                            vec!["branches".to_string(), branches.to_string()],
                        );
                    }
                    if let Some(name) = name.filter(|n| heuristics && table.is_utility_name(n)) {
                        emit(
                            Category::Utility,
                            format!("Helper function {}", name),
                            vec!["name".to_string(), name.to_string()],
                        );
                    }
                }
                NodeShape::Property { name } => {
                    if heuristics && table.is_handler_name(name) {
                        emit(
                            Category::UiInteraction,
                            format!("Handler property {}", name),
                            vec!["handler".to_string(), name.to_string()],
                        );
                    }
                }
                NodeShape::Binding { name } => {
                    if heuristics && table.is_handler_name(name) {
                        emit(
                            Category::UiInteraction,
                            format!("Event handler {}", name),
                            vec!["handler".to_string(), name.to_string()],
                        );
                    }
                    if heuristics && table.is_utility_name(name) {
                        emit(
                            Category::Utility,
                            format!("Helper {}", name),
                            vec!["name".to_string(), name.to_string()],
                        );
                    }
                    if heuristics && table.is_configuration_name(name) {
                        emit(
                            Category::Configuration,
                            format!("Configuration value {}", name),
                            vec!["name".to_string(), name.to_string()],
                        );
                    }
                }
                NodeShape::Import { source } => {
                    if table.is_data_access_import(source) {
                        emit(
                            Category::DataAccess,
                            format!("Imports data client {}", source),
                            vec!["import".to_string(), source.to_string()],
                        );
                    }
                }
                NodeShape::Other => {}
            }
            Visit::Continue
        });

        indicators
    }

    /// Groups indicators into present categories and an overall confidence.
    fn aggregate(
        &self,
        file: &str,
        indicators: Vec<ResponsibilityIndicator>,
    ) -> ResponsibilityResult {
        let threshold = self.table.presence_threshold(self.config.strict_mode);

        let mut by_category: BTreeMap<Category, (usize, f64)> = BTreeMap::new();
        for indicator in &indicators {
            let entry = by_category.entry(indicator.category).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += indicator.confidence;
        }

        let responsibilities: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|category| {
                by_category.get(category).is_some_and(|&(count, total)| {
                    let average = total / count as f64;
                    count as f64 * average > threshold
                })
            })
            .collect();

        let confidence = if indicators.is_empty() {
            0.0
        } else {
            let count = indicators.len() as f64;
            let average = indicators.iter().map(|i| i.confidence).sum::<f64>() / count;
            let bonus = (count / 10.0).min(self.table.max_diversity_bonus);
            (average + bonus).clamp(0.0, 1.0)
        };

        // UI and data access together always count, whatever the max
        let mixed = responsibilities.contains(&Category::UiRendering)
            && responsibilities.contains(&Category::DataAccess);
        let has_multiple_responsibilities =
            mixed || responsibilities.len() > self.config.max_responsibilities;

        ResponsibilityResult {
            file: file.to_string(),
            has_multiple_responsibilities,
            responsibilities,
            confidence,
            indicators,
            ..ResponsibilityResult::default()
        }
    }

    fn issues(&self, result: &ResponsibilityResult) -> Vec<Issue> {
        let mut issues = Vec::new();
        // mixed-concern issues point at the first offending indicator
        let first_of = |category: Category| {
            result
                .indicators
                .iter()
                .find(|i| i.category == category)
                .map(|i| Location::at(&result.file, i.line, i.column))
                .unwrap_or_else(|| Location::file(&result.file))
        };

        if result.has(Category::UiRendering) && result.has(Category::DataAccess) {
            issues.push(Issue::new(
                IssueType::MixedConcerns,
                Severity::High,
                "UI should not handle data access directly; move queries into a service or hook",
                first_of(Category::DataAccess),
            ));
        }
        if result.has(Category::BusinessLogic) && result.has(Category::UiRendering) {
            issues.push(Issue::new(
                IssueType::MixedConcerns,
                Severity::Medium,
                "Business logic is mixed with UI rendering",
                first_of(Category::BusinessLogic),
            ));
        }
        if result.responsibilities.len() > self.config.max_responsibilities {
            issues.push(Issue::new(
                IssueType::MultipleResponsibilities,
                Severity::Medium,
                format!(
                    "File has {} responsibilities (max {}): {}",
                    result.responsibilities.len(),
                    self.config.max_responsibilities,
                    result.labels().join(", ")
                ),
                Location::file(&result.file),
            ));
        }
        issues
    }
}

fn chain_text(call: &crate::syntax::CallShape<'_>) -> String {
    call.root
        .into_iter()
        .chain(call.chain.iter().copied())
        .collect::<Vec<_>>()
        .join(".")
}

/// Fixed recommendation for moving one category out of a mixed file.
fn separation_template(category: Category) -> Recommendation {
    let kind = RecommendationType::ExtractResponsibility;
    match category {
        Category::UiRendering => Recommendation::new(
            kind,
            5,
            "Keep presentational markup in dedicated components",
            Effort::Medium,
        )
        .with_benefits(&["Reusable components", "Simpler rendering tests"])
        .with_risks(&["More props passed between components"]),
        Category::UiInteraction => Recommendation::new(
            kind,
            4,
            "Move event handlers into a custom hook",
            Effort::Low,
        )
        .with_benefits(&["Handlers testable without rendering"])
        .with_risks(&["Extra hook indirection"]),
        Category::BusinessLogic => Recommendation::new(
            kind,
            8,
            "Extract business rules into a service module",
            Effort::Medium,
        )
        .with_benefits(&["Rules testable in isolation", "Reuse across screens"])
        .with_risks(&["Callers need updating"]),
        Category::DataAccess => Recommendation::new(
            kind,
            9,
            "Extract data access into a repository/service layer",
            Effort::Medium,
        )
        .with_benefits(&["Single place for queries", "Data source can be mocked in tests"])
        .with_risks(&["Added indirection"]),
        Category::Validation => Recommendation::new(
            kind,
            6,
            "Move validation schemas into a dedicated validation module",
            Effort::Low,
        )
        .with_benefits(&["Schemas shared between client and server"])
        .with_risks(&["Low risk"]),
        Category::StateManagement => Recommendation::new(
            kind,
            6,
            "Move state handling into a custom hook or store",
            Effort::Medium,
        )
        .with_benefits(&["State logic reusable and testable"])
        .with_risks(&["Component and hook must stay in sync"]),
        Category::ApiCommunication => Recommendation::new(
            kind,
            8,
            "Wrap API calls in an API client module",
            Effort::Medium,
        )
        .with_benefits(&["Central error handling and retries", "Endpoints easy to mock"])
        .with_risks(&["Added indirection"]),
        Category::Utility => Recommendation::new(
            kind,
            3,
            "Move helper functions into a utils module",
            Effort::Low,
        )
        .with_benefits(&["Helpers reusable across files"])
        .with_risks(&["Low risk"]),
        Category::Configuration => Recommendation::new(
            kind,
            3,
            "Move constants and configuration into a config module",
            Effort::Low,
        )
        .with_benefits(&["Settings changed in one place"])
        .with_risks(&["Low risk"]),
        Category::Testing => Recommendation::new(
            kind,
            2,
            "Keep test helpers out of production modules",
            Effort::Low,
        )
        .with_benefits(&["Smaller production bundle"])
        .with_risks(&["Low risk"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;
    use std::path::Path;

    fn classify_with(
        source: &str,
        file: &str,
        config: ResponsibilityConfig,
    ) -> ResponsibilityResult {
        let mut parser = SourceParser::new().unwrap();
        let parsed = parser.parse_file(source, Path::new(file)).unwrap();
        ResponsibilityClassifier::new(config, HeuristicTable::default()).classify(&parsed, file)
    }

    fn classify(source: &str, file: &str) -> ResponsibilityResult {
        classify_with(source, file, ResponsibilityConfig::default())
    }

    // ===== Predicates =====

    #[test]
    fn test_ui_rendering_from_jsx() {
        let result = classify("export const Title = () => <h1>Hello</h1>;", "Title.tsx");

        assert_eq!(result.labels(), vec!["UI Rendering"]);
        let indicator = &result.indicators[0];
        assert_eq!(indicator.category, Category::UiRendering);
        assert_eq!(indicator.line, 1);
        assert_eq!(indicator.confidence, 0.9);
        assert!(indicator.evidence.contains(&"tag:h1".to_string()));
    }

    #[test]
    fn test_business_logic_needs_two_branches() {
        let one = classify("function f(x) { if (x) { return 1; } return 0; }", "a.js");
        assert!(!one.has(Category::BusinessLogic));

        let two = classify(
            "function price(items) { let t = 0; for (const i of items) { if (i.sale) { t += 1; } } return t; }",
            "a.js",
        );
        assert!(two.has(Category::BusinessLogic));
    }

    #[test]
    fn test_state_and_handlers() {
        let source = r#"
export function Counter() {
    const [count, setCount] = useState(0);
    const handleClick = () => setCount(count + 1);
    return <button onClick={handleClick}>{count}</button>;
}
"#;
        let result = classify(source, "Counter.jsx");

        assert!(result.has(Category::StateManagement));
        assert!(result.has(Category::UiInteraction));
        assert!(result.has(Category::UiRendering));
        assert!(result.has_multiple_responsibilities);
    }

    #[test]
    fn test_api_communication() {
        let source = r#"
export async function loadUsers() {
    const res = await fetch('/api/users');
    return axios.post('/api/log', { ok: res.ok });
}
"#;
        let result = classify(source, "users.ts");
        let api: Vec<_> = result
            .indicators
            .iter()
            .filter(|i| i.category == Category::ApiCommunication)
            .collect();
        assert_eq!(api.len(), 2);
        assert_eq!(result.labels(), vec!["API Communication"]);
    }

    #[test]
    fn test_configuration_names() {
        let result = classify(
            "export const MAX_RETRIES = 3;\nexport const apiConfig = {};",
            "config.ts",
        );
        assert_eq!(result.labels(), vec!["Configuration"]);
        assert_eq!(result.indicators.len(), 2);
    }

    #[test]
    fn test_data_access_import() {
        let result = classify("import { PrismaClient } from '@prisma/client';", "db.ts");
        assert_eq!(result.labels(), vec!["Data Access"]);
    }

    #[test]
    fn test_heuristics_disabled_skips_name_predicates() {
        let config = ResponsibilityConfig {
            enable_heuristics: false,
            ..ResponsibilityConfig::default()
        };
        let result = classify_with(
            "export const MAX_SIZE = 3;\nexport function formatDate(d) { return d; }",
            "x.ts",
            config,
        );
        assert!(result.responsibilities.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    // ===== Aggregation =====

    #[test]
    fn test_ui_with_data_access_is_mixed() {
        let source = r#"
export function Patients() {
    const load = async () => {
        const { data } = await supabase.from('patients').select();
        return data;
    };
    return <div>{load}</div>;
}
"#;
        let result = classify(source, "Patients.tsx");

        assert!(result.labels().contains(&"Data Access"));
        assert!(result.labels().contains(&"UI Rendering"));
        let mixed = result
            .issues
            .iter()
            .find(|i| i.kind == IssueType::MixedConcerns)
            .unwrap();
        assert_eq!(mixed.severity, Severity::High);
        // points at the supabase chain
        assert_eq!(mixed.location.line, Some(4));
        assert!(mixed.location.column.is_some());
    }

    #[test]
    fn test_ui_with_data_access_is_multiple_at_default_max() {
        let source = "import { supabase } from './client';\n\
            export default function List() { const rows = supabase.from('x').select(); \
            return <div>{rows}</div>; }";
        let result = classify(source, "List.tsx");

        assert_eq!(result.labels(), vec!["UI Rendering", "Data Access"]);
        assert!(result.has_multiple_responsibilities);
        assert_eq!(result.recommendations.len(), 2);
        // two categories do not exceed the max of 2
        assert!(!result
            .issues
            .iter()
            .any(|i| i.kind == IssueType::MultipleResponsibilities));
        let mixed = result
            .issues
            .iter()
            .find(|i| i.kind == IssueType::MixedConcerns)
            .unwrap();
        assert_eq!(mixed.location.line, Some(2));
    }

    #[test]
    fn test_two_unrelated_categories_are_not_multiple() {
        let source = "export const API_URL = 'https://example.com';\n\
            export const Title = () => <h1>Hi</h1>;";
        let result = classify(source, "Title.tsx");

        assert_eq!(result.labels(), vec!["UI Rendering", "Configuration"]);
        assert!(!result.has_multiple_responsibilities);
        assert!(result.recommendations.is_empty());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_multiple_responsibilities_over_max() {
        let source = r#"
import { createClient } from '@supabase/supabase-js';
export const API_URL = 'https://example.com';
export function UserList() {
    const [users, setUsers] = useState([]);
    return <ul>{users}</ul>;
}
"#;
        let result = classify(source, "UserList.tsx");

        assert!(result.responsibilities.len() > 2);
        assert!(result.has_multiple_responsibilities);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == IssueType::MultipleResponsibilities
                && i.severity == Severity::Medium));
        assert_eq!(result.recommendations.len(), result.responsibilities.len());
        assert_eq!(result.suggestions.len(), result.responsibilities.len());

        let data = result
            .recommendations
            .iter()
            .find(|r| r.description.contains("repository"))
            .unwrap();
        assert_eq!(data.priority, 9);
    }

    #[test]
    fn test_raising_max_clears_flag() {
        let source = "export const MAX = 1;\nexport const App = () => <div onClick={go} />;";
        let strict_max = classify(source, "a.tsx");
        assert!(strict_max.has_multiple_responsibilities);

        let config = ResponsibilityConfig {
            max_responsibilities: 3,
            ..ResponsibilityConfig::default()
        };
        let relaxed = classify_with(source, "a.tsx", config);
        assert!(!relaxed.has_multiple_responsibilities);
        assert!(relaxed.recommendations.is_empty());
    }

    #[test]
    fn test_strict_mode_raises_presence_threshold() {
        // one utility indicator scores 0.6: present normally, absent in strict mode
        let source = "export function formatName(n) { return n; }";
        assert_eq!(classify(source, "a.ts").labels(), vec!["Utility Functions"]);

        let config = ResponsibilityConfig {
            strict_mode: true,
            ..ResponsibilityConfig::default()
        };
        assert!(classify_with(source, "a.ts", config).responsibilities.is_empty());
    }

    #[test]
    fn test_overall_confidence_bonus_capped() {
        let items: String = (0..30).map(|i| format!("<li key=\"{}\" />", i)).collect();
        let source = format!("export const L = () => <ul>{}</ul>;", items);
        let result = classify(&source, "List.jsx");

        // every indicator is 0.9; bonus capped at 0.2
        assert_eq!(result.confidence, 1.0);

        let single = classify("export const T = () => <p />;", "T.jsx");
        assert!((single.confidence - 1.0).abs() < 1e-9);

        let config = classify("export const DEFAULT_PAGE = 1;", "c.ts");
        assert!((config.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_parse_failure_result() {
        let result = ResponsibilityResult::parse_failure("a.css", "Unsupported file type: css");
        assert!(result.responsibilities.is_empty());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueType::ParseFailure);
        assert_eq!(result.issues[0].severity, Severity::Low);
    }
}
