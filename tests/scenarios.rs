//! End-to-end scenarios over in-memory and on-disk projects.

use std::fs;
use std::path::Path;

use archscope::analysis::ImportKind;
use archscope::config::AnalyzerConfig;
use archscope::report::{AnalysisSession, IssueType, Severity};
use archscope::responsibility::Category;
use archscope::size::SplitKind;
use archscope::source::MemorySource;

fn session(files: &[(&str, &str)]) -> AnalysisSession<MemorySource> {
    let source = files
        .iter()
        .fold(MemorySource::new(), |s, (path, text)| s.with_file(*path, *text));
    AnalysisSession::with_source(source, AnalyzerConfig::default()).unwrap()
}

fn synthetic(lines: usize) -> String {
    (0..lines).map(|i| format!("const line{} = {};\n", i, i)).collect()
}

// ===== Extraction =====

#[test]
fn test_named_import_statements_yield_one_edge_each() {
    let text =
        "import { a } from './a';\nimport { b, c } from './b';\nimport { d as e } from 'd';\n";
    let mut session = session(&[("/p/main.ts", text)]);
    let analysis = session.analyze_path(Path::new("/p/main.ts")).unwrap();

    let imports = &analysis.facts.imports;
    assert_eq!(imports.len(), 3);
    assert_eq!(
        imports.iter().map(|i| (i.specifier.as_str(), i.line)).collect::<Vec<_>>(),
        vec![("./a", 1), ("./b", 2), ("d", 3)]
    );
    assert!(imports.iter().all(|i| i.kind == ImportKind::Static));
    assert_eq!(imports[2].names(), vec!["e"]);
}

#[test]
fn test_unused_import_precision() {
    let mut session = session(&[("/p/a.ts", "import { a, b } from 'm';\na();\n")]);
    let analysis = session.analyze_path(Path::new("/p/a.ts")).unwrap();
    assert_eq!(analysis.unused_imports, vec!["b from 'm'"]);
}

// ===== Cache =====

#[test]
fn test_reanalyzing_cached_file_is_idempotent() {
    let mut session = session(&[("/p/a.ts", "import { b } from './b';\nexport const a = b;\n")]);

    let first = session.analyze_path(Path::new("/p/a.ts")).cloned().unwrap();
    let reads = session.source().read_count();
    let second = session.analyze_path(Path::new("/p/a.ts")).cloned().unwrap();

    assert_eq!(first, second);
    assert_eq!(session.source().read_count(), reads);
}

// ===== Graph =====

#[test]
fn test_mutual_imports_form_a_cycle() {
    let mut session = session(&[
        ("/p/a.ts", "import { b } from './b';\nexport const a = () => b;\n"),
        ("/p/b.ts", "import { a } from './a';\nexport const b = () => a;\n"),
    ]);
    let report = session.analyze_project(["/p/a.ts", "/p/b.ts"]);

    assert!(report.summary.circular_dependencies >= 1);
    let cycle = &report.cycles[0];
    assert!(cycle.contains("/p/a.ts"));
    assert!(cycle.contains("/p/b.ts"));
    assert!(session.dependency_graph().has_cycles());
}

#[test]
fn test_orphaned_files() {
    let mut session = session(&[
        ("/p/main.ts", "import { helper } from './util';\nhelper();\n"),
        ("/p/util.ts", "export const helper = () => 1;\n"),
        ("/p/scratch.ts", "console.log('scratch');\n"),
    ]);
    let report = session.analyze_project(["/p/main.ts", "/p/util.ts", "/p/scratch.ts"]);

    assert_eq!(report.summary.rankings.orphaned, vec!["/p/main.ts", "/p/scratch.ts"]);
}

// ===== Size =====

#[test]
fn test_size_threshold_boundary() {
    let at = synthetic(400);
    let over = synthetic(401);
    let mut session = session(&[("/p/at.ts", at.as_str()), ("/p/over.ts", over.as_str())]);

    let at = session.analyze_path(Path::new("/p/at.ts")).unwrap();
    assert_eq!(at.size.line_count, 400);
    assert!(!at.size.exceeds_threshold);

    let over = session.analyze_path(Path::new("/p/over.ts")).unwrap();
    assert!(over.size.exceeds_threshold);
    assert!(over.issues.iter().any(|i| i.kind == IssueType::FileTooLarge));
}

#[test]
fn test_450_line_file_gets_generic_split() {
    let text = synthetic(450);
    let mut session = session(&[("/p/constants.ts", text.as_str())]);
    let analysis = session.analyze_path(Path::new("/p/constants.ts")).unwrap();

    assert_eq!(analysis.size.line_count, 450);
    assert!(analysis.size.exceeds_threshold);
    assert!(!analysis.size.splits.is_empty());

    let generic = analysis
        .size
        .splits
        .iter()
        .find(|s| s.kind == SplitKind::Generic)
        .unwrap();
    assert!(generic.description.contains("450 lines"));
}

// ===== Responsibilities =====

#[test]
fn test_supabase_component_has_multiple_responsibilities() {
    let text = r#"import { useState } from 'react';
import { supabase } from './client';

export function PatientList() {
    const [patients, setPatients] = useState([]);
    const load = async () => {
        const { data } = await supabase.from('patients').select();
        setPatients(data);
    };
    return <ul>{patients.map((p) => <li key={p.id}>{p.name}</li>)}</ul>;
}
"#;
    let mut session = session(&[("/p/PatientList.tsx", text)]);
    let analysis = session.analyze_path(Path::new("/p/PatientList.tsx")).unwrap();
    let result = &analysis.responsibilities;

    assert!(result.has(Category::DataAccess));
    assert!(result.has(Category::UiRendering));
    assert!(result.has_multiple_responsibilities);
    assert!(analysis
        .issues
        .iter()
        .any(|i| i.kind == IssueType::MixedConcerns && i.severity == Severity::High));
}

#[test]
fn test_data_access_in_markup_component_is_flagged_at_default_max() {
    let text = "import { supabase } from './client';\n\
        export default function List() { const rows = supabase.from('x').select(); \
        return <div>{rows}</div>; }";
    let mut session = session(&[("/p/List.tsx", text)]);
    let analysis = session.analyze_path(Path::new("/p/List.tsx")).unwrap();
    let result = &analysis.responsibilities;

    assert_eq!(result.labels(), vec!["UI Rendering", "Data Access"]);
    assert!(result.has_multiple_responsibilities);
    assert!(analysis
        .issues
        .iter()
        .any(|i| i.kind == IssueType::MixedConcerns && i.location.line == Some(2)));
}

#[test]
fn test_validation_only_file() {
    let text = r#"import { z } from 'zod';

export const userSchema = z.object({ name: z.string() });

export function validateUser(input: unknown) {
    return userSchema.parse(input);
}
"#;
    let mut session = session(&[("/p/schema.ts", text)]);
    let analysis = session.analyze_path(Path::new("/p/schema.ts")).unwrap();

    assert_eq!(analysis.responsibilities.labels(), vec!["Input Validation"]);
    assert!(!analysis.responsibilities.has_multiple_responsibilities);
}

#[test]
fn test_relative_scan_root_resolves_imports() {
    let mut session = session(&[
        ("./src/a.ts", "import { b } from './b';\nexport const a = () => b;\n"),
        ("./src/b.ts", "import { a } from './a';\nexport const b = () => a;\n"),
        ("./src/main.ts", "import { a } from './a';\na();\n"),
    ]);
    let report = session.analyze_directory(Path::new("."));

    assert_eq!(report.summary.total_files, 3);
    assert_eq!(report.graph.edges.len(), 3);
    assert_eq!(report.cycles.len(), 1);
    assert!(report.cycles[0].contains("src/a.ts"));
    assert!(report.cycles[0].contains("src/b.ts"));
    assert_eq!(report.summary.rankings.orphaned, vec!["src/main.ts"]);

    let main = report.file("src/main.ts").unwrap();
    assert_eq!(main.analysis.facts.imports[0].resolved.as_deref(), Some("src/a.ts"));
}

#[test]
fn test_included_packages_resolve_to_external_nodes() {
    let source = MemorySource::new()
        .with_file("/p/app.ts", "import React from 'react';\nimport { x } from './x';\nReact(x);\n")
        .with_file("/p/x.ts", "export const x = 1;\n");
    let mut config = AnalyzerConfig::default();
    config.dependencies.include_external_deps = true;
    let mut session = AnalysisSession::with_source(source, config).unwrap();
    session.analyze_project(["/p/app.ts", "/p/x.ts"]);

    let result = session.dependency_result(Path::new("/p/app.ts")).unwrap();
    assert_eq!(result.imports[0].resolved.as_deref(), Some("react"));
    assert_eq!(result.imports[1].resolved.as_deref(), Some("/p/x.ts"));
    assert_eq!(result.dependencies, vec!["/p/x.ts", "react"]);
}

// ===== Filesystem =====

#[test]
fn test_analyze_directory_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("components")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules/react")).unwrap();

    fs::write(
        src.join("index.ts"),
        "import { Button } from './components/Button';\nexport { Button };\n",
    )
    .unwrap();
    fs::write(
        src.join("components/Button.tsx"),
        "export function Button() { return <button />; }\n",
    )
    .unwrap();
    fs::write(dir.path().join("node_modules/react/index.js"), "module.exports = {};\n").unwrap();
    fs::write(dir.path().join("README.md"), "# readme\n").unwrap();

    let mut session = AnalysisSession::new(AnalyzerConfig::default()).unwrap();
    let report = session.analyze_directory(dir.path());

    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.graph.edges.len(), 1);
    assert_eq!(report.graph.edges[0].weight, 1);
    assert!(report.skipped.is_empty());
    assert!(report.cycles.is_empty());
}

#[test]
fn test_config_file_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("archscope.toml"),
        "[size]\nthreshold = 5\n\n[responsibilities]\nmax_responsibilities = 1\n",
    )
    .unwrap();
    fs::write(dir.path().join("big.ts"), synthetic(6)).unwrap();

    let config = AnalyzerConfig::discover(dir.path()).unwrap();
    assert_eq!(config.size.threshold, 5);

    let mut session = AnalysisSession::new(config).unwrap();
    let report = session.analyze_directory(dir.path());
    assert_eq!(report.summary.files_exceeding_threshold, 1);
}
