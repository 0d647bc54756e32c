//! Module specifier resolution.
//!
//! A relative (`./x`, `../x`) or absolute (`/x`) specifier is joined to the
//! importing file's directory and looked up in the set of scanned files:
//! first as written, then with each source extension, then as a directory
//! index. Bare specifiers (`react`, `@scope/pkg`) are packages and never
//! resolve.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Extensions tried, in order, when the specifier has no exact match.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Resolves `specifier`, imported from `importer`, to a file in `files`.
///
/// Returns `None` for package imports and for paths that match no scanned file.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use archscope::graph::resolve_specifier;
///
/// let files: BTreeSet<String> = ["/app/src/utils/index.ts", "/app/src/api.ts"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// assert_eq!(
///     resolve_specifier("/app/src/main.ts", "./utils", &files).as_deref(),
///     Some("/app/src/utils/index.ts")
/// );
/// assert_eq!(resolve_specifier("/app/src/main.ts", "react", &files), None);
/// ```
pub fn resolve_specifier(
    importer: &str,
    specifier: &str,
    files: &BTreeSet<String>,
) -> Option<String> {
    if !is_path_specifier(specifier) {
        return None;
    }

    let base = Path::new(importer).parent().unwrap_or_else(|| Path::new(""));
    let target = path_key(&base.join(specifier));

    candidates(&target).into_iter().find(|c| files.contains(c))
}

/// Returns true for specifiers that name a path rather than a package.
pub fn is_path_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier == "."
        || specifier == ".."
}

fn candidates(target: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(1 + RESOLVE_EXTENSIONS.len() * 2);
    out.push(target.to_string());
    out.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{}.{}", target, ext)));
    out.extend(
        RESOLVE_EXTENSIONS
            .iter()
            .map(|ext| format!("{}/index.{}", target.trim_end_matches('/'), ext)),
    );
    out
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if at_parent || !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// String key used for graph nodes: the normalized path with `/` separators.
///
/// Scanning `.` yields paths like `./src/a.ts`; they key as `src/a.ts` so
/// they match resolved specifiers.
pub(crate) fn path_key(path: &Path) -> String {
    normalize(path).to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_with_extension() {
        let set = files(&["/p/src/a.ts", "/p/src/b.tsx", "/p/src/c.js", "/p/src/d.jsx"]);
        assert_eq!(resolve_specifier("/p/src/x.ts", "./a", &set).as_deref(), Some("/p/src/a.ts"));
        assert_eq!(resolve_specifier("/p/src/x.ts", "./b", &set).as_deref(), Some("/p/src/b.tsx"));
        assert_eq!(resolve_specifier("/p/src/x.ts", "./c", &set).as_deref(), Some("/p/src/c.js"));
        assert_eq!(resolve_specifier("/p/src/x.ts", "./d", &set).as_deref(), Some("/p/src/d.jsx"));
    }

    #[test]
    fn test_resolve_exact_path_first() {
        let set = files(&["/p/a.js", "/p/a.js.ts"]);
        assert_eq!(resolve_specifier("/p/x.ts", "./a.js", &set).as_deref(), Some("/p/a.js"));
    }

    #[test]
    fn test_resolve_extension_order() {
        let set = files(&["/p/a.ts", "/p/a.js"]);
        assert_eq!(resolve_specifier("/p/x.ts", "./a", &set).as_deref(), Some("/p/a.ts"));
    }

    #[test]
    fn test_resolve_index() {
        let set = files(&["/p/src/components/index.tsx"]);
        assert_eq!(
            resolve_specifier("/p/src/App.tsx", "./components", &set).as_deref(),
            Some("/p/src/components/index.tsx")
        );
    }

    #[test]
    fn test_resolve_parent_directory() {
        let set = files(&["/p/src/lib/db.ts"]);
        assert_eq!(
            resolve_specifier("/p/src/pages/home/index.ts", "../../lib/db", &set).as_deref(),
            Some("/p/src/lib/db.ts")
        );
    }

    #[test]
    fn test_resolve_relative_root() {
        let set = files(&["src/a.ts", "src/b.ts"]);
        assert_eq!(resolve_specifier("src/a.ts", "./b", &set).as_deref(), Some("src/b.ts"));
    }

    #[test]
    fn test_resolve_dot_prefixed_importer() {
        let set = files(&["src/a.ts", "src/b.ts"]);
        assert_eq!(resolve_specifier("./src/a.ts", "./b", &set).as_deref(), Some("src/b.ts"));
    }

    #[test]
    fn test_path_key_strips_current_dir() {
        assert_eq!(path_key(Path::new("./src/a.ts")), "src/a.ts");
        assert_eq!(path_key(Path::new("./src/./lib/../a.ts")), "src/a.ts");
        assert_eq!(path_key(Path::new("/app/src/a.ts")), "/app/src/a.ts");
        assert_eq!(path_key(Path::new("../shared/a.ts")), "../shared/a.ts");
        assert_eq!(path_key(Path::new("../../a.ts")), "../../a.ts");
    }

    #[test]
    fn test_package_specifiers_stay_external() {
        let set = files(&["/p/react.ts"]);
        assert_eq!(resolve_specifier("/p/x.ts", "react", &set), None);
        assert_eq!(resolve_specifier("/p/x.ts", "@scope/pkg", &set), None);
    }

    #[test]
    fn test_unmatched_path_is_none() {
        let set = files(&["/p/a.ts"]);
        assert_eq!(resolve_specifier("/p/x.ts", "./styles.css", &set), None);
    }
}
