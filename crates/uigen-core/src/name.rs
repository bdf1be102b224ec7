//! Component name inference.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markers::{DEFAULT_EXPORT, FALLBACK_COMPONENT_NAME};

static DEFAULT_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\s+function\s+(\w+)").expect("valid regex"));

static FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s+(\w+)\s*\([^)]*\)\s*\{").expect("valid regex"));

static CONST_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"const\s+(\w+)\s*=").expect("valid regex"));

static DEFAULT_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\s+(\w+)").expect("valid regex"));

static TRAILING_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)export\s+default\s+(\w+)\s*;?\s*$").expect("valid regex"));

/// Infers the top-level component identifier of `code`.
///
/// Authoring styles are tried from most to least reliable:
///
/// 1. `export default function Name`
/// 2. `function Name(..) {` followed later by `export default Name`
/// 3. `const Name =` anywhere, provided the code has a default export
/// 4. a line ending in `export default Name` (`;` optional)
///
/// Falls back to [`FALLBACK_COMPONENT_NAME`].
pub fn extract_component_name(code: &str) -> String {
    infer_component_name(code)
        .unwrap_or(FALLBACK_COMPONENT_NAME)
        .to_string()
}

/// Like [`extract_component_name`] but reports a miss instead of falling back.
pub fn infer_component_name(code: &str) -> Option<&str> {
    if let Some(name) = capture(&DEFAULT_FUNCTION, code) {
        return Some(name);
    }
    if let Some(name) = function_later_defaulted(code) {
        return Some(name);
    }
    if code.contains(DEFAULT_EXPORT)
        && let Some(name) = capture(&CONST_DECL, code)
    {
        return Some(name);
    }
    capture(&TRAILING_DEFAULT, code).filter(|name| *name != "function")
}

fn capture<'a>(re: &Regex, code: &'a str) -> Option<&'a str> {
    re.captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First declared function whose name is default-exported somewhere after
/// its opening brace. The exported identifier only has to start with the
/// function's name.
fn function_later_defaulted(code: &str) -> Option<&str> {
    FUNCTION_DECL.captures_iter(code).find_map(|caps| {
        let decl = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        DEFAULT_IDENT
            .captures_iter(&code[decl.end()..])
            .filter_map(|export| export.get(1))
            .any(|ident| ident.as_str().starts_with(name))
            .then_some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_default_function() {
        let code = "'use client';\nexport default function Foo() { return <div>Hi</div>; }";
        assert_eq!(extract_component_name(code), "Foo");
    }

    #[test]
    fn function_then_default_export() {
        let code = "function helper() { return 1; }\nfunction Screen(props) {\n  return <main />;\n}\n\nexport default Screen;";
        assert_eq!(extract_component_name(code), "Screen");
    }

    #[test]
    fn default_export_before_declaration_does_not_count() {
        let code = "export default Screen;\nfunction Screen() {\n  return <main />;\n}";
        assert_eq!(extract_component_name(code), "Screen");
        assert_eq!(function_later_defaulted(code), None);
    }

    #[test]
    fn later_default_export_is_matched_per_function() {
        let code = "function Row() { return <tr />; }\nfunction Table() {\n  return <table />;\n}\nexport default function\nexport default Table;";
        assert_eq!(function_later_defaulted(code), Some("Table"));
    }

    #[test]
    fn const_declaration_with_default_export() {
        let code = "const Baz = () => { return <p>hi</p>; }; export default Baz;";
        assert_eq!(extract_component_name(code), "Baz");
    }

    #[test]
    fn const_declaration_without_default_export_falls_back() {
        let code = "const Baz = () => <p>hi</p>;";
        assert_eq!(extract_component_name(code), FALLBACK_COMPONENT_NAME);
    }

    #[test]
    fn const_rule_takes_first_const_even_if_not_exported() {
        let code = "const items = [];\nconst List = () => <ul />;\nexport default List;";
        assert_eq!(extract_component_name(code), "items");
    }

    #[test]
    fn trailing_default_identifier() {
        let code = "class Panel extends React.Component {\n  render() { return <div />; }\n}\nexport default Panel;\n";
        assert_eq!(extract_component_name(code), "Panel");
    }

    #[test]
    fn anonymous_default_function_falls_back() {
        let code = "export default function () {\n  return <div />;\n}";
        assert_eq!(extract_component_name(code), FALLBACK_COMPONENT_NAME);
        assert_eq!(infer_component_name(code), None);
    }
}
