//! Sandbox entry-file preparation.

use crate::markers::{CLIENT_DIRECTIVE, FENCE};
use crate::readiness::is_render_ready;

/// Code shorter than this is never sent to the sandbox.
const MIN_RENDER_CHARS: usize = 50;

/// Path of the entry file the sandbox mounts the component from.
pub const APP_ENTRY_PATH: &str = "/App.tsx";

/// Builds the sandbox entry file for `code`.
///
/// Leftover fence lines are stripped first. While a generation is still
/// streaming the code must also pass [`is_render_ready`]; stored screens are
/// rendered as-is. Returns `None` when nothing should be rendered.
pub fn prepare_app_source(code: &str, generating: bool) -> Option<String> {
    if code.chars().count() < MIN_RENDER_CHARS {
        return None;
    }

    let code = strip_fences(code);
    if generating && !is_render_ready(code) {
        return None;
    }

    let directive = if code.contains(CLIENT_DIRECTIVE) {
        String::new()
    } else {
        format!("{CLIENT_DIRECTIVE};")
    };
    Some(format!("\nimport './styles.css';\n{directive}\n{code}\n"))
}

fn strip_fences(code: &str) -> &str {
    let mut code = code;
    if code.starts_with(FENCE)
        && let Some(newline) = code.find('\n')
    {
        code = &code[newline + 1..];
    }
    if code.ends_with(FENCE)
        && let Some(idx) = code.rfind(FENCE)
    {
        code = &code[..idx];
    }
    code.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = "export default function Panel() {\n  const title = 'Quarterly overview';\n  return <section>{title}</section>;\n}";

    #[test]
    fn short_code_is_not_rendered() {
        assert_eq!(prepare_app_source("export default 1;", false), None);
    }

    #[test]
    fn adds_client_directive_when_missing() {
        let source = prepare_app_source(COMPONENT, false).expect("source");
        assert!(source.starts_with("\nimport './styles.css';\n'use client';\n"));
        assert!(source.contains(COMPONENT));
    }

    #[test]
    fn keeps_existing_client_directive() {
        let code = format!("'use client';\n{COMPONENT}");
        let source = prepare_app_source(&code, false).expect("source");
        assert_eq!(source.matches(CLIENT_DIRECTIVE).count(), 1);
    }

    #[test]
    fn strips_leftover_fences() {
        let fenced = format!("```tsx\n{COMPONENT}\n```");
        let source = prepare_app_source(&fenced, true).expect("source");
        assert!(!source.contains(FENCE));
        assert!(source.ends_with(&format!("{COMPONENT}\n")));
    }

    #[test]
    fn streaming_code_must_be_ready() {
        let truncated = &COMPONENT[..COMPONENT.len() - 2];
        assert_eq!(prepare_app_source(truncated, true), None);
        assert!(prepare_app_source(truncated, false).is_some());
    }
}
