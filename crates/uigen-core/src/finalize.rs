//! Authoritative extraction once a response has finished streaming.
//!
//! Runs once per generation. The result becomes the screen's stored code, so
//! there is no silent fallback: either a component is found or the call
//! fails with [`ParseError::NoCodeFound`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info};

use crate::errors::ParseError;
use crate::markers::{DEFAULT_EXPORT, FENCE, FENCE_TAGS, has_jsx_return};
use crate::name::extract_component_name;

/// Final code and component name for one generation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinalCode {
    /// Trimmed source with fences and surrounding prose removed.
    pub code: String,
    /// Inferred top-level component identifier.
    pub name: String,
}

impl FinalCode {
    fn from_code(code: String) -> Self {
        let name = extract_component_name(&code);
        Self { code, name }
    }
}

static FENCED_BLOCKS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FENCE_TAGS
        .iter()
        .map(|tag| {
            let pattern = format!(r"(?s){FENCE}{}\n(.*?){FENCE}", regex::escape(tag));
            (*tag, Regex::new(&pattern).expect("valid fence regex"))
        })
        .collect()
});

static RAW_CODE_STARTS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        r"(?s)'use client'.*export\s+default\s+.*",
        r"(?s)import\s+.*export\s+default\s+.*",
        r"(?s)export\s+default\s+function\s+\w+.*",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid raw code regex"))
});

/// Markers after which unfenced code is assumed to turn back into prose.
const PROSE_BOUNDARIES: [&str; 5] = [FENCE, "\n\nThis", "\n\nThe", "\n\nI ", "\n\nHere"];

/// Extracts the definitive component code and name from a finished response.
///
/// Fenced blocks are tried first, by tag priority; within the first tag that
/// has any block the longest block wins, since explanatory snippets are
/// nearly always shorter than the component itself. Unfenced code is only
/// considered when no fenced block qualifies.
pub fn finalize(response: &str) -> Result<FinalCode, ParseError> {
    debug!(len = response.len(), "finalizing response");

    if let Some(code) = from_fenced_blocks(response) {
        let result = FinalCode::from_code(code);
        info!(component = %result.name, len = result.code.len(), "found fenced code block");
        return Ok(result);
    }

    if let Some(code) = from_raw_code(response) {
        let result = FinalCode::from_code(code);
        info!(component = %result.name, len = result.code.len(), "found unfenced code");
        return Ok(result);
    }

    let err = ParseError::no_code_found(response);
    error!(preview = %err.preview(), "could not parse code from response");
    Err(err)
}

fn from_fenced_blocks(response: &str) -> Option<String> {
    for (tag, re) in FENCED_BLOCKS.iter() {
        let longest = re
            .captures_iter(response)
            .filter_map(|caps| caps.get(1))
            .map(|body| (body.as_str(), body.as_str().chars().count()))
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
            .map(|(body, _)| body);
        let Some(block) = longest else {
            continue;
        };

        let code = block.trim();
        if looks_like_component(code) {
            return Some(code.to_string());
        }
        debug!(tag, "largest fenced block does not look like a component");
    }
    None
}

fn looks_like_component(code: &str) -> bool {
    code.contains(DEFAULT_EXPORT) || code.contains("function") || code.contains("const")
}

fn from_raw_code(response: &str) -> Option<String> {
    RAW_CODE_STARTS.iter().find_map(|re| {
        let found = re.find(response)?;
        let code = trim_trailing_prose(found.as_str());
        has_jsx_return(code).then(|| code.to_string())
    })
}

fn trim_trailing_prose(code: &str) -> &str {
    PROSE_BOUNDARIES
        .iter()
        .fold(code.trim(), |code, marker| match code.find(marker) {
            Some(idx) if idx > 0 => code[..idx].trim(),
            _ => code,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, body_lines: usize) -> String {
        let mut code = format!("export default function {name}() {{\n  return (\n    <ul>\n");
        for i in 0..body_lines {
            code.push_str(&format!("      <li>row {i}</li>\n"));
        }
        code.push_str("    </ul>\n  );\n}");
        code
    }

    #[test]
    fn fenced_component_with_surrounding_prose() {
        let text = "Here is your component:\n```tsx\n'use client';\nexport default function Foo() { return <div>Hi</div>; }\n```\nLet me know!";
        let result = finalize(text).expect("code found");
        assert_eq!(
            result,
            FinalCode {
                code: "'use client';\nexport default function Foo() { return <div>Hi</div>; }"
                    .into(),
                name: "Foo".into(),
            }
        );
    }

    #[test]
    fn prose_only_is_no_code_found() {
        let err = finalize("I'm not able to generate that right now.").unwrap_err();
        assert_eq!(
            err,
            ParseError::NoCodeFound {
                preview: "I'm not able to generate that right now.".into()
            }
        );
    }

    #[test]
    fn longest_block_of_a_tag_wins() {
        let snippet = component("Snippet", 6);
        let main = component("MainScreen", 76);
        let text = format!(
            "First a small example:\n```jsx\n{snippet}\n```\nAnd the full screen:\n```jsx\n{main}\n```\n"
        );
        let result = finalize(&text).expect("code found");
        assert_eq!(result.name, "MainScreen");
        assert_eq!(result.code, main);
    }

    #[test]
    fn longest_block_is_measured_in_characters() {
        let ascii = "const items = [1, 2, 3, 4];";
        let wide = "const 東東東東東東東東東東";
        assert!(wide.len() > ascii.len());
        let text = format!("```tsx\n{wide}\n```\n```tsx\n{ascii}\n```");
        assert_eq!(finalize(&text).expect("code found").code, ascii);
    }

    #[test]
    fn tag_priority_beats_occurrence_order_and_length() {
        let tagged = component("Tagged", 2);
        let untagged = component("Untagged", 40);
        let text = format!("```\n{untagged}\n```\n\n```tsx\n{tagged}\n```");
        let result = finalize(&text).expect("code found");
        assert_eq!(result.name, "Tagged");
    }

    #[test]
    fn non_component_block_falls_through_to_next_tag() {
        let main = component("Dashboard", 3);
        let text = format!("```tsx\n<div />\n```\n\n```js\n{main}\n```");
        let result = finalize(&text).expect("code found");
        assert_eq!(result.name, "Dashboard");
    }

    #[test]
    fn raw_code_from_client_directive_trims_prose() {
        let text = "'use client';\n\nexport default function Plain() {\n  return <div>plain</div>;\n}\n\nThis component renders a div.";
        let result = finalize(text).expect("code found");
        assert_eq!(
            result.code,
            "'use client';\n\nexport default function Plain() {\n  return <div>plain</div>;\n}"
        );
        assert_eq!(result.name, "Plain");
    }

    #[test]
    fn raw_code_stops_at_stray_fence() {
        let text = "'use client';\nexport default function Link() { return <a/>; }\n```\ntrailing";
        let result = finalize(text).expect("code found");
        assert_eq!(result.code, "'use client';\nexport default function Link() { return <a/>; }");
    }

    #[test]
    fn raw_code_stops_at_explanations() {
        let body = "'use client';\n\nexport default function Bold() {\n  return <b>bold</b>;\n}";
        for tail in ["\n\nThe button is bold.", "\n\nI used a <b> tag."] {
            let result = finalize(&format!("{body}{tail}")).expect("code found");
            assert_eq!(result.code, body);
        }
    }

    #[test]
    fn directive_after_default_export_falls_through_to_bare_function() {
        let text = "export default function Late() { return <i/>; }\n\nThis file omits 'use client'.";
        let result = finalize(text).expect("code found");
        assert_eq!(result.code, "export default function Late() { return <i/>; }");
        assert_eq!(result.name, "Late");
    }

    #[test]
    fn directive_without_later_export_falls_through_to_import() {
        let text = "import { Fragment } from 'react';\nexport default function Mid() { return <Fragment />; }\n'use client';";
        let result = finalize(text).expect("code found");
        assert!(result.code.starts_with("import { Fragment }"));
        assert_eq!(result.name, "Mid");
    }

    #[test]
    fn raw_code_from_import() {
        let text = "import { useState } from 'react';\n\nfunction Toggle() {\n  const [on, setOn] = useState(false);\n  return <button onClick={() => setOn(!on)}>{String(on)}</button>;\n}\n\nexport default Toggle;\n\nHere is how it works.";
        let result = finalize(text).expect("code found");
        assert!(result.code.ends_with("export default Toggle;"));
        assert_eq!(result.name, "Toggle");
    }

    #[test]
    fn raw_default_function_without_directive() {
        let text = "Sure.\nexport default function Bare() { return <span />; }";
        let result = finalize(text).expect("code found");
        assert_eq!(result.code, "export default function Bare() { return <span />; }");
        assert_eq!(result.name, "Bare");
    }

    #[test]
    fn raw_code_without_jsx_is_rejected() {
        let text = "import fs from 'fs';\nexport default function load() { return fs; }";
        assert!(matches!(finalize(text), Err(ParseError::NoCodeFound { .. })));
    }

    #[test]
    fn arrow_component_without_start_marker_is_not_found() {
        // Nothing anchors the unfenced strategies: no directive, no import and
        // no `export default function`.
        let text = "const Baz = () => { return <p>hi</p>; }; export default Baz;";
        assert!(matches!(finalize(text), Err(ParseError::NoCodeFound { .. })));
        assert_eq!(extract_component_name(text), "Baz");
    }

    #[test]
    fn finalize_is_idempotent() {
        let text = format!("Intro\n```tsx\n{}\n```", component("Stable", 4));
        assert_eq!(finalize(&text), finalize(&text));
    }

    #[test]
    fn final_code_serializes_as_code_and_name() {
        let result = FinalCode::from_code("export default function Foo() {}".into());
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["name"], "Foo");
        assert_eq!(value["code"], "export default function Foo() {}");
    }
}
