//! Maps sandbox render errors to user-facing explanations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderErrorKind {
    MissingPackage,
    Syntax,
    Reference,
    InfiniteLoop,
    Network,
    Unknown,
}

/// Explanation shown to the user when a rendered screen throws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderDiagnosis {
    pub kind: RenderErrorKind,
    pub title: String,
    pub suggestion: String,
}

impl RenderDiagnosis {
    fn new(kind: RenderErrorKind, title: &str, suggestion: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            suggestion: suggestion.into(),
        }
    }
}

/// Classifies the message a sandbox reported when rendering failed.
pub fn diagnose(message: &str) -> RenderDiagnosis {
    let lower = message.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|needle| lower.contains(needle));

    if mentions(&["could not find dependency", "cannot find module"]) {
        let package = QUOTED
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map_or("a package", |m| m.as_str());
        return RenderDiagnosis::new(
            RenderErrorKind::MissingPackage,
            "Missing Package",
            format!(
                "The component tried to use \"{package}\" which isn't available. Try asking for an alternative approach that uses the built-in libraries."
            ),
        );
    }
    if mentions(&["syntaxerror", "unexpected token"]) {
        return RenderDiagnosis::new(
            RenderErrorKind::Syntax,
            "Syntax Error",
            "There was a problem with the generated code syntax. Try regenerating or simplifying your request.",
        );
    }
    if mentions(&["is not defined", "is not a function"]) {
        return RenderDiagnosis::new(
            RenderErrorKind::Reference,
            "Reference Error",
            "Something in the code wasn't properly defined. Try regenerating the component.",
        );
    }
    if mentions(&["maximum call stack", "too much recursion"]) {
        return RenderDiagnosis::new(
            RenderErrorKind::InfiniteLoop,
            "Infinite Loop Detected",
            "The component got stuck in an infinite loop. Try regenerating with a simpler design.",
        );
    }
    if mentions(&["network", "fetch"]) {
        return RenderDiagnosis::new(
            RenderErrorKind::Network,
            "Network Error",
            "There was a problem loading resources. Check your internet connection and try again.",
        );
    }
    RenderDiagnosis::new(
        RenderErrorKind::Unknown,
        "Something Went Wrong",
        "The component couldn't be rendered. Try modifying your request or regenerating.",
    )
}
