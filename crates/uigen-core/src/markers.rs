//! Literal markers shared by the extraction, readiness and finalize passes.

/// Markdown code fence delimiter.
pub const FENCE: &str = "```";

/// Fence language hints in lookup order.
///
/// Specific tags come before the bare fence: a ```` ```tsx ```` opener is far
/// less likely to be an illustrative snippet than an untagged one. The empty
/// tag is the untagged fence.
pub const FENCE_TAGS: [&str; 7] = ["tsx", "typescript", "jsx", "javascript", "ts", "js", ""];

/// React client directive that generated components usually start with.
pub const CLIENT_DIRECTIVE: &str = "'use client'";

/// Import keyword as it appears at the start of an import statement.
pub const IMPORT_KEYWORD: &str = "import ";

/// Default-export keyword pair a finished component must contain.
pub const DEFAULT_EXPORT: &str = "export default";

/// Identifier used when no component name can be inferred.
pub const FALLBACK_COMPONENT_NAME: &str = "GeneratedScreen";

/// Opening fence line for `tag`, including the trailing newline.
pub fn opening_fence(tag: &str) -> String {
    format!("{FENCE}{tag}\n")
}

/// True when `code` carries both a `return` keyword and a `<`, the cheap
/// signal that a JSX return has been emitted.
pub fn has_jsx_return(code: &str) -> bool {
    code.contains("return") && code.contains('<')
}
