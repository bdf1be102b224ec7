use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;

/// Reads a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_file_contents() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "```tsx\nexport default function A() {{}}\n```").unwrap();
        let text = read_input(f.path()).unwrap();
        assert!(text.starts_with("```tsx"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.md"));
    }
}
