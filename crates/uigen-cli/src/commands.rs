//! Subcommand implementations. Each writes its report to the given writer.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use tracing::debug;
use uigen_core::render::APP_ENTRY_PATH;
use uigen_core::{
    FinalCode, GenerationRequest, check_render_ready, diagnose, finalize, prepare_app_source,
};
use uigen_session::{
    GenerationEvent, GenerationFailure, Generator, ScriptedSource, SessionConfig,
};

/// Options for replaying a recorded response as a live stream.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub prompt: String,
    pub chunk_chars: usize,
    pub delay: Option<Duration>,
    pub json: bool,
}

/// One JSON line per generation event.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum EventLine<'a> {
    Started {
        generation_id: String,
        provisional_name: &'a str,
    },
    Progress {
        seq: u64,
        received_chars: usize,
    },
    Preview {
        seq: u64,
        code: &'a str,
    },
    Completed {
        name: &'a str,
        code: &'a str,
    },
    Failed {
        error: String,
    },
}

/// Streams `response` through a generation and reports each event.
///
/// Returns an error when the generation fails, after reporting it.
pub async fn replay(out: &mut impl Write, response: String, opts: ReplayOptions) -> anyhow::Result<FinalCode> {
    let mut source = ScriptedSource::new(response).chunk_chars(opts.chunk_chars);
    if let Some(delay) = opts.delay {
        source = source.delay(delay);
    }
    let generator = Generator::builder()
        .source(Arc::new(source))
        .config(SessionConfig::default())
        .build()?;

    let mut stream = generator.generate(GenerationRequest::new(opts.prompt)).await?;
    while let Some(event) = stream.next_event().await {
        report_event(out, &event, opts.json)?;
        if event.is_terminal() {
            break;
        }
    }
    Ok(stream.finish().await?)
}

fn report_event(out: &mut impl Write, event: &GenerationEvent, json: bool) -> anyhow::Result<()> {
    if json {
        let line = match event {
            GenerationEvent::Started {
                generation_id,
                provisional_name,
                ..
            } => EventLine::Started {
                generation_id: generation_id.to_string(),
                provisional_name: provisional_name.as_str(),
            },
            GenerationEvent::Progress {
                seq, received_chars, ..
            } => EventLine::Progress {
                seq: *seq,
                received_chars: *received_chars,
            },
            GenerationEvent::PreviewUpdated { seq, code, .. } => EventLine::Preview {
                seq: *seq,
                code: code.as_str(),
            },
            GenerationEvent::Completed { result, .. } => EventLine::Completed {
                name: &result.name,
                code: &result.code,
            },
            GenerationEvent::Failed { error, .. } => EventLine::Failed {
                error: error.to_string(),
            },
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
        return Ok(());
    }

    match event {
        GenerationEvent::Started {
            provisional_name, ..
        } => writeln!(out, "started: {provisional_name}")?,
        GenerationEvent::Progress { .. } => {}
        GenerationEvent::PreviewUpdated { seq, code, .. } => {
            writeln!(out, "preview after chunk {seq}: {} chars", code.chars().count())?
        }
        GenerationEvent::Completed { result, .. } => {
            writeln!(out, "completed: {}\n\n{}", result.name, result.code)?
        }
        GenerationEvent::Failed { error, .. } => {
            writeln!(out, "failed: {error}")?;
            if let GenerationFailure::NoCode { preview } = error {
                writeln!(out, "response began with:\n{preview}")?;
            }
        }
    }
    Ok(())
}

/// Finalizes a complete response and prints the code and name.
pub fn finalize_response(out: &mut impl Write, response: &str, json: bool) -> anyhow::Result<FinalCode> {
    let result = finalize(response).context("finalizing response")?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(out, "{}\n\n{}", result.name, result.code)?;
    }
    Ok(result)
}

/// Reports whether `code` would be handed to a live preview.
pub fn check(out: &mut impl Write, code: &str) -> anyhow::Result<bool> {
    match check_render_ready(code) {
        Ok(()) => {
            writeln!(out, "ready")?;
            Ok(true)
        }
        Err(reason) => {
            writeln!(out, "not ready: {reason}")?;
            Ok(false)
        }
    }
}

/// Prints the sandbox entry file for `code`, headed by its mount path.
///
/// Returns `false` when the code would not be rendered.
pub fn app_source(out: &mut impl Write, code: &str, generating: bool) -> anyhow::Result<bool> {
    let Some(source) = prepare_app_source(code, generating) else {
        debug!(generating, len = code.len(), "code held back from sandbox");
        writeln!(out, "not rendered")?;
        return Ok(false);
    };
    writeln!(out, "// {APP_ENTRY_PATH}{source}")?;
    Ok(true)
}

/// Explains a sandbox render error message.
pub fn explain(out: &mut impl Write, message: &str, json: bool) -> anyhow::Result<()> {
    let diagnosis = diagnose(message);
    if json {
        writeln!(out, "{}", serde_json::to_string(&diagnosis)?)?;
    } else {
        writeln!(out, "{}\n{}", diagnosis.title, diagnosis.suggestion)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "Sure, here's the orders screen:\n```tsx\n'use client';\n\nexport default function OrdersView() {\n  const orders = [{ id: 'A-1', total: 42 }];\n  return (\n    <ul>{orders.map((o) => <li key={o.id}>{o.total}</li>)}</ul>\n  );\n}\n```\n";

    fn options(json: bool) -> ReplayOptions {
        ReplayOptions {
            prompt: "an orders list".into(),
            chunk_chars: 9,
            delay: None,
            json,
        }
    }

    #[tokio::test]
    async fn replay_reports_preview_and_result() {
        let mut out = Vec::new();
        let result = replay(&mut out, RESPONSE.into(), options(false)).await.unwrap();
        assert_eq!(result.name, "OrdersView");

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("started: DataTableView\n"));
        assert!(text.contains("preview after chunk"));
        assert!(text.contains("completed: OrdersView"));
    }

    #[tokio::test]
    async fn replay_json_emits_one_object_per_line() {
        let mut out = Vec::new();
        replay(&mut out, RESPONSE.into(), options(true)).await.unwrap();
        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines[0]["event"], "started");
        let last = lines.last().unwrap();
        assert_eq!(last["event"], "completed");
        assert_eq!(last["name"], "OrdersView");
    }

    #[tokio::test]
    async fn replay_of_prose_fails_after_reporting() {
        let mut out = Vec::new();
        let err = replay(&mut out, "No code today.".into(), options(false)).await;
        assert!(err.is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("failed: no code found"));
        assert!(text.contains("No code today."));
    }

    #[test]
    fn finalize_prints_name_then_code() {
        let mut out = Vec::new();
        let result = finalize_response(&mut out, RESPONSE, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("OrdersView\n\n'use client';"));
        assert_eq!(result.code.lines().last(), Some("}"));
    }

    #[test]
    fn check_reports_reason() {
        let mut out = Vec::new();
        assert!(!check(&mut out, "export default function A() {").unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "not ready: too short\n");
    }

    #[test]
    fn app_source_prints_entry_file() {
        let code = finalize(RESPONSE).unwrap().code;
        let mut out = Vec::new();
        assert!(app_source(&mut out, &code, true).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("// /App.tsx\nimport './styles.css';\n\n'use client';"));
        assert!(text.contains("export default function OrdersView()"));
    }

    #[test]
    fn app_source_holds_back_unfinished_code_while_generating() {
        let code = finalize(RESPONSE).unwrap().code;
        let unfinished = code.trim_end_matches('}');
        let mut out = Vec::new();
        assert!(!app_source(&mut out, unfinished, true).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "not rendered\n");
    }

    #[test]
    fn explain_json_uses_snake_case_kind() {
        let mut out = Vec::new();
        explain(&mut out, "ReferenceError: x is not defined", true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "reference");
    }
}
