//! Whitespace normalisation applied to rendered output

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TidyError {
    #[error("rendered JSON does not parse: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unbalanced code fence at line {line}")]
    UnclosedFence { line: usize },
}

/// Check that the rendered JSON parses and normalise its trailing newline.
pub fn tidy_json(raw: &str) -> Result<String, TidyError> {
    serde_json::from_str::<serde_json::Value>(raw)?;
    Ok(format!("{}\n", raw.trim_end()))
}

/// Strip trailing spaces, collapse runs of blank lines outside code
/// fences, end with exactly one newline.
pub fn tidy_markdown(raw: &str) -> Result<String, TidyError> {
    let mut out = String::with_capacity(raw.len());
    let mut fence: Option<(String, usize)> = None;
    let mut blank_run = 0;

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim_end();

        match &fence {
            Some((marker, _)) if line == marker => fence = None,
            Some(_) => {}
            None => {
                if line.starts_with("```") {
                    let marker: String = line.chars().take_while(|&c| c == '`').collect();
                    fence = Some((marker, index + 1));
                }
            }
        }

        let inside_fence = fence.is_some() && !line.starts_with("```");
        if line.is_empty() && !inside_fence {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    if let Some((_, line)) = fence {
        return Err(TidyError::UnclosedFence { line });
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    let start = out.len() - out.trim_start_matches('\n').len();
    out.drain(..start);
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_json() {
        assert_eq!(tidy_json("{\"a\": 1}\n\n").unwrap(), "{\"a\": 1}\n");
        assert!(tidy_json("{\"a\": ").is_err());
    }

    #[test]
    fn test_tidy_markdown_collapses_blank_lines() {
        let raw = "\n# a/   \n\n\n\n## b.txt\n\n---\n\n\n";
        assert_eq!(tidy_markdown(raw).unwrap(), "# a/\n\n## b.txt\n\n---\n");
    }

    #[test]
    fn test_tidy_markdown_keeps_fenced_content() {
        let raw = "```txt\nline\n\n\nafter\n```\n";
        assert_eq!(tidy_markdown(raw).unwrap(), raw);
    }

    #[test]
    fn test_tidy_markdown_rejects_unclosed_fence() {
        let err = tidy_markdown("# x\n\n```json\n{}\n").unwrap_err();
        assert!(matches!(err, TidyError::UnclosedFence { line: 3 }));
    }
}
