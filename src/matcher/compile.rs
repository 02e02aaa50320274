//! Glob-to-regex translation for ignore patterns

use regex::Regex;

/// One pattern compiled for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    /// No wildcards: eligible for exact basename comparison.
    pub literal: bool,
}

/// True when the pattern has no glob wildcards.
pub fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?'])
}

/// Translate an ignore pattern into regex source.
///
/// - `**/` matches zero or more leading directories, `**` anything at all
/// - `*` matches within one path segment, `?` one non-separator character
/// - a leading `/` anchors to the matcher root, otherwise the pattern may
///   start at any segment
/// - a trailing `/` matches the directory itself or anything below it
pub fn glob_to_regex(pattern: &str) -> String {
    let (rooted, body) = match pattern.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (dir_only, body) = match body.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    let mut out = String::with_capacity(body.len() * 2 + 16);
    out.push_str(if rooted { "^" } else { "(?:^|/)" });

    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c @ ('.' | '+' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\') => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }

    out.push_str(if dir_only { "(?:$|/)" } else { "$" });
    out
}

pub fn compile_pattern(pattern: &str) -> Result<CompiledPattern, regex::Error> {
    let regex = Regex::new(&glob_to_regex(pattern))?;
    Ok(CompiledPattern {
        regex,
        literal: is_literal(pattern),
    })
}
