//! Extraction of the leading comment block of a file.

use crate::snapshot::types::comment::CommentStyle;

/// Delimiters accepted for a given host style.
struct Syntax {
    line: &'static [&'static str],
    block: &'static [(&'static str, &'static str)],
}

fn syntax_for(style: CommentStyle) -> Syntax {
    match style {
        CommentStyle::Slash | CommentStyle::Block => Syntax {
            line: &["//"],
            block: &[("/*", "*/")],
        },
        CommentStyle::Hash => Syntax {
            line: &["#"],
            block: &[],
        },
        CommentStyle::Xml => Syntax {
            line: &[],
            block: &[("<!--", "-->")],
        },
        CommentStyle::DashDash => Syntax {
            line: &["--"],
            block: &[("{-", "-}")],
        },
        CommentStyle::Semicolon => Syntax {
            line: &[";"],
            block: &[],
        },
        CommentStyle::Percent => Syntax {
            line: &["%"],
            block: &[],
        },
        CommentStyle::Bare => Syntax {
            line: &["//", "#", "--", ";", "%"],
            block: &[("/*", "*/"), ("<!--", "-->")],
        },
    }
}

/// Lines that may precede a license header without being part of it.
fn is_prologue(line: &str, syntax: &Syntax) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with("#!") {
        return true;
    }
    (trimmed.is_empty()
        || trimmed.starts_with("<?php")
        || trimmed.starts_with("<?xml")
        || trimmed.starts_with("<!DOCTYPE"))
        && !starts_comment(trimmed, syntax)
}

/// Returns the first comment block of `content`, delimiters removed.
///
/// A BOM, shebangs, blank lines and `<?php`/`<?xml` openers are skipped
/// before the block. Line comments end at the first line that is not a
/// comment; block comments end at their closing delimiter. Returns `None`
/// when the file does not start with a comment or the comment is empty.
pub fn leading_comment(content: &[u8], style: CommentStyle) -> Option<String> {
    let text = String::from_utf8_lossy(content);
    let text = text.trim_start_matches('\u{feff}');
    let syntax = syntax_for(style);

    let mut lines = text.lines().peekable();
    while lines.peek().is_some_and(|l| is_prologue(l, &syntax)) {
        lines.next();
    }
    let first: &str = *lines.peek()?;
    let first = first.trim_start();

    let mut body: Vec<String> = Vec::new();
    if let Some((open, close)) = syntax.block.iter().find(|(open, _)| first.starts_with(open)) {
        for line in lines {
            let mut line = line.trim();
            if body.is_empty() {
                line = line.strip_prefix(open).unwrap_or(line);
            }
            let closed = match line.find(close) {
                Some(pos) => {
                    line = &line[..pos];
                    true
                }
                None => false,
            };
            body.push(strip_decoration(line));
            if closed {
                break;
            }
        }
    } else if let Some(token) = syntax.line.iter().find(|t| first.starts_with(*t)) {
        for line in lines {
            let Some(rest) = line.trim_start().strip_prefix(token) else {
                break;
            };
            let rest = rest.trim_start_matches(token.chars().last().unwrap_or(' '));
            body.push(rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string());
        }
    } else {
        return None;
    }

    let joined = body.join("\n");
    let trimmed = joined.trim_matches('\n');
    if trimmed.trim().is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn starts_comment(line: &str, syntax: &Syntax) -> bool {
    let trimmed = line.trim_start();
    syntax.line.iter().any(|t| trimmed.starts_with(t))
        || syntax.block.iter().any(|(open, _)| trimmed.starts_with(open))
}

/// Removes the ` * ` gutter used inside C block comments.
fn strip_decoration(line: &str) -> String {
    let line = line.trim();
    let line = line.trim_start_matches('*');
    line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()
}
