//! Parser for the backing text format.
//!
//! Line-oriented recursive descent over an indentation stack. Nesting is
//! fixed at 2 spaces per level; tabs in indentation are rejected. Comment
//! lines attach to the next key in the enclosing section; a blank line
//! breaks the attachment. A leading comment block separated from the body by
//! a blank line (or standing alone in the file) is the document header.

use crate::error::{ConfigError, ConfigResult};
use crate::section::{ConfigSection, SectionEntry};
use crate::value::ConfigValue;

/// Result of parsing a document: the tree plus the header block, if any.
#[derive(Debug)]
pub struct ParsedDocument {
    /// The root section.
    pub root: ConfigSection,
    /// Leading header comment block, marker characters stripped.
    pub header: Option<String>,
}

/// Parse the backing text format. With `parse_comments` off, comment lines
/// are skipped instead of attached; the header is recognized either way.
pub fn parse_document(text: &str, parse_comments: bool) -> ConfigResult<ParsedDocument> {
    let lines: Vec<&str> = text.lines().collect();
    let (header, start) = split_header(&lines);
    let mut parser = Parser {
        lines,
        pos: start,
        parse_comments,
    };
    let root = parser.parse_section(0)?;
    Ok(ParsedDocument { root, header })
}

fn split_header(lines: &[&str]) -> (Option<String>, usize) {
    let mut collected = Vec::new();
    let mut idx = 0;
    while idx < lines.len() && lines[idx].starts_with('#') {
        collected.push(strip_comment_marker(lines[idx]));
        idx += 1;
    }
    if collected.is_empty() {
        return (None, 0);
    }
    if idx >= lines.len() {
        // Comment-only file: the whole block is the header.
        return (Some(collected.join("\n")), idx);
    }
    if lines[idx].trim().is_empty() {
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        return (Some(collected.join("\n")), idx);
    }
    // No separating blank line: the comments belong to the first key.
    (None, 0)
}

fn strip_comment_marker(line: &str) -> String {
    let text = line.trim_start();
    let text = text.strip_prefix('#').unwrap_or(text);
    let text = text.strip_prefix(' ').unwrap_or(text);
    text.to_string()
}

enum BlockKind {
    List,
    Section,
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    parse_comments: bool,
}

impl Parser<'_> {
    fn parse_section(&mut self, indent: usize) -> ConfigResult<ConfigSection> {
        let mut section = ConfigSection::new();
        let mut pending_comments: Vec<String> = Vec::new();
        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos];
            let line_no = self.pos + 1;
            if raw.trim().is_empty() {
                // A blank line breaks comment attachment.
                pending_comments.clear();
                self.pos += 1;
                continue;
            }
            let line_indent = indent_of(raw, line_no)?;
            if line_indent < indent {
                break;
            }
            let content = &raw[line_indent..];
            if content.starts_with('#') {
                if self.parse_comments {
                    pending_comments.push(strip_comment_marker(content));
                }
                self.pos += 1;
                continue;
            }
            if line_indent > indent {
                return Err(ConfigError::parse(
                    line_no,
                    format!(
                        "unexpected indentation (expected {} spaces, found {})",
                        indent, line_indent
                    ),
                ));
            }
            if content == "-" || content.starts_with("- ") {
                return Err(ConfigError::parse(line_no, "list item without a key"));
            }
            let (key, rest) = split_key_line(content, line_no)?;
            self.pos += 1;
            let value = if rest.is_empty() {
                match self.peek_block_kind(indent)? {
                    Some(BlockKind::List) => ConfigValue::List(self.parse_list(indent + 2)?),
                    Some(BlockKind::Section) => {
                        ConfigValue::Section(self.parse_section(indent + 2)?)
                    }
                    None => ConfigValue::Null,
                }
            } else {
                lex_scalar(rest, line_no)?
            };
            section.insert_entry(SectionEntry {
                key,
                comments: std::mem::take(&mut pending_comments),
                value,
            });
        }
        Ok(section)
    }

    /// Look past blank and comment lines to decide what a bare `key:` line
    /// opens: a list block, a section block, or nothing.
    fn peek_block_kind(&self, indent: usize) -> ConfigResult<Option<BlockKind>> {
        let mut idx = self.pos;
        while idx < self.lines.len() {
            let raw = self.lines[idx];
            if raw.trim().is_empty() {
                idx += 1;
                continue;
            }
            let line_indent = indent_of(raw, idx + 1)?;
            let content = &raw[line_indent..];
            if content.starts_with('#') {
                idx += 1;
                continue;
            }
            if line_indent <= indent {
                return Ok(None);
            }
            let kind = if content == "-" || content.starts_with("- ") {
                BlockKind::List
            } else {
                BlockKind::Section
            };
            return Ok(Some(kind));
        }
        Ok(None)
    }

    fn parse_list(&mut self, indent: usize) -> ConfigResult<Vec<ConfigValue>> {
        let mut items = Vec::new();
        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos];
            let line_no = self.pos + 1;
            if raw.trim().is_empty() {
                self.pos += 1;
                continue;
            }
            let line_indent = indent_of(raw, line_no)?;
            if line_indent < indent {
                break;
            }
            let content = &raw[line_indent..];
            if content.starts_with('#') {
                // Comments inside list blocks have no key to attach to.
                self.pos += 1;
                continue;
            }
            if line_indent > indent {
                return Err(ConfigError::parse(line_no, "unexpected indentation in list"));
            }
            let item_text = if content == "-" {
                ""
            } else if let Some(rest) = content.strip_prefix("- ") {
                rest.trim()
            } else {
                return Err(ConfigError::parse(line_no, "expected list item"));
            };
            let item = if item_text.is_empty() {
                ConfigValue::Null
            } else {
                lex_scalar(item_text, line_no)?
            };
            items.push(item);
            self.pos += 1;
        }
        Ok(items)
    }
}

fn indent_of(line: &str, line_no: usize) -> ConfigResult<usize> {
    let mut count = 0;
    for c in line.chars() {
        match c {
            ' ' => count += 1,
            '\t' => {
                return Err(ConfigError::parse(
                    line_no,
                    "tab characters are not allowed in indentation",
                ))
            }
            _ => break,
        }
    }
    Ok(count)
}

fn split_key_line(content: &str, line_no: usize) -> ConfigResult<(String, &str)> {
    if content.starts_with('"') || content.starts_with('\'') {
        let quote = if content.starts_with('"') { '"' } else { '\'' };
        let body = &content[1..];
        let close = body
            .find(quote)
            .ok_or_else(|| ConfigError::parse(line_no, "unterminated quoted key"))?;
        let key = body[..close].to_string();
        let after = body[close + 1..].trim_start();
        let after = after
            .strip_prefix(':')
            .ok_or_else(|| ConfigError::parse(line_no, "expected ':' after key"))?;
        Ok((key, value_after_colon(after, line_no)?))
    } else {
        let colon = content
            .find(':')
            .ok_or_else(|| ConfigError::parse(line_no, "expected 'key: value'"))?;
        let key = content[..colon].trim_end().to_string();
        if key.is_empty() {
            return Err(ConfigError::parse(line_no, "empty key"));
        }
        Ok((key, value_after_colon(&content[colon + 1..], line_no)?))
    }
}

fn value_after_colon(after: &str, line_no: usize) -> ConfigResult<&str> {
    if after.is_empty() {
        return Ok("");
    }
    match after.strip_prefix(' ') {
        Some(rest) => Ok(rest.trim()),
        None => Err(ConfigError::parse(line_no, "missing space after ':'")),
    }
}

/// Lex a scalar token. Quoted tokens are always strings; `{`/`[` open
/// single-line JSON flow values; everything else goes through the usual
/// boolean/null/number ladder and falls back to a plain string.
fn lex_scalar(text: &str, line_no: usize) -> ConfigResult<ConfigValue> {
    if text.starts_with('"') {
        return Ok(ConfigValue::String(parse_double_quoted(text, line_no)?));
    }
    if text.starts_with('\'') {
        return Ok(ConfigValue::String(parse_single_quoted(text, line_no)?));
    }
    if text.starts_with('{') || text.starts_with('[') {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ConfigError::parse(line_no, format!("invalid flow value: {}", e)))?;
        return Ok(ConfigValue::from_json(json));
    }
    match text {
        "true" => return Ok(ConfigValue::Bool(true)),
        "false" => return Ok(ConfigValue::Bool(false)),
        "null" | "~" => return Ok(ConfigValue::Null),
        _ => {}
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(ConfigValue::Integer(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Ok(ConfigValue::Float(f));
    }
    Ok(ConfigValue::String(text.to_string()))
}

fn parse_double_quoted(text: &str, line_no: usize) -> ConfigResult<String> {
    let mut out = String::new();
    let mut chars = text[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                return if chars.next().is_none() {
                    Ok(out)
                } else {
                    Err(ConfigError::parse(
                        line_no,
                        "unexpected characters after closing quote",
                    ))
                };
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    return Err(ConfigError::parse(
                        line_no,
                        format!("unknown escape '\\{}'", other),
                    ))
                }
                None => return Err(ConfigError::parse(line_no, "unterminated string")),
            },
            other => out.push(other),
        }
    }
    Err(ConfigError::parse(line_no, "unterminated string"))
}

fn parse_single_quoted(text: &str, line_no: usize) -> ConfigResult<String> {
    let body = &text[1..];
    match body.strip_suffix('\'') {
        Some(inner) if !inner.contains('\'') => Ok(inner.to_string()),
        _ => Err(ConfigError::parse(line_no, "unterminated string")),
    }
}
