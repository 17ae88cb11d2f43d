//! Line grammar for INI-style documents.
//!
//! Classification is split out of the file parser so the rule priority
//! (blank/comment, continuation, header, property) stays explicit and
//! testable without touching the document model.

const COMMENT_CHARS: [char; 2] = ['#', ';'];
const REM_WORD: &str = "rem";
const ASSIGNMENT_OPERATOR: char = '=';

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
  /// Whitespace-only line, preserved verbatim.
  Blank,
  /// `#`, `;` or `rem` comment, preserved verbatim.
  Comment,
  /// `[name]` header.
  SectionHeader(&'a str),
  /// `key=value` property; the value is kept untrimmed.
  Property { key: &'a str, value: &'a str },
  /// Indented extension of the previous property, trimmed.
  Continuation(&'a str),
  /// None of the above.
  Invalid,
}

/// Classifies one raw input line, terminator included.
///
/// `continuation_open` tells the classifier whether the enclosing parser has
/// a section and a previous key to attach an indented line to; without it an
/// indented line falls through to the property rule.
pub fn classify(raw: &str, continuation_open: bool) -> Line<'_> {
  if raw.trim().is_empty() {
    return Line::Blank;
  }
  if raw.starts_with(COMMENT_CHARS) || is_rem_comment(raw) {
    return Line::Comment;
  }
  if continuation_open && raw.starts_with([' ', '\t', '\r', '\x0c']) {
    return Line::Continuation(raw.trim());
  }

  let text = strip_terminator(raw);
  if let Some(rest) = text.strip_prefix('[')
    && let Some(end) = rest.find(']')
    && end > 0
  {
    return Line::SectionHeader(&rest[..end]);
  }
  if let Some((lhs, value)) = text.trim_start().split_once(ASSIGNMENT_OPERATOR) {
    let key = lhs.trim_end();
    if !key.is_empty() && !key.contains(char::is_whitespace) {
      return Line::Property { key, value };
    }
  }

  Line::Invalid
}

/// A `rem` word comment: optional leading whitespace, then `rem` in any
/// case, then at least one whitespace character.
fn is_rem_comment(raw: &str) -> bool {
  let rest = raw.trim_start();
  match rest.get(..REM_WORD.len()) {
    Some(word) => {
      word.eq_ignore_ascii_case(REM_WORD) && rest[REM_WORD.len()..].starts_with(char::is_whitespace)
    }
    None => false,
  }
}

fn strip_terminator(raw: &str) -> &str {
  let text = raw.strip_suffix('\n').unwrap_or(raw);
  text.strip_suffix('\r').unwrap_or(text)
}
