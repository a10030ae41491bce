//! Classification of a single physical line.
//!
//! Each line is one of: skipped (blank or comment), a `[section]` header, a
//! `key = value` or `key<tag> = value` assignment, or invalid. Forms are tried
//! in that order.

use crate::options::CommentStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Skip,
    Section {
        name: &'a str,
    },
    Assignment {
        name: &'a str,
        tag: Option<&'a str>,
        raw_value: &'a str,
    },
    Invalid,
}

pub(crate) fn classify(line: &str, comment_style: CommentStyle) -> Line<'_> {
    let line = match comment_style {
        CommentStyle::AnySemicolon if line.contains(';') => return Line::Skip,
        CommentStyle::AnySemicolon => line,
        CommentStyle::Trailing => strip_trailing_comment(line),
    };

    if line.chars().all(is_space) {
        return Line::Skip;
    }

    if let Some(name) = parse_section_header(line) {
        return Line::Section { name };
    }

    parse_assignment(line).unwrap_or(Line::Invalid)
}

/// `\s` as the config grammar understands it.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C')
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `s` after its leading run of word characters.
fn take_word(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !is_word(c)).unwrap_or(s.len());
    if end == 0 { None } else { Some(s.split_at(end)) }
}

/// Cut the line at the first `;` outside double quotes, along with the whitespace before it.
fn strip_trailing_comment(line: &str) -> &str {
    let mut within_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => within_quotes = !within_quotes,
            ';' if !within_quotes => return line[..i].trim_end_matches(is_space),
            _ => {}
        }
    }

    line
}

/// Text after the closing `]` is ignored.
fn parse_section_header(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(is_space).strip_prefix('[')?;
    let (name, rest) = take_word(rest)?;
    rest.starts_with(']').then_some(name)
}

fn parse_assignment(line: &str) -> Option<Line<'_>> {
    let (name, mut rest) = take_word(line.trim_start_matches(is_space))?;

    let mut tag = None;
    if let Some(after) = rest.strip_prefix('<') {
        let (t, after) = take_word(after)?;
        rest = after.strip_prefix('>')?;
        tag = Some(t);
    }

    let rest = rest.trim_start_matches(is_space).strip_prefix('=')?;

    // Whitespace after `=` is eaten, but at least one character must remain.
    let (last, _) = rest.char_indices().next_back()?;
    let trimmed = rest.trim_start_matches(is_space);
    let raw_value = if trimmed.is_empty() {
        &rest[last..]
    } else {
        trimmed
    };

    Some(Line::Assignment {
        name,
        tag,
        raw_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn any(line: &str) -> Line<'_> {
        classify(line, CommentStyle::AnySemicolon)
    }

    fn trailing(line: &str) -> Line<'_> {
        classify(line, CommentStyle::Trailing)
    }

    #[rstest]
    #[case("")]
    #[case("   \t")]
    #[case("; a comment")]
    #[case("key = value ; inline")]
    #[case("key = \"a;b\"")]
    #[case("garbage; but commented")]
    fn skipped_with_any_semicolon(#[case] line: &str) {
        assert_eq!(any(line), Line::Skip);
    }

    #[rstest]
    #[case("[common]", "common")]
    #[case("   [ftp_2]", "ftp_2")]
    #[case("[http] trailing text", "http")]
    fn section_headers(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(any(line), Line::Section { name: expected });
    }

    #[rstest]
    #[case("[]")]
    #[case("[has space]")]
    #[case("[unterminated")]
    #[case("[dash-name]")]
    fn malformed_headers(#[case] line: &str) {
        assert_eq!(any(line), Line::Invalid);
    }

    #[test]
    fn plain_assignment() {
        assert_eq!(
            any("basic_size_limit = 26214400"),
            Line::Assignment {
                name: "basic_size_limit",
                tag: None,
                raw_value: "26214400",
            }
        );
    }

    #[test]
    fn tagged_assignment() {
        assert_eq!(
            any("  path<production>=/srv/var/tmp/"),
            Line::Assignment {
                name: "path",
                tag: Some("production"),
                raw_value: "/srv/var/tmp/",
            }
        );
    }

    #[test]
    fn raw_value_keeps_trailing_whitespace() {
        assert_eq!(
            any("name = hello world  "),
            Line::Assignment {
                name: "name",
                tag: None,
                raw_value: "hello world  ",
            }
        );
    }

    #[test]
    fn whitespace_only_value_keeps_one_character() {
        assert_eq!(
            any("name =   "),
            Line::Assignment {
                name: "name",
                tag: None,
                raw_value: " ",
            }
        );
    }

    #[rstest]
    #[case("foo bar")]
    #[case("name =")]
    #[case("name<> = 1")]
    #[case("name<tag = 1")]
    #[case("name<a b> = 1")]
    #[case("= value")]
    #[case("two words = 1")]
    fn invalid_lines(#[case] line: &str) {
        assert_eq!(any(line), Line::Invalid);
    }

    #[test]
    fn trailing_comment_is_stripped() {
        assert_eq!(
            trailing("key = value   ; inline"),
            Line::Assignment {
                name: "key",
                tag: None,
                raw_value: "value",
            }
        );
    }

    #[test]
    fn trailing_keeps_semicolons_inside_quotes() {
        assert_eq!(
            trailing("key = \"a;b\" ; comment"),
            Line::Assignment {
                name: "key",
                tag: None,
                raw_value: "\"a;b\"",
            }
        );
    }

    #[test]
    fn trailing_skips_comment_only_lines() {
        assert_eq!(trailing("   ; just a comment"), Line::Skip);
        assert_eq!(trailing("[section] ; note"), Line::Section { name: "section" });
    }

    #[test]
    fn trailing_still_rejects_garbage() {
        assert_eq!(trailing("garbage ; commented"), Line::Invalid);
    }
}
