use std::str::Lines;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::Config;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::line::{self, Line};
use crate::options::{Overrides, ParseOptions, SectionRedeclaration};
use crate::section::Section;
use crate::value::{canonicalize_boolean, parse_raw_value};

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    lines: Lines<'a>,
    /// 1-based number of the line most recently read.
    line_number: usize,
    /// Index into the sections map; `None` until the first header.
    current: Option<usize>,
    options: ParseOptions,
    overrides: &'a Overrides,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub(crate) fn new(text: &'a str, options: ParseOptions, overrides: &'a Overrides) -> Self {
        Self {
            lines: text.lines(),
            line_number: 0,
            current: None,
            options,
            overrides,
        }
    }
}

impl Parser<'_> {
    // Consumes `self`: the line iterator cannot be rewound.
    pub(crate) fn into_config(mut self) -> Result<Config, SyntaxError> {
        let mut sections = IndexMap::<String, Section>::with_capacity(16);

        while let Some(text) = self.lines.next() {
            self.line_number += 1;

            match line::classify(text, self.options.comment_style) {
                Line::Skip => trace!(line = self.line_number, "skipping blank or comment line"),
                Line::Section { name } => self.enter_section(&mut sections, name),
                Line::Assignment {
                    name,
                    tag,
                    raw_value,
                } => self.assign(&mut sections, name, tag, raw_value)?,
                Line::Invalid => {
                    return Err(self.error(&sections, SyntaxErrorKind::UnrecognizedLine));
                }
            }
        }

        debug!(
            lines = self.line_number,
            sections = sections.len(),
            "finished parsing config"
        );

        Ok(Config { sections })
    }

    fn enter_section(&mut self, sections: &mut IndexMap<String, Section>, name: &str) {
        if let Some((index, _, section)) = sections.get_full_mut(name) {
            if self.options.section_redeclaration == SectionRedeclaration::Reset
                && !section.is_empty()
            {
                warn!(
                    line = self.line_number,
                    section = name,
                    discarded = section.len(),
                    "section redeclared; dropping its earlier keys"
                );
                section.clear();
            }
            self.current = Some(index);
        } else {
            let (index, _) = sections.insert_full(name.to_owned(), Section::new(name.to_owned()));
            self.current = Some(index);
        }

        debug!(line = self.line_number, section = name, "entered section");
    }

    fn assign(
        &self,
        sections: &mut IndexMap<String, Section>,
        name: &str,
        tag: Option<&str>,
        raw_value: &str,
    ) -> Result<(), SyntaxError> {
        let Some(index) = self.current else {
            return Err(self.error(sections, SyntaxErrorKind::AssignmentOutsideSection));
        };

        let value = canonicalize_boolean(parse_raw_value(raw_value));

        if self.overrides.applies(tag) {
            if let Some((_, section)) = sections.get_index_mut(index) {
                section.insert(name, value);
            }
        } else {
            trace!(
                line = self.line_number,
                key = name,
                tag,
                "override not enabled; discarding assignment"
            );
        }

        Ok(())
    }

    fn error(&self, sections: &IndexMap<String, Section>, kind: SyntaxErrorKind) -> SyntaxError {
        let section = self
            .current
            .and_then(|i| sections.get_index(i))
            .map(|(name, _)| name.clone());

        SyntaxError::new(self.line_number, section, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CommentStyle;
    use crate::value::Value;

    fn parse(text: &str, overrides: &Overrides) -> Result<Config, SyntaxError> {
        Parser::new(text, ParseOptions::default(), overrides).into_config()
    }

    #[test]
    fn tracks_line_numbers_across_skipped_lines() {
        let text = "\n; comment\n[a]\nk = 1\n\nnot valid\n";

        let err = parse(text, &Overrides::none()).expect_err("expected syntax error");

        assert_eq!(err.line(), 6);
        assert_eq!(err.section(), Some("a"));
        assert_eq!(err.kind(), SyntaxErrorKind::UnrecognizedLine);
    }

    #[test]
    fn assignment_before_header() {
        let err = parse("\nk = 1\n[a]\n", &Overrides::none()).expect_err("expected syntax error");

        assert_eq!(err.line(), 2);
        assert_eq!(err.section(), None);
        assert_eq!(err.kind(), SyntaxErrorKind::AssignmentOutsideSection);
    }

    #[test]
    fn discarded_override_before_header_is_still_an_error() {
        let err = parse("k<staging> = 1\n", &Overrides::none()).expect_err("expected syntax error");

        assert_eq!(err.kind(), SyntaxErrorKind::AssignmentOutsideSection);
    }

    #[test]
    fn merge_keeps_keys_of_redeclared_section() {
        let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";

        let config = parse(text, &Overrides::none()).expect("failed to parse hardcoded config");
        let a = config.get("a").expect("section a");

        assert_eq!(a.keys().collect::<Vec<_>>(), ["x", "z"]);
        assert_eq!(config.sections().map(Section::name).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn reset_drops_keys_of_redeclared_section() {
        let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";
        let options =
            ParseOptions::default().with_section_redeclaration(SectionRedeclaration::Reset);

        let config = Parser::new(text, options, &Overrides::none())
            .into_config()
            .expect("failed to parse hardcoded config");
        let a = config.get("a").expect("section a");

        assert_eq!(a.keys().collect::<Vec<_>>(), ["z"]);
        assert_eq!(config.sections().map(Section::name).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn windows_line_endings() {
        let config = parse("[a]\r\nk = 5\r\n", &Overrides::none())
            .expect("failed to parse hardcoded config");

        assert_eq!(config.value("a", "k"), Some(&Value::Integer(5)));
    }

    #[test]
    fn override_applies_in_order_of_appearance() {
        let text = "[a]\npath<production> = /srv\npath = /tmp\n";

        let config =
            parse(text, &Overrides::from(["production"])).expect("failed to parse hardcoded config");

        assert_eq!(config.value("a", "path"), Some(&Value::from("/tmp")));
    }

    #[test]
    fn trailing_comments_keep_quoted_semicolons() {
        let text = "[a]\nk = \"x;y\" ; note\n";
        let options = ParseOptions::default().with_comment_style(CommentStyle::Trailing);

        let config = Parser::new(text, options, &Overrides::none())
            .into_config()
            .expect("failed to parse hardcoded config");

        assert_eq!(config.value("a", "k"), Some(&Value::from("x;y")));
    }
}
