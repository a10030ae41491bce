use std::collections::HashSet;

/// How `;` comments are recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentStyle {
    /// Any line containing a `;` is skipped, even inside a quoted value.
    #[default]
    AnySemicolon,
    /// A `;` outside double quotes starts a comment that runs to the end of the line.
    Trailing,
}

/// What happens when a `[section]` header names a section seen earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionRedeclaration {
    /// Re-select the section and keep the keys it already has.
    #[default]
    Merge,
    /// Discard the keys it already has.
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub comment_style: CommentStyle,
    pub section_redeclaration: SectionRedeclaration,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_comment_style(mut self, comment_style: CommentStyle) -> Self {
        self.comment_style = comment_style;
        self
    }

    #[must_use]
    pub fn with_section_redeclaration(mut self, behavior: SectionRedeclaration) -> Self {
        self.section_redeclaration = behavior;
        self
    }
}

/// The override tags enabled for a parse.
///
/// A key written as `key<tag> = value` is only applied when `tag` is in this set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    tags: HashSet<String>,
}

impl Overrides {
    /// No tags enabled; every tagged key is discarded.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether an assignment carrying `tag` should be written to the document.
    ///
    /// Untagged assignments, and assignments with an empty tag, always apply.
    #[must_use]
    pub fn applies(&self, tag: Option<&str>) -> bool {
        match tag {
            None | Some("") => true,
            Some(tag) => self.contains(tag),
        }
    }
}

impl<S> FromIterator<S> for Overrides
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S, const N: usize> From<[S; N]> for Overrides
where
    S: Into<String>,
{
    fn from(tags: [S; N]) -> Self {
        tags.into_iter().collect()
    }
}

impl<S> From<Vec<S>> for Overrides
where
    S: Into<String>,
{
    fn from(tags: Vec<S>) -> Self {
        tags.into_iter().collect()
    }
}
