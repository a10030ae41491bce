#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Parser for sectioned, INI-style config files.
//!
//! ```text
//! [common]
//! basic_size_limit = 26214400
//! path = /srv/var/tmp/
//! path<production> = /srv/tmp/
//!
//! [ftp]
//! name = "hello there, ftp uploading"
//! enabled = no
//! params = array,of,values
//! ```
//!
//! Values are typed: digit runs become integers, `"..."` becomes a string,
//! comma-separated text becomes a list, and `on`/`off`, `yes`/`no`,
//! `true`/`false`, `1`/`0` become booleans. A key written as `key<tag>` is
//! only applied when `tag` is one of the enabled [`Overrides`].

mod error;
mod line;
mod options;
mod parser;
mod section;
mod value;

use std::fs;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

pub use crate::error::{LoadError, SyntaxError, SyntaxErrorKind};
pub use crate::options::{CommentStyle, Overrides, ParseOptions, SectionRedeclaration};
pub use crate::section::Section;
pub use crate::value::{Value, canonicalize_boolean, parse_raw_value};

use crate::parser::Parser;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A parsed config file: sections in the order they first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    sections: IndexMap<String, Section>,
}

impl Config {
    #[must_use]
    pub fn get(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Look up `key` in `section`; absent if either one is missing.
    #[must_use]
    pub fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.get(section).and_then(|s| s.get(key))
    }

    #[must_use]
    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Load and parse the config file at `path` with the default [`ParseOptions`].
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be opened or read, and
/// [`LoadError::Syntax`] at the first line that is not blank, a comment, a
/// section header, or an assignment inside a section.
pub fn load_config(path: impl AsRef<Path>, overrides: &Overrides) -> Result<Config, LoadError> {
    Loader::new().overrides(overrides.clone()).load(path)
}

/// Parse with non-default options or from something other than a path.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: ParseOptions,
    overrides: Overrides,
}

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn overrides(mut self, overrides: impl Into<Overrides>) -> Self {
        self.overrides = overrides.into();
        self
    }

    #[must_use]
    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn comment_style(mut self, comment_style: CommentStyle) -> Self {
        self.options.comment_style = comment_style;
        self
    }

    #[must_use]
    pub fn section_redeclaration(mut self, behavior: SectionRedeclaration) -> Self {
        self.options.section_redeclaration = behavior;
        self
    }

    /// # Errors
    ///
    /// See [`load_config`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Config, LoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");

        // The file is closed before parsing starts.
        let buffer = fs::read(path)?;
        Ok(self.parse_bytes(&buffer)?)
    }

    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if reading fails, otherwise as [`Loader::parse_str`].
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<Config, LoadError> {
        let mut buffer = Vec::with_capacity(4096);
        _ = reader.read_to_end(&mut buffer)?;
        Ok(self.parse_bytes(&buffer)?)
    }

    /// Decode `buffer` and parse it. UTF-16 LE is detected by its byte order mark;
    /// anything else is read as UTF-8.
    ///
    /// # Errors
    ///
    /// See [`Loader::parse_str`].
    pub fn parse_bytes(&self, buffer: &[u8]) -> Result<Config, SyntaxError> {
        self.parse_str(&decode_data(buffer))
    }

    /// # Errors
    ///
    /// Returns the [`SyntaxError`] for the first line that matches no recognized form.
    pub fn parse_str(&self, text: &str) -> Result<Config, SyntaxError> {
        debug!(
            overrides = self.overrides.len(),
            comment_style = ?self.options.comment_style,
            "parsing config"
        );
        Parser::new(text, self.options, &self.overrides).into_config()
    }
}

fn decode_data(data: &[u8]) -> String {
    if let Some(data) = data.strip_prefix(BOM_UTF16_LE) {
        let utf16 = data
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<u16>>();

        char::decode_utf16(utf16)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>()
    } else {
        let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
        String::from_utf8_lossy(data).into_owned()
    }
}
