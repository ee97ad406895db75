//! Configuration options for decoding and encoding.
//!
//! - [`DecodeOptions`]: header, comment marker and tabular reading policies
//! - [`EncodeOptions`]: header, comment marker and output layout
//! - [`Header`]: explicit column names, parsed from a comma-separated string
//! - [`Delimiter`]: field separator of a tabular format
//!
//! Non-tabular formats ignore the header and the tabular policies, so the same
//! options can be passed to any format.
//!
//! ## Examples
//!
//! ```rust
//! use simple_serializer::{DecodeOptions, EncodeOptions, Header};
//!
//! let input = DecodeOptions::new()
//!     .with_header(Header::parse("id,name"))
//!     .with_comment("#")
//!     .with_truncate_rows(true);
//!
//! let output = EncodeOptions::new().pretty();
//! assert!(output.pretty);
//! assert_eq!(input.header.columns(), ["id", "name"]);
//! ```

/// Field separator of a tabular format.
///
/// ```rust
/// use simple_serializer::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// Explicit column names for tabular formats.
///
/// An empty header means the column names are inferred: from the first
/// non-comment record when decoding, and from the mapping keys when encoding.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Header(Vec<String>);

impl Header {
    /// A header that asks for inference.
    #[must_use]
    pub fn inferred() -> Self {
        Header(Vec::new())
    }

    /// Parses a comma-separated list of column names.
    ///
    /// Names are trimmed. An empty or blank string yields an inferred header.
    ///
    /// ```rust
    /// use simple_serializer::Header;
    ///
    /// assert_eq!(Header::parse("a, b ,c").columns(), ["a", "b", "c"]);
    /// assert!(Header::parse("  ").is_inferred());
    /// ```
    #[must_use]
    pub fn parse(names: &str) -> Self {
        if names.trim().is_empty() {
            return Header::inferred();
        }
        Header(names.split(',').map(|name| name.trim().to_string()).collect())
    }

    #[must_use]
    pub fn is_inferred(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Header {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Header(iter.into_iter().map(Into::into).collect())
    }
}

/// Options applied while decoding the input payload.
///
/// # Examples
///
/// ```rust
/// use simple_serializer::DecodeOptions;
///
/// let options = DecodeOptions::new().with_skip_lines(1).with_limit(100);
/// assert_eq!(options.skip_lines, 1);
/// assert_eq!(options.limit, Some(100));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Column names overriding the first record
    pub header: Header,
    /// Records starting with this marker are skipped; empty disables
    pub comment: String,
    /// Accept bare quotes inside unquoted fields and after quoted fields
    pub lazy_quotes: bool,
    /// Drop fields beyond the header width instead of failing
    pub truncate_rows: bool,
    /// Physical records dropped before anything else is read
    pub skip_lines: usize,
    /// Maximum number of data rows to read
    pub limit: Option<usize>,
}

impl DecodeOptions {
    /// Creates default options: inferred header, no comment, strict quoting,
    /// no truncation, nothing skipped, no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    #[must_use]
    pub fn with_lazy_quotes(mut self, lazy_quotes: bool) -> Self {
        self.lazy_quotes = lazy_quotes;
        self
    }

    /// Sets the policy for records wider than the header.
    ///
    /// When `false` (the default) such a record is a decode error.
    #[must_use]
    pub fn with_truncate_rows(mut self, truncate_rows: bool) -> Self {
        self.truncate_rows = truncate_rows;
        self
    }

    #[must_use]
    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options applied while encoding the output payload.
///
/// # Examples
///
/// ```rust
/// use simple_serializer::{EncodeOptions, Header};
///
/// let options = EncodeOptions::new()
///     .with_header(Header::parse("b,a"))
///     .with_comment("#")
///     .with_comment_header(true);
/// assert!(options.comment_header);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// Column names and order for tabular output
    pub header: Header,
    /// Comment marker of the consumer; see [`EncodeOptions::with_comment_header`]
    pub comment: String,
    /// Write the tabular header row prefixed by the comment marker
    pub comment_header: bool,
    /// Drop mapping keys that are not in an explicit header instead of failing
    pub truncate_rows: bool,
    /// Indent nested documents
    pub pretty: bool,
    /// Sort mapping keys and inferred columns
    pub sorted: bool,
    /// Maximum number of rows or lines to write
    pub limit: Option<usize>,
}

impl EncodeOptions {
    /// Creates default options: compact, unsorted, inferred header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets pretty-printing on.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    /// Sets the comment marker.
    ///
    /// Tabular encoders quote a leading field that starts with the marker so it
    /// does not read back as a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    /// Writes the tabular header row as a comment (a metadata row).
    ///
    /// Has no effect without a comment marker.
    #[must_use]
    pub fn with_comment_header(mut self, comment_header: bool) -> Self {
        self.comment_header = comment_header;
        self
    }

    #[must_use]
    pub fn with_truncate_rows(mut self, truncate_rows: bool) -> Self {
        self.truncate_rows = truncate_rows;
        self
    }

    #[must_use]
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
