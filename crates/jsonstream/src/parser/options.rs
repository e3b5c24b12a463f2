/// Default upper bound on the size of one chunk read from the source.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Configuration options for the streaming JSON parser.
///
/// # Default
///
/// Both flags default to `false`; `chunk_size` defaults to
/// [`DEFAULT_CHUNK_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to skip `// line` and `/* block */` comments between tokens.
    ///
    /// When `false`, a `/` outside a string is a
    /// [`LexicalError::CommentsNotAllowed`](crate::LexicalError::CommentsNotAllowed).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether to parse multiple JSON values in a single input stream.
    ///
    /// When `true`, each completed root value is followed by the events of the
    /// next one, if any. This supports formats such as JSON Lines (JSONL) and
    /// newline-delimited JSON (ND-JSON), and arbitrary concatenation of JSON
    /// values.
    ///
    /// # Examples
    ///
    /// ```json
    /// {}{}{}
    /// ```
    ///
    /// ```json
    /// 123 45 678 9
    /// ```
    ///
    /// When `false`, any token after the root value is a
    /// [`GrammarError::TrailingContent`](crate::GrammarError::TrailingContent).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_json_values: bool,

    /// Upper bound on the bytes pulled from the source per chunk.
    ///
    /// A chunk also ends after a newline, so line-oriented input is handed to
    /// the scanner one line at a time. Zero is treated as one.
    ///
    /// # Default
    ///
    /// [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_comments: false,
            allow_multiple_json_values: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ParserOptions {
    /// Returns the options with `chunk_size` replaced.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
