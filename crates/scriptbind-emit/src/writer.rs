//! Indented text output.
//!
//! [`CodeWriter`] is the single output buffer every emitter appends to. It
//! tracks the current indentation depth so emitters can write lines without
//! computing prefixes themselves.
//!
//! # Example
//!
//! ```
//! use scriptbind_emit::CodeWriter;
//!
//! let mut out = CodeWriter::new();
//! out.line("int f()");
//! out.open();
//! out.line("return 0;");
//! out.close();
//!
//! assert_eq!(out.finish(), "int f()\n{\n    return 0;\n}\n");
//! ```

/// Line-oriented output buffer with indentation tracking.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    output: String,
    depth: usize,
    indent_width: usize,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    /// Create a writer indenting by four spaces.
    pub fn new() -> Self {
        Self::with_indent_width(4)
    }

    /// Create a writer with a custom indent width.
    pub fn with_indent_width(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            depth: 0,
            indent_width,
        }
    }

    /// Write one line at the current depth.
    ///
    /// Empty lines are written without trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.push_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Write an opening brace and indent.
    pub fn open(&mut self) {
        self.line("{");
        self.indent();
    }

    /// Dedent and write a closing brace.
    pub fn close(&mut self) {
        self.dedent();
        self.line("}");
    }

    /// Increase the indentation depth.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease the indentation depth.
    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent below column zero");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consume the writer, returning its text.
    pub fn finish(self) -> String {
        self.output
    }

    fn push_indent(&mut self) {
        let width = self.depth * self.indent_width;
        self.output.extend(std::iter::repeat_n(' ', width));
    }
}
