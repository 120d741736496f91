// kernel.json serialization
// Sorted keys, fixed indentation, optional ASCII-only escaping, no trailing newline.

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use std::io;

use kernelspec_sync_core::application::constants::DEFAULT_INDENT;

/// Renders spec documents byte-for-byte deterministically
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelJsonWriter {
    indent: usize,
    ensure_ascii: bool,
}

impl KernelJsonWriter {
    pub fn new(indent: usize, ensure_ascii: bool) -> Self {
        Self {
            indent,
            ensure_ascii,
        }
    }

    /// Serialize a document
    ///
    /// Key order comes from the document itself; `serde_json::Value` objects
    /// are sorted maps.
    pub fn render(&self, document: &Value) -> serde_json::Result<Vec<u8>> {
        let indent = vec![b' '; self.indent];
        let formatter = AsciiPrettyFormatter {
            inner: PrettyFormatter::with_indent(&indent),
            ensure_ascii: self.ensure_ascii,
        };

        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut serializer)?;
        Ok(buf)
    }
}

impl Default for KernelJsonWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT, true)
    }
}

/// PrettyFormatter that can escape everything outside printable ASCII
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
    ensure_ascii: bool,
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    // Fragments never contain quotes, backslashes or control characters;
    // serde_json routes those through write_char_escape.
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
