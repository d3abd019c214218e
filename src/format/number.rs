//! Number notation of the standard serializer.
//!
//! `serde_json` writes floats the way Rust prints them (`1.0`, `1e21`). The
//! standard serializer drops integral fractions and switches to exponent form
//! only outside `1e-7 <= |x| < 1e21`, with an explicit exponent sign:
//!
//! | value | serde_json | here |
//! |-------|------------|------|
//! | `1.0` | `1.0` | `1` |
//! | `1e20` | `1e20` | `100000000000000000000` |
//! | `1e21` | `1e21` | `1e+21` |
//! | `1.5e-7` | `1.5e-7` | `1.5e-7` |
//! | `-0.0` | `-0.0` | `0` |
//!
//! Digits and layout come from `ryu_js`, the ECMAScript-notation build of `ryu`.

use std::io;

use serde_json::ser::Formatter;

/// Format a number in the standard serializer's notation.
///
/// Non-finite values have no JSON notation and format as `null`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        // Covers negative zero.
        return "0".to_string();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format_finite(value).to_string()
}

/// Wraps a `serde_json` formatter, replacing only its float notation.
pub struct HostNumberFormatter<F> {
    inner: F,
}

impl<F: Formatter> HostNumberFormatter<F> {
    /// Wrap a formatter.
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for HostNumberFormatter<F> {
    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        writer.write_all(format_number(f64::from(value)).as_bytes())
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        if !value.is_finite() || value == 0.0 {
            return writer.write_all(format_number(value).as_bytes());
        }
        let mut buffer = ryu_js::Buffer::new();
        writer.write_all(buffer.format_finite(value).as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
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

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}
