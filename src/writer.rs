//! The byte-sink abstraction (spec §2 "Writer adapter", §5).
//!
//! Every other component writes through an [`EmitCtx`], never directly to a
//! raw sink, so that indentation and `#line` bookkeeping stay centralized.
//! The shape — a small mutable context carrying the sink plus a couple of
//! cursor fields, passed by `&mut` rather than hidden in thread-local or
//! process-wide state — mirrors `mmcc`'s `InstSink`
//! (`codegen.rs`): `{linked, proc, buf, proc_start, local_rip, rodata_start}`
//! is exactly this kind of per-output-stream context, just for byte output
//! instead of text. Spec §5 makes the "no hidden global state" requirement
//! explicit: `{sink, source_filename, last_emitted_line}` must be passed
//! explicitly so the emitter stays reentrant and testable with a
//! string-accumulating sink.

use std::fmt::{self, Write};
use crate::error::EmitResult;

/// Adapts an `std::io::Write` (e.g. a file) into the `std::fmt::Write` sinks
/// this crate emits through. The emitter itself is pure-text (spec §6.2:
/// "Two text streams"); I/O-sink callers go through this shim rather than
/// the emitter knowing about bytes at all.
pub struct IoSink<W>(pub W);

impl<W: std::io::Write> Write for IoSink<W> {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
  }
}

const INDENT_UNIT: &str = "  ";

/// Per-sink emission context: the sink itself, the filename used in
/// `#line` directives, and the last line number emitted so those
/// directives are only written when the source line actually changes
/// (§4.7, §9 "Source line directives").
///
/// The sink is a `&mut dyn Write` rather than a generic parameter so that
/// every downstream emitter function (naming, types, declarators,
/// expressions, statements) takes a plain `&mut EmitCtx<'_>` instead of
/// propagating a sink type parameter through the whole call tree — the
/// same flattening the teacher's `InstSink` gets for free by being
/// concrete over `&mut dyn Write` at its `write_to` boundary.
pub struct EmitCtx<'a> {
  sink: &'a mut dyn Write,
  source_filename: &'a str,
  last_emitted_line: Option<u32>,
  indent_level: u32,
}

impl<'a> EmitCtx<'a> {
  #[must_use] pub fn new(sink: &'a mut dyn Write, source_filename: &'a str) -> Self {
    Self { sink, source_filename, last_emitted_line: None, indent_level: 0 }
  }

  pub fn indent(&mut self) { self.indent_level += 1; }
  pub fn dedent(&mut self) {
    self.indent_level = self.indent_level.checked_sub(1)
      .unwrap_or_else(|| crate::error::bug!("dedent below zero"));
  }

  /// Two spaces per level (§4.7).
  pub fn write_indent(&mut self) -> EmitResult<()> {
    for _ in 0..self.indent_level { self.sink.write_str(INDENT_UNIT)?; }
    Ok(())
  }

  pub fn write_str(&mut self, s: &str) -> EmitResult<()> { self.sink.write_str(s) }

  pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> EmitResult<()> {
    self.sink.write_fmt(args)
  }

  pub fn newline(&mut self) -> EmitResult<()> { self.sink.write_char('\n') }

  /// Emit `#line N "file"` iff `line` differs from the last line emitted
  /// through this context. Lazy by construction: callers simply call this
  /// before every statement and the dedup happens here (§9).
  pub fn line_directive(&mut self, line: u32) -> EmitResult<()> {
    if self.last_emitted_line == Some(line) { return Ok(()) }
    self.write_indent()?;
    write!(self.sink, "#line {line} \"{}\"\n", self.source_filename)?;
    self.last_emitted_line = Some(line);
    Ok(())
  }
}
