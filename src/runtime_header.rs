//! The bundled runtime header (spec §6.2, §6.3): the ABI contract every
//! generated translation unit links against. Embedded at compile time so
//! the header file this crate produces is self-contained — callers never
//! need to ship `tick_runtime.h` alongside the generated output.

/// The full text of `runtime/tick_runtime.h`, inserted verbatim into the
/// generated header file immediately after `#pragma once` (§4.8).
pub const RUNTIME_HEADER_TEXT: &str = include_str!("../runtime/tick_runtime.h");

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_header_declares_the_runtime_abi() {
    assert!(RUNTIME_HEADER_TEXT.contains("TickSlice"));
    assert!(RUNTIME_HEADER_TEXT.contains("tick_checked_cast_i32_i8"));
    assert!(RUNTIME_HEADER_TEXT.contains("tick_slice_index_ptr"));
    assert!(RUNTIME_HEADER_TEXT.contains("TICK_UNUSED"));
  }
}
