//! Error handling for the two classes described in spec §7.
//!
//! Sink I/O errors are ordinary `Result`s; invariant violations are never
//! wrapped in a `Result` at all; they abort immediately via [`bug!`], the
//! same way `mmcc`'s lowering passes use `panic!`/`unreachable!` for
//! states that can't happen if earlier passes did their job
//! (`build_mir.rs`: `panic!("uninferred type variable {v:?}")`,
//! `unreachable!()`, `.expect("unbalanced stack")`).

/// Every sink write goes through `std::fmt::Write`, so the one failure shape
/// in this crate is `std::fmt::Error`. A dedicated error enum around a
/// single variant would be a premature abstraction for one case.
pub type EmitResult<T> = Result<T, std::fmt::Error>;

/// Abort on a violated emitter invariant (spec §7, class 1).
///
/// This is a `panic!` wrapper, not a recoverable error: invariant violations
/// mean an earlier pass (analysis, lowering) produced a tree this emitter's
/// contract says it will never see. They are never retried and never
/// surfaced to the end user as a normal diagnostic.
macro_rules! bug {
  ($($arg:tt)*) => {
    panic!("tick-codegen: internal error: {}", format_args!($($arg)*))
  };
}
pub(crate) use bug;

#[cfg(test)]
mod tests {
  #[test]
  #[should_panic(expected = "tick-codegen: internal error: missing resolved_type on Add")]
  fn bug_panics_with_prefixed_message() {
    bug!("missing resolved_type on {}", "Add");
  }
}
