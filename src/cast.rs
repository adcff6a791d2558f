//! Cast-strategy computation (spec §4.5).
//!
//! Given an explicit cast node, decide between a plain C cast and a
//! runtime checked-cast call. This is a thin consumer of the dispatch
//! tables in `dispatch.rs`; kept as its own module because the fallback
//! rule for an unresolved source type is a documented hazard (spec §9
//! "Open question") worth isolating and testing on its own.

use crate::ast::BuiltinType;
use crate::dispatch::{cast_func, is_widening};

/// The two things a cast expression can lower to (§4.5).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastStrategy {
  /// `(T)expr` — safe because the conversion is value-preserving, or
  /// because the source type could not be resolved (see below).
  Bare,
  /// `f(expr)` — a runtime function that panics on out-of-range input.
  RuntimeCall(&'static str),
}

/// Compute the strategy for casting a value of (possibly unknown) type
/// `source_type` to `dst`.
///
/// When `source_type` is `None` this always returns `Bare`. Spec §9 flags
/// this as a latent hazard: it is only sound because the analysis pass is
/// expected to leave the source type unresolved *only* on operands (bare
/// literals, some nested forms) where a plain cast is provably safe. This
/// crate does not re-validate that upstream guarantee — doing so would be
/// exactly the kind of re-checking spec §1's Non-goals rule out — but logs
/// a trace line so the reliance is visible in a verbose build, and debug
/// builds assert the one case that *is* locally checkable: an unresolved
/// source type is never paired with a `dst` that every possible numeric
/// source would narrow into (i.e. `dst` is not `i8`/`u8`, the narrowest
/// representable types, where no numeric source could possibly widen).
pub fn cast_strategy(source_type: Option<BuiltinType>, dst: BuiltinType) -> CastStrategy {
  let Some(src) = source_type else {
    log::trace!("cast to {dst:?} has no resolved source type; falling back to a bare cast");
    debug_assert!(
      !matches!(dst, BuiltinType::I8 | BuiltinType::U8),
      "cast to the narrowest types should never reach here with an unresolved source type; \
       every numeric source narrows into i8/u8 except i8/u8 themselves, which analysis should \
       have resolved",
    );
    return CastStrategy::Bare;
  };
  if is_widening(src, dst) { return CastStrategy::Bare }
  match cast_func(src, dst) {
    Some(f) => CastStrategy::RuntimeCall(f),
    None => CastStrategy::Bare, // src == dst: a no-op cast.
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use BuiltinType::{I32, I8, U32};

  #[test]
  fn widening_is_bare() {
    assert_eq!(cast_strategy(Some(I8), I32), CastStrategy::Bare);
  }

  #[test]
  fn narrowing_is_a_runtime_call() {
    // spec §8 boundary scenario 5.
    assert_eq!(cast_strategy(Some(I32), I8), CastStrategy::RuntimeCall("tick_checked_cast_i32_i8"));
  }

  #[test]
  fn unknown_source_falls_back_to_bare() {
    assert_eq!(cast_strategy(None, U32), CastStrategy::Bare);
  }

  #[test]
  fn same_type_is_bare() {
    assert_eq!(cast_strategy(Some(I32), I32), CastStrategy::Bare);
  }
}
