//! Interned identifiers used throughout the lowered AST.
//!
//! The analysis and lowering passes that produce the AST this crate consumes
//! intern every user-written name exactly once; this module is the
//! corresponding interner on the codegen side, following the shape of the
//! `Symbol`/`intern` pair `mmcc`'s entity table builds on top of
//! (`types::entity::make_prims!`'s `from_symbol`/`as_symbol` helpers), but
//! generalized to arbitrary user identifiers rather than a closed primitive
//! set.

use std::cell::RefCell;
use std::fmt;
use hashbrown::HashMap;

/// An interned string. Two `Symbol`s compare equal iff they were interned
/// from equal strings; comparison and hashing are by index, not by content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

struct Interner {
  map: HashMap<Box<str>, u32>,
  strings: Vec<Box<str>>,
}

impl Interner {
  fn new() -> Self { Self { map: HashMap::new(), strings: Vec::new() } }

  fn intern(&mut self, s: &str) -> Symbol {
    if let Some(&id) = self.map.get(s) { return Symbol(id) }
    let id = u32::try_from(self.strings.len()).expect("too many interned symbols");
    self.strings.push(s.into());
    self.map.insert(s.into(), id);
    Symbol(id)
  }

  fn resolve(&self, sym: Symbol) -> &str { &self.strings[sym.0 as usize] }
}

thread_local! {
  static INTERNER: RefCell<Interner> = RefCell::new(Interner::new());
}

/// Intern a string, returning the `Symbol` for it. Interning the same text
/// twice returns the same `Symbol`.
#[must_use] pub fn intern(s: &str) -> Symbol {
  INTERNER.with(|i| i.borrow_mut().intern(s))
}

impl Symbol {
  /// Run `f` with the underlying string. Kept as a callback rather than
  /// returning a borrow so the thread-local's `RefCell` is never held across
  /// a caller's control flow.
  pub fn with_str<R>(self, f: impl FnOnce(&str) -> R) -> R {
    INTERNER.with(|i| f(i.borrow().resolve(self)))
  }

  /// Copy out the underlying string. Prefer [`Symbol::with_str`] on hot
  /// paths; this exists for convenient `Display`/`format!` use.
  #[must_use] pub fn to_owned_string(self) -> String {
    self.with_str(str::to_owned)
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.with_str(|s| f.write_str(s))
  }
}

impl fmt::Debug for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.with_str(|s| write!(f, "Symbol({s:?})"))
  }
}
