//! lbml-grammar: types and strict validation for the LBML command grammar
//!
//! LBML is the micro-grammar the robot controller accepts: one or more
//! segments, each `D<digits><F|B|L|R>;` (straight move) or `R<digits><L|R>;`
//! (in-place rotation), with nothing before, between, or after them.
//! Matching is case-sensitive and whole-string only.

mod types;
pub use types::{render, MoveDirection, Segment, TurnDirection};

mod error;
pub use error::{GrammarError, Result};

mod validate;
pub use validate::{clean, LbmlValidator};

mod parse;
pub use parse::parse;
