//! Structured output: fill a tool schema through constrained generation.
//!
//! Each field becomes one question/answer exchange appended to the
//! conversation transcript. Fields with an `enum` are answered by a forced
//! choice over exactly those options; other fields by open text ending at
//! the stop marker. Answers have trailing whitespace stripped and backslash
//! escapes resolved.
//!
//! A failed field ends assembly with `InferenceFailed`; no record with
//! guessed values is returned.

pub mod assembler;
pub mod escape;

pub use assembler::{DEFAULT_STOP_MARKER, StructuredOutput, StructuredOutputAssembler};
pub use escape::decode_escapes;
