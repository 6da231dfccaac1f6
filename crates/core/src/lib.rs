//! # toolwise Core
//!
//! Domain types, collaborator traits, and error definitions for the toolwise
//! decision layer. This crate does no I/O of its own — it defines the
//! vocabulary that the decision components and their backends agree on.
//!
//! ## Design Philosophy
//!
//! Every external capability (zero-shot classifier, constrained generator,
//! similarity search, interactive chooser, tokenizer) is a trait here.
//! Implementations live with whoever owns the backend. This enables:
//! - Swapping backends via configuration
//! - Testing every decision path with scripted stubs
//! - Clean dependency graph (all crates depend inward on core)

pub mod chooser;
pub mod error;
pub mod inference;
pub mod message;
pub mod record;
pub mod search;
pub mod tokenizer;
pub mod tool;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use chooser::{ChoiceRequest, Chooser};
pub use error::{Error, Result};
pub use inference::{Classifier, ConstrainedGenerator};
pub use message::{Conversation, PromptMessage, Role};
pub use record::StructuredRecord;
pub use search::{SimilaritySearch, ToolCandidate};
pub use tokenizer::Tokenizer;
pub use tool::{FieldMap, FieldSpec, ParameterSchema, ToolCatalog, ToolSchema};
pub use transcript::{Transcript, to_chatml};
