//! The toolwise decision layer.
//!
//! Given a user request and a catalog of tools, decides:
//!
//! 1. **Screening**: whether a tool is needed at all, via a three-stage
//!    decision tree driven by a classifier or a guided dialogue
//! 2. **Selection**: which of the retrieved candidates to invoke, either
//!    automatically or through an interactive chooser
//! 3. **Structured output**: how to fill a tool's parameters field by field
//!    through constrained generation
//! 4. **Token budget**: how many generation tokens remain once history and
//!    tool schemas are subtracted from the model's context window
//!
//! Every step is a sequential call into a collaborator from
//! `toolwise-core`; nothing here keeps state across requests.

pub mod budget;
pub mod guard;
pub mod pipeline;
pub mod screening;
pub mod selection;
pub mod structured;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use budget::{
    ContextWindows, HeuristicTokenizer, MessageAccounting, TokenAllocator, TokenBudget,
    TokenCounter, build_tokenizer,
};
#[cfg(feature = "tiktoken")]
pub use budget::TiktokenTokenizer;
pub use guard::{INVALID_MARKER, InvalidStep, guard};
pub use pipeline::{CandidateRouter, DecisionPipeline, Route};
pub use screening::{
    ClassifierBackend, DecisionTree, DialogueBackend, IntentScreener, ScreeningBackend, ToolNeed,
};
pub use selection::{GenerativeToolPicker, MORE_OPTION, SelectionDecision, ToolSelector};
pub use structured::{StructuredOutput, StructuredOutputAssembler, decode_escapes};
