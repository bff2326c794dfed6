//! Standardized agent input model and codecs
//!
//! This crate defines the polymorphic input handed to an LLM-backed
//! agent — plain text, multi-modal content blocks, or a message-based
//! conversation — together with the two codecs that move it across
//! system boundaries: a compact binary wire form for node-to-node
//! transport and a document form with heuristic shape detection for
//! client-facing payloads. The design philosophy keeps decoding
//! structural and validation semantic: a decode either fully constructs
//! a value or fails, and the separate validator enforces the per-shape
//! invariants regardless of how a value was produced.
//!
//! ## Features
//!
//! - **Tagged input shapes**: [`AgentInput`] is an enum, so "what shape
//!   is this" is a compile-time-exhaustive `match`
//! - **Binary codec**: symmetric, round-trip-safe encode/decode over a
//!   caller-supplied stream
//! - **Document codec**: field-presence-driven disambiguation of
//!   messages vs content blocks, with serde integration
//! - **Validation**: pure, fail-fast invariant checks
//! - **Text extraction**: derives the prompt-ready question string from
//!   any input shape
//!
//! ## Example
//!
//! ```rust
//! use tessera_input::{extract_question_text, validate, AgentInput};
//!
//! let input: AgentInput = serde_json::from_str("\"What is the weather?\"").unwrap();
//! validate(&input).unwrap();
//! assert_eq!(extract_question_text(&input).unwrap(), "What is the weather?");
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod types;
pub mod validate;
pub mod wire;

pub use error::{InputError, Result};
pub use extract::{extract_question_text, filter_trailing_user_messages};
pub use types::{
    AgentInput, ContentBlock, ContentType, InputKind, MediaContent, Message, SourceType, ToolCall,
    ToolFunction,
};
pub use validate::{validate, validate_conversation};
