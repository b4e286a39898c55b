//! # thinkloop Core
//!
//! Domain types, traits, and error definitions for the thinkloop agent runtime.
//! This crate has **no HTTP or CLI dependencies** — it defines the seams
//! that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two collaborators the controllers talk to are traits here:
//! - [`Provider`] — the completion gateway (whole-response or streamed text)
//! - [`Tool`] — a named capability turning input text into an observation
//!
//! Implementations live in `thinkloop-providers` and `thinkloop-tools`,
//! and tests substitute scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{Message, Role};
pub use provider::{CompletionOptions, Provider, TextStream};
pub use tool::{Tool, ToolRegistry};
