//! Completion gateway implementations for thinkloop.
//!
//! All providers implement the `thinkloop_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
