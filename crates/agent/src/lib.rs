//! The orchestration core of thinkloop.
//!
//! Two controllers drive a language model through multi-step problem
//! solving:
//!
//! 1. **ReAct** ([`ReactAgent`]) — Thought → Action → Observation, one tool
//!    call per step, until the model emits `Finish[answer]` or the step
//!    budget runs out.
//! 2. **Plan-and-Solve** ([`PlanAndSolveAgent`]) — a [`Planner`] asks for
//!    an ordered decomposition once, then an [`Executor`] answers each step
//!    in order, feeding earlier results into later prompts.
//!
//! Both talk to the model only through `thinkloop_core::Provider`, and
//! turn the model's free text into decisions with the parsers in
//! [`protocol`].

pub mod patterns;
pub mod prompts;
pub mod protocol;
pub mod transcript;

pub use patterns::{
    CompletedStep, ExecutionError, ExecutionState, Executor, PlanAndSolveAgent, PlanSolveResult,
    PlanSolveStatus, Planner, ReactAgent, ReactResult, ReactStatus, StepTrace,
};
pub use protocol::{Decision, ParsedStep, PlanParseError, parse_action, parse_plan, parse_step};
pub use transcript::{Transcript, TranscriptEntry};
