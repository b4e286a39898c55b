//! Agent patterns — structured reasoning strategies.
//!
//! 1. **ReAct** — Thought → Action → Observation loop with a visible
//!    transcript
//! 2. **Plan-and-Solve** — one decomposition, then sequential execution
//!    with accumulating context
//!
//! Both are stateless between runs: every `run` builds its own transcript
//! or execution state.

pub mod plan_solve;
pub mod react;

pub use plan_solve::{
    CompletedStep, ExecutionError, ExecutionState, Executor, PlanAndSolveAgent, PlanSolveResult,
    PlanSolveStatus, Planner,
};
pub use react::{ReactAgent, ReactResult, ReactStatus, StepTrace};

#[cfg(test)]
pub(crate) mod test_helpers;
