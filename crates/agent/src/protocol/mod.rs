//! Text protocols spoken with the model.
//!
//! The model answers in free text; these parsers are the only place that
//! text is turned into structured decisions:
//!
//! - [`react`] — `Thought:` / `Action:` sections and the
//!   `Finish[...]` / `Tool[...]` action shapes
//! - [`plan`] — a fenced list literal holding the plan steps

pub mod plan;
pub mod react;

pub use plan::{PlanParseError, parse_plan, render_list};
pub use react::{Decision, ParsedStep, parse_action, parse_step};
