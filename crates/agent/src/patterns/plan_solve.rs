//! Plan-and-Solve pattern — decompose once, then execute step by step.
//!
//! The [`Planner`] asks the model for an ordered list of sub-tasks. The
//! [`Executor`] then walks that list strictly in order, one model call per
//! step, feeding every earlier `{step, result}` pair into later prompts.
//! The last step's result is the answer.
//!
//! An unusable plan (missing fence, malformed list, no steps) ends the run
//! before any step executes. A gateway failure at any point ends it
//! immediately; nothing is retried, and steps that already finished are
//! kept in the result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thinkloop_core::error::ProviderError;
use thinkloop_core::message::Message;
use thinkloop_core::provider::{CompletionOptions, Provider};
use tracing::{debug, info, warn};

use crate::prompts;
use crate::protocol::{parse_plan, render_list};

/// History placeholder used before any step has completed.
pub const EMPTY_HISTORY: &str = "none";

/// Produces a plan from a question.
pub struct Planner {
    provider: Arc<dyn Provider>,
    options: CompletionOptions,
}

impl Planner {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Ask for a decomposition of `question`.
    ///
    /// A response that cannot be parsed yields an empty plan; only a
    /// gateway failure is an error.
    pub async fn plan(&self, question: &str) -> Result<Vec<String>, ProviderError> {
        let messages = [Message::user(prompts::planner_prompt(question))];

        info!("Generating plan");
        let response = self.provider.complete(&messages, &self.options).await?;
        debug!(response = %response, "Planner response");

        match parse_plan(&response) {
            Ok(plan) => {
                info!(steps = plan.len(), "Plan generated");
                Ok(plan)
            }
            Err(e) => {
                warn!(error = %e, raw = %response, "Failed to parse plan");
                Ok(Vec::new())
            }
        }
    }
}

/// A finished plan step and what the model answered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedStep {
    pub step: String,
    pub result: String,
}

/// Rolling state of an execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub completed_steps: Vec<CompletedStep>,
    /// Result of the most recent step; the answer once all steps ran.
    pub last_result: String,
}

impl ExecutionState {
    /// Render the history embedded into executor prompts.
    pub fn history(&self) -> String {
        if self.completed_steps.is_empty() {
            return EMPTY_HISTORY.to_string();
        }
        self.completed_steps
            .iter()
            .enumerate()
            .map(|(i, c)| format!("Step {}: {}\nResult: {}\n\n", i + 1, c.step, c.result))
            .collect()
    }

    fn record(&mut self, step: &str, result: String) {
        self.completed_steps.push(CompletedStep {
            step: step.to_string(),
            result: result.clone(),
        });
        self.last_result = result;
    }
}

/// A step's gateway call failed; `state` holds the steps before it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("step {} failed: {source}", .state.completed_steps.len() + 1)]
pub struct ExecutionError {
    pub state: ExecutionState,
    pub source: ProviderError,
}

/// Executes a plan one step at a time.
pub struct Executor {
    provider: Arc<dyn Provider>,
    options: CompletionOptions,
}

impl Executor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every step of `plan` in order.
    ///
    /// Empty results are kept as-is and passed on to later steps.
    pub async fn execute(
        &self,
        question: &str,
        plan: &[String],
    ) -> Result<ExecutionState, ExecutionError> {
        let rendered_plan = render_list(plan);
        let mut state = ExecutionState::default();

        info!(steps = plan.len(), "Executing plan");

        for (i, step) in plan.iter().enumerate() {
            info!(step = i + 1, total = plan.len(), task = %step, "Executing step");

            let prompt = prompts::executor_prompt(question, &rendered_plan, &state.history(), step);
            let messages = [Message::user(prompt)];

            let result = match self.provider.complete(&messages, &self.options).await {
                Ok(result) => result,
                Err(source) => {
                    warn!(step = i + 1, error = %source, "Step failed");
                    return Err(ExecutionError { state, source });
                }
            };

            debug!(step = i + 1, result = %result, "Step completed");
            state.record(step, result);
        }

        Ok(state)
    }
}

/// How a Plan-and-Solve run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSolveStatus {
    Completed,
    /// The planner produced no usable steps.
    PlanningFailed,
    GatewayError(String),
}

#[derive(Debug, Clone)]
pub struct PlanSolveResult {
    pub status: PlanSolveStatus,
    pub plan: Vec<String>,
    pub completed_steps: Vec<CompletedStep>,
    /// Present only when `status` is [`PlanSolveStatus::Completed`].
    pub answer: Option<String>,
}

/// Planner and Executor sharing one provider.
pub struct PlanAndSolveAgent {
    planner: Planner,
    executor: Executor,
}

impl PlanAndSolveAgent {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            planner: Planner::new(provider.clone()),
            executor: Executor::new(provider),
        }
    }

    pub fn with_planner_options(mut self, options: CompletionOptions) -> Self {
        self.planner = self.planner.with_options(options);
        self
    }

    pub fn with_executor_options(mut self, options: CompletionOptions) -> Self {
        self.executor = self.executor.with_options(options);
        self
    }

    pub async fn run(&self, question: &str) -> Option<String> {
        self.run_traced(question).await.answer
    }

    pub async fn run_traced(&self, question: &str) -> PlanSolveResult {
        info!(question = %question, "Plan-and-Solve starting");

        let plan = match self.planner.plan(question).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Planning failed");
                return PlanSolveResult {
                    status: PlanSolveStatus::GatewayError(e.to_string()),
                    plan: Vec::new(),
                    completed_steps: Vec::new(),
                    answer: None,
                };
            }
        };

        if plan.is_empty() {
            warn!("Failed to generate a valid plan");
            return PlanSolveResult {
                status: PlanSolveStatus::PlanningFailed,
                plan,
                completed_steps: Vec::new(),
                answer: None,
            };
        }

        match self.executor.execute(question, &plan).await {
            Ok(state) => {
                info!(steps = state.completed_steps.len(), "Plan-and-Solve completed");
                PlanSolveResult {
                    status: PlanSolveStatus::Completed,
                    plan,
                    completed_steps: state.completed_steps,
                    answer: Some(state.last_result),
                }
            }
            Err(ExecutionError { state, source }) => PlanSolveResult {
                status: PlanSolveStatus::GatewayError(source.to_string()),
                plan,
                completed_steps: state.completed_steps,
                answer: None,
            },
        }
    }
}
