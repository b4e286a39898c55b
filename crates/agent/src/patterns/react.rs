//! ReAct pattern — Thought → Action → Observation loop.
//!
//! Each step renders the ReAct template (tool catalog, question, transcript
//! so far), asks the model for one response and parses it into a
//! [`Decision`]:
//!
//! - `Finish[answer]` ends the run with that answer;
//! - `Tool[input]` dispatches to the registry and records the action and
//!   its observation in the transcript;
//! - a malformed action records a format complaint and costs one step;
//! - a response without any `Action:` ends the run.
//!
//! The loop is bounded by `max_steps`; running out of steps yields no
//! answer. Gateway failures are never retried.

use std::sync::Arc;

use thinkloop_core::message::Message;
use thinkloop_core::provider::{CompletionOptions, Provider};
use thinkloop_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

use crate::prompts;
use crate::protocol::{Decision, parse_step};
use crate::transcript::Transcript;

/// Step budget used when none is configured.
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Observation recorded when the action text matches no known shape.
pub const MALFORMED_ACTION_OBSERVATION: &str = "Invalid Action format, please check.";

/// How a ReAct run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactStatus {
    /// The model emitted `Finish[...]`.
    Finished,
    /// The gateway failed or returned no text.
    GatewayError(String),
    /// The response carried no `Action:` section.
    ParseFailure,
    /// `max_steps` responses without a finish.
    StepLimitExceeded,
}

/// The result of a ReAct execution.
#[derive(Debug, Clone)]
pub struct ReactResult {
    pub status: ReactStatus,
    /// Present only when `status` is [`ReactStatus::Finished`].
    pub answer: Option<String>,
    /// Number of model responses consumed (always `<= max_steps`).
    pub steps: usize,
    /// One entry per model response, in order.
    pub trace: Vec<StepTrace>,
    pub transcript: Transcript,
}

impl ReactResult {
    /// Every `Thought:` section, in order.
    pub fn thoughts(&self) -> Vec<&str> {
        self.trace.iter().filter_map(|t| t.thought.as_deref()).collect()
    }
}

/// What one step produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTrace {
    /// 1-based step number.
    pub step: usize,
    pub thought: Option<String>,
    pub action: Option<String>,
    /// Absent for a finishing step or a response without an action.
    pub observation: Option<String>,
}

pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    max_steps: usize,
    options: CompletionOptions,
}

impl ReactAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tools,
            max_steps: DEFAULT_MAX_STEPS,
            options: CompletionOptions::default(),
        }
    }

    /// Set the step budget. Values below 1 are raised to 1.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Generation options sent with every step.
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run the loop and return only the answer.
    pub async fn run(&self, question: &str) -> Option<String> {
        self.run_traced(question).await.answer
    }

    /// Run the loop and return the full trace.
    pub async fn run_traced(&self, question: &str) -> ReactResult {
        let catalog = self.tools.describe_all();
        let mut transcript = Transcript::new();
        let mut trace = Vec::new();

        info!(
            provider = self.provider.name(),
            max_steps = self.max_steps,
            tools = self.tools.len(),
            "ReAct loop starting"
        );

        for step in 1..=self.max_steps {
            info!(step, max_steps = self.max_steps, "ReAct step");

            let prompt = prompts::react_prompt(&catalog, question, &transcript.render());
            let messages = [Message::user(prompt)];

            let text = match self.provider.complete(&messages, &self.options).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    warn!(step, "Model returned an empty response");
                    return done(
                        ReactStatus::GatewayError("model returned an empty response".into()),
                        step,
                        trace,
                        transcript,
                    );
                }
                Err(e) => {
                    warn!(step, error = %e, "Completion failed");
                    return done(
                        ReactStatus::GatewayError(e.to_string()),
                        step,
                        trace,
                        transcript,
                    );
                }
            };

            let parsed = parse_step(&text);
            match &parsed.thought {
                Some(thought) => debug!(step, thought = %thought, "Thought"),
                None => debug!(step, "Response has no Thought section"),
            }
            let mut entry = StepTrace {
                step,
                thought: parsed.thought,
                action: parsed.action,
                observation: None,
            };

            match parsed.decision {
                Decision::Finish(answer) => {
                    info!(step, "ReAct loop finished");
                    trace.push(entry);
                    let mut result = done(ReactStatus::Finished, step, trace, transcript);
                    result.answer = Some(answer);
                    return result;
                }
                Decision::ToolCall { name, input } => {
                    let observation = self.dispatch(&name, &input).await;
                    debug!(step, tool = %name, observation = %observation, "Observation");
                    transcript.push_action(entry.action.clone().unwrap_or_default());
                    transcript.push_observation(observation.clone());
                    entry.observation = Some(observation);
                }
                Decision::Malformed => {
                    warn!(
                        step,
                        action = entry.action.as_deref().unwrap_or_default(),
                        "Malformed action"
                    );
                    transcript.push_observation(MALFORMED_ACTION_OBSERVATION);
                    entry.observation = Some(MALFORMED_ACTION_OBSERVATION.to_string());
                }
                Decision::Think => {
                    warn!(step, "Failed to parse a valid Action");
                    trace.push(entry);
                    return done(ReactStatus::ParseFailure, step, trace, transcript);
                }
            }
            trace.push(entry);
        }

        warn!(max_steps = self.max_steps, "Step limit reached without a final answer");
        done(
            ReactStatus::StepLimitExceeded,
            self.max_steps,
            trace,
            transcript,
        )
    }

    async fn dispatch(&self, name: &str, input: &str) -> String {
        match self.tools.lookup(name) {
            Some(tool) => {
                debug!(tool = %name, input = %input, "Invoking tool");
                tool.invoke(input).await
            }
            None => {
                warn!(tool = %name, "Tool not found");
                format!("Error: Tool '{name}' not found.")
            }
        }
    }
}

fn done(
    status: ReactStatus,
    steps: usize,
    trace: Vec<StepTrace>,
    transcript: Transcript,
) -> ReactResult {
    ReactResult {
        status,
        answer: None,
        steps,
        trace,
        transcript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::*;
    use crate::transcript::TranscriptEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn search_registry(calls: Arc<AtomicUsize>) -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register_fn("Search", "A web search engine.", move |q: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            format!("results for {q}")
        });
        Arc::new(registry)
    }

    fn agent(provider: &Arc<SequentialMockProvider>, tools: Arc<ToolRegistry>) -> ReactAgent {
        ReactAgent::new(provider.clone(), tools)
    }

    #[tokio::test]
    async fn search_then_finish() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: I need to look up X.\nAction: Search[X model]",
            "Thought: I know enough.\nAction: Finish[X is a model that matters]",
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls.clone()));

        let result = agent
            .run_traced("What model is X, and why does it matter?")
            .await;

        assert_eq!(result.status, ReactStatus::Finished);
        assert_eq!(result.answer.as_deref(), Some("X is a model that matters"));
        assert_eq!(result.steps, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            result.thoughts(),
            vec!["I need to look up X.", "I know enough."]
        );
        assert_eq!(
            result.transcript.entries(),
            &[
                TranscriptEntry::Action("Search[X model]".into()),
                TranscriptEntry::Observation("results for X model".into()),
            ]
        );

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, thinkloop_core::Role::User);
        assert!(requests[0].prompt().contains("- Search: A web search engine."));
        assert!(requests[0].prompt().contains("History: \n"));
        assert!(requests[1].prompt().contains(
            "History: Action: Search[X model]\nObservation: results for X model\n"
        ));
    }

    #[tokio::test]
    async fn trace_pairs_each_thought_with_its_action() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: look it up\nAction: Search[GPU]",
            "Thought: garbled\nAction: what now",
            "Action: Finish[H100]",
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls));

        let result = agent.run_traced("Latest GPU?").await;

        assert_eq!(
            result.trace,
            vec![
                StepTrace {
                    step: 1,
                    thought: Some("look it up".into()),
                    action: Some("Search[GPU]".into()),
                    observation: Some("results for GPU".into()),
                },
                StepTrace {
                    step: 2,
                    thought: Some("garbled".into()),
                    action: Some("what now".into()),
                    observation: Some(MALFORMED_ACTION_OBSERVATION.into()),
                },
                StepTrace {
                    step: 3,
                    thought: None,
                    action: Some("Finish[H100]".into()),
                    observation: None,
                },
            ]
        );
        assert_eq!(result.thoughts(), vec!["look it up", "garbled"]);
    }

    #[tokio::test]
    async fn run_returns_answer_only() {
        let provider = Arc::new(SequentialMockProvider::texts(&["Action: Finish[42]"]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new()));
        assert_eq!(agent.run("6 * 7?").await.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn step_limit_yields_no_answer() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: a\nAction: Search[a]",
            "Thought: b\nAction: Search[b]",
            "Thought: c\nAction: Search[c]",
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls.clone())).with_max_steps(3);

        let result = agent.run_traced("endless").await;

        assert_eq!(result.status, ReactStatus::StepLimitExceeded);
        assert_eq!(result.answer, None);
        assert_eq!(result.steps, 3);
        assert_eq!(provider.call_count(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.transcript.len(), 6);
    }

    #[tokio::test]
    async fn malformed_action_consumes_a_step() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: hmm\nAction: I am thinking",
            "Thought: right\nAction: Finish[done]",
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls.clone()));

        let result = agent.run_traced("q").await;

        assert_eq!(result.status, ReactStatus::Finished);
        assert_eq!(result.steps, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            result.transcript.entries(),
            &[TranscriptEntry::Observation(MALFORMED_ACTION_OBSERVATION.into())]
        );
        assert!(provider.requests()[1]
            .prompt()
            .contains("History: Observation: Invalid Action format, please check.\n"));
    }

    #[tokio::test]
    async fn malformed_actions_until_limit() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Action: nope",
            "Action: still nope",
        ]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new())).with_max_steps(2);

        let result = agent.run_traced("q").await;
        assert_eq!(result.status, ReactStatus::StepLimitExceeded);
        assert_eq!(result.steps, 2);
        assert_eq!(result.transcript.len(), 2);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_observation() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: try it\nAction: Calculator[2+2]",
            "Action: Finish[4]",
        ]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new()));

        let result = agent.run_traced("2+2?").await;

        assert_eq!(result.answer.as_deref(), Some("4"));
        assert_eq!(
            result.transcript.entries(),
            &[
                TranscriptEntry::Action("Calculator[2+2]".into()),
                TranscriptEntry::Observation("Error: Tool 'Calculator' not found.".into()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_action_is_terminal() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Thought: I will just ramble",
        ]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new()));

        let result = agent.run_traced("q").await;

        assert_eq!(result.status, ReactStatus::ParseFailure);
        assert_eq!(result.answer, None);
        assert_eq!(result.steps, 1);
        assert_eq!(result.thoughts(), vec!["I will just ramble"]);
        assert_eq!(result.trace.len(), 1);
        assert_eq!(result.trace[0].action, None);
    }

    #[tokio::test]
    async fn gateway_error_is_terminal() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            Ok("Thought: a\nAction: Search[a]".into()),
            Err(api_error("upstream down")),
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls));

        let result = agent.run_traced("q").await;

        assert!(
            matches!(&result.status, ReactStatus::GatewayError(cause) if cause.contains("upstream down"))
        );
        assert_eq!(result.answer, None);
        assert_eq!(result.steps, 2);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_response_is_gateway_error() {
        let provider = Arc::new(SequentialMockProvider::texts(&["   \n"]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new()));

        let result = agent.run_traced("q").await;
        assert!(matches!(result.status, ReactStatus::GatewayError(_)));
        assert_eq!(result.answer, None);
    }

    #[tokio::test]
    async fn options_are_forwarded() {
        let provider = Arc::new(SequentialMockProvider::texts(&["Action: Finish[ok]"]));
        let options = CompletionOptions::default().with_temperature(0.0);
        let agent = agent(&provider, Arc::new(ToolRegistry::new())).with_options(options);

        agent.run("q").await;
        assert_eq!(provider.requests()[0].options, options);
    }

    #[test]
    fn max_steps_has_a_floor() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let agent = agent(&provider, Arc::new(ToolRegistry::new()));
        assert_eq!(agent.max_steps(), DEFAULT_MAX_STEPS);
        assert_eq!(agent.with_max_steps(0).max_steps(), 1);
    }

    #[tokio::test]
    async fn runs_do_not_share_transcripts() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "Action: Search[first]",
            "Action: Finish[one]",
            "Action: Finish[two]",
        ]));
        let calls = Arc::new(AtomicUsize::new(0));
        let agent = agent(&provider, search_registry(calls));

        let first = agent.run_traced("q1").await;
        let second = agent.run_traced("q2").await;

        assert_eq!(first.transcript.len(), 2);
        assert!(second.transcript.is_empty());
        assert!(provider.requests()[2].prompt().contains("History: \n"));
    }
}
