//! `thinkloop react` — ReAct agent with the default tools.

use std::sync::Arc;

use thinkloop_agent::{ReactAgent, ReactStatus, StepTrace};

pub async fn run(question: &str, max_steps: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, provider) = super::load_gateway()?;
    let tools = Arc::new(thinkloop_tools::default_registry(&config.search));

    let agent = ReactAgent::new(provider, tools)
        .with_max_steps(max_steps.unwrap_or(config.agent.max_steps));

    println!("  Question: {question}");
    println!();

    let result = agent.run_traced(question).await;

    for step in &result.trace {
        print!("{}", render_step(step));
    }
    println!();

    match (&result.status, &result.answer) {
        (ReactStatus::Finished, Some(answer)) => {
            println!("  Final answer ({} steps):", result.steps);
            println!("{answer}");
            Ok(())
        }
        (ReactStatus::StepLimitExceeded, _) => {
            Err(format!("Reached the step limit ({}) without a final answer", result.steps).into())
        }
        (ReactStatus::ParseFailure, _) => {
            Err("The model did not produce a valid Action".into())
        }
        (ReactStatus::GatewayError(cause), _) => {
            Err(format!("The model call failed: {cause}").into())
        }
        (ReactStatus::Finished, None) => Err("Run finished without an answer".into()),
    }
}

/// One step as printed: Thought, Action, Observation, each when present.
fn render_step(step: &StepTrace) -> String {
    let mut out = format!("  --- Step {} ---\n", step.step);
    let lines = [
        ("Thought:    ", &step.thought),
        ("Action:     ", &step.action),
        ("Observation:", &step.observation),
    ];
    for (label, text) in lines {
        if let Some(text) = text {
            out.push_str(&format!("  {label} {text}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_prints_thought_action_observation_together() {
        let step = StepTrace {
            step: 2,
            thought: Some("look it up".into()),
            action: Some("Search[GPU]".into()),
            observation: Some("H100".into()),
        };
        assert_eq!(
            render_step(&step),
            "  --- Step 2 ---\n  Thought:     look it up\n  Action:      Search[GPU]\n  Observation: H100\n"
        );
    }

    #[test]
    fn absent_sections_are_skipped() {
        let step = StepTrace {
            step: 1,
            action: Some("Finish[done]".into()),
            ..StepTrace::default()
        };
        assert_eq!(render_step(&step), "  --- Step 1 ---\n  Action:      Finish[done]\n");
    }
}
