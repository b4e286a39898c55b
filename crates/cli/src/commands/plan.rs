//! `thinkloop plan` — Plan-and-Solve.

use thinkloop_agent::{PlanAndSolveAgent, PlanSolveStatus};
use thinkloop_config::AgentSettings;
use thinkloop_core::provider::CompletionOptions;

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, provider) = super::load_gateway()?;
    let (planner, executor) = options(&config.agent);

    let agent = PlanAndSolveAgent::new(provider)
        .with_planner_options(planner)
        .with_executor_options(executor);

    println!("  Question: {question}");
    println!();

    let result = agent.run_traced(question).await;

    if !result.plan.is_empty() {
        println!("  Plan:");
        for (i, step) in result.plan.iter().enumerate() {
            println!("    {}. {step}", i + 1);
        }
        println!();
    }

    for (i, done) in result.completed_steps.iter().enumerate() {
        println!("  Step {}: {}", i + 1, done.step);
        println!("    Result: {}", done.result);
    }

    match result.status {
        PlanSolveStatus::Completed => {
            println!();
            println!("  Final answer:");
            println!("{}", result.answer.unwrap_or_default());
            Ok(())
        }
        PlanSolveStatus::PlanningFailed => Err("Failed to generate a valid plan.".into()),
        PlanSolveStatus::GatewayError(cause) => {
            Err(format!("The model call failed: {cause}").into())
        }
    }
}

/// Per-phase generation options; unset temperatures use the gateway default.
fn options(settings: &AgentSettings) -> (CompletionOptions, CompletionOptions) {
    let with = |t: Option<f32>| match t {
        Some(t) => CompletionOptions::default().with_temperature(t),
        None => CompletionOptions::default(),
    };
    (with(settings.planner_temperature), with(settings.executor_temperature))
}
