//! Prompt templates for both controllers.
//!
//! Placeholders are written `{name}`. Filling is a single left-to-right
//! pass: values are inserted verbatim and never rescanned, and placeholders
//! without a value (such as the literal `{tool_name}` in the ReAct format
//! description) are left untouched.

/// ReAct template. Placeholders: `{tools}`, `{question}`, `{history}`.
pub const REACT_TEMPLATE: &str = "
You are a capable assistant that can call external tools.

Available tools:
{tools}

Respond strictly in the following format:

Thought: your reasoning, used to analyse the problem, break it down and plan the next action.
Action: the action you decide to take, which must be one of:
- `{tool_name}[{tool_input}]`: call one of the available tools.
- `Finish[final answer]`: when you believe you have the final answer.
- Once you have gathered enough information to answer the question, you must put `Finish[final answer]` after the `Action:` field.


Now solve the following problem:
Question: {question}
History: {history}
";

/// Planner template. Placeholder: `{question}`.
pub const PLANNER_TEMPLATE: &str = "
You are an expert AI planner. Your task is to break the user's complex question into an action plan made of several simple steps.
Make sure every step is an independent, executable sub-task and that the steps are in strict logical order.
Your output must be a Python list in which every element is a string describing one sub-task.

Question: {question}

Output your plan strictly in the following format; the ```python prefix and ``` suffix are required:
```python
[\"step 1\", \"step 2\", \"step 3\", ...]
```
";

/// Executor template. Placeholders: `{question}`, `{plan}`, `{history}`,
/// `{current_step}`.
pub const EXECUTOR_TEMPLATE: &str = "
You are an expert AI executor. Your task is to solve the problem step by step, strictly following the given plan.
You will receive the original question, the complete plan, and the steps completed so far with their results.
Focus on solving the \"current step\" and output only the final answer for that step, without any extra explanation or conversation.

# Original question:
{question}

# Complete plan:
{plan}

# Previous steps and results:
{history}

# Current step:
{current_step}

Output only the answer to the \"current step\":
";

/// Substitute `{key}` placeholders in one pass.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn react_prompt(tools: &str, question: &str, history: &str) -> String {
    fill(
        REACT_TEMPLATE,
        &[("tools", tools), ("question", question), ("history", history)],
    )
}

pub fn planner_prompt(question: &str) -> String {
    fill(PLANNER_TEMPLATE, &[("question", question)])
}

pub fn executor_prompt(question: &str, plan: &str, history: &str, current_step: &str) -> String {
    fill(
        EXECUTOR_TEMPLATE,
        &[
            ("question", question),
            ("plan", plan),
            ("history", history),
            ("current_step", current_step),
        ],
    )
}
