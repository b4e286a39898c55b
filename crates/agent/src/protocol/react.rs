//! The ReAct response protocol.
//!
//! The model is asked to answer with
//!
//! ```text
//! Thought: <reasoning>
//! Action: Search[<query>]      or      Action: Finish[<answer>]
//! ```
//!
//! [`parse_step`] turns one response into a [`ParsedStep`]; every branch
//! the controller can take is a [`Decision`] variant.

const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const OBSERVATION: &str = "Observation:";

/// The name of the terminal action.
pub const FINISH: &str = "Finish";

/// What the controller should do with one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The response reasons but carries no `Action:` section.
    Think,
    /// `Finish[answer]` — the run is over.
    Finish(String),
    /// `Name[input]` — dispatch to a registered tool.
    ToolCall { name: String, input: String },
    /// An `Action:` section that matches neither shape.
    Malformed,
}

/// One response split into its sections plus the resulting decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStep {
    pub thought: Option<String>,
    /// The raw action text, as recorded in the transcript.
    pub action: Option<String>,
    pub decision: Decision,
}

/// Parse a whole model response.
///
/// - `Thought:` runs up to the `Action:` marker (or the end of the text).
/// - `Action:` runs to the end of the text, but stops at a later line that
///   starts with `Observation:`; a model that writes its own observation
///   does not get it dispatched as part of the tool input.
///
/// Markers at the start of a line are preferred over ones embedded in
/// prose. Empty sections count as absent.
pub fn parse_step(text: &str) -> ParsedStep {
    let action_at = find_marker(text, ACTION);

    let action = action_at
        .map(|at| {
            let body = &text[at + ACTION.len()..];
            let end = observation_cut(body).unwrap_or(body.len());
            body[..end].trim().to_string()
        })
        .filter(|a| !a.is_empty());

    let thought = find_marker(text, THOUGHT)
        .map(|at| {
            let start = at + THOUGHT.len();
            let end = match action_at {
                Some(a) if a >= start => a,
                _ => text.len(),
            };
            text[start..end].trim().to_string()
        })
        .filter(|t| !t.is_empty());

    let decision = match &action {
        Some(a) => parse_action(a),
        None => Decision::Think,
    };

    ParsedStep {
        thought,
        action,
        decision,
    }
}

/// Classify an action text.
///
/// The text must start with an identifier (Unicode letters, digits, `_`)
/// immediately followed by `[`; the body runs to the **last** `]`, so
/// brackets and newlines inside the input survive. Anything after that
/// last bracket is ignored.
pub fn parse_action(action: &str) -> Decision {
    let action = action.trim();

    let ident_len = action
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum::<usize>();
    if ident_len == 0 || !action[ident_len..].starts_with('[') {
        return Decision::Malformed;
    }

    let open = ident_len;
    let Some(close) = action.rfind(']').filter(|&c| c > open) else {
        return Decision::Malformed;
    };

    let name = &action[..ident_len];
    let body = action[open + 1..close].trim();

    if name == FINISH {
        return Decision::Finish(body.to_string());
    }
    if body.is_empty() {
        return Decision::Malformed;
    }

    Decision::ToolCall {
        name: name.to_string(),
        input: body.to_string(),
    }
}

/// Byte offset of `marker`, preferring one that starts a line.
fn find_marker(text: &str, marker: &str) -> Option<usize> {
    line_marker(text, marker).or_else(|| text.find(marker))
}

fn line_marker(text: &str, marker: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with(marker) {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Where a hallucinated `Observation:` line begins inside an action body.
fn observation_cut(body: &str) -> Option<usize> {
    let first_newline = body.find('\n')?;
    let rest = &body[first_newline + 1..];
    line_marker(rest, OBSERVATION).map(|p| first_newline + 1 + p)
}
