//! The planner's output protocol: a fenced list literal.
//!
//! ~~~text
//! ```python
//! ["step one", "step two"]
//! ```
//! ~~~
//!
//! Only a flat list of quoted strings is accepted. Nothing in the fence is
//! ever evaluated.

use thiserror::Error;

const FENCES: [&str; 2] = ["```python", "```json"];
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanParseError {
    #[error("no ```python or ```json block found")]
    MissingFence,

    #[error("code block is not closed")]
    UnclosedFence,

    #[error("malformed list at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },
}

/// Extract the plan steps from a planner response.
///
/// The first fenced block wins; surrounding prose is ignored. Steps are
/// trimmed and empty steps dropped. An empty list is a valid (empty) plan.
pub fn parse_plan(text: &str) -> Result<Vec<String>, PlanParseError> {
    let (at, fence) = FENCES
        .iter()
        .filter_map(|f| text.find(f).map(|at| (at, *f)))
        .min_by_key(|(at, _)| *at)
        .ok_or(PlanParseError::MissingFence)?;

    let body = &text[at + fence.len()..];
    let end = body.find(FENCE_CLOSE).ok_or(PlanParseError::UnclosedFence)?;

    let steps = ListScanner::new(&body[..end]).scan()?;
    Ok(steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Render steps as a list literal, the form embedded into executor prompts.
pub fn render_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| serde_json::Value::String(item.clone()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Scanner for `[ "a", 'b', ]`.
struct ListScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ListScanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn scan(mut self) -> Result<Vec<String>, PlanParseError> {
        self.skip_ws();
        self.expect('[')?;

        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(q @ ('"' | '\'')) => {
                    self.bump();
                    items.push(self.string(q)?);
                    self.skip_ws();
                    match self.peek() {
                        Some(',') => self.bump(),
                        Some(']') => {}
                        Some(c) => return Err(self.error(format!("expected ',' or ']', found '{c}'"))),
                        None => return Err(self.error("list is not closed")),
                    }
                }
                Some(c) => return Err(self.error(format!("expected a quoted string, found '{c}'"))),
                None => return Err(self.error("list is not closed")),
            }
        }

        self.skip_ws();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected '{c}' after list")));
        }
        Ok(items)
    }

    fn string(&mut self, quote: char) -> Result<String, PlanParseError> {
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("string is not closed"));
            };
            self.bump();
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let Some(esc) = self.peek() else {
                        return Err(self.error("dangling escape"));
                    };
                    self.bump();
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' | '\'' | '"' => out.push(esc),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                '\n' => return Err(self.error("newline inside string")),
                c => out.push(c),
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), PlanParseError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}'"))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> PlanParseError {
        PlanParseError::Malformed {
            position: self.pos,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_fence() {
        let text = "Here is the plan:\n```python\n[\"Compute apples after Monday\", \"Add Tuesday's sales\"]\n```\nDone.";
        assert_eq!(
            parse_plan(text).unwrap(),
            vec!["Compute apples after Monday", "Add Tuesday's sales"]
        );
    }

    #[test]
    fn json_fence_and_single_quotes() {
        let text = "```json\n['a', \"b\",]\n```";
        assert_eq!(parse_plan(text).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn escapes_are_decoded() {
        let text = r#"```python
["it\'s \"quoted\"", 'line\nbreak', "back\\slash"]
```"#;
        assert_eq!(
            parse_plan(text).unwrap(),
            vec!["it's \"quoted\"", "line\nbreak", "back\\slash"]
        );
    }

    #[test]
    fn multiline_list() {
        let text = "```python\n[\n    \"one\",\n    \"two\",\n    \"three\"\n]\n```";
        assert_eq!(parse_plan(text).unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn first_fence_wins() {
        let text = "```json\n[\"first\"]\n```\n```python\n[\"second\"]\n```";
        assert_eq!(parse_plan(text).unwrap(), vec!["first"]);
    }

    #[test]
    fn empty_list_is_empty_plan() {
        assert_eq!(parse_plan("```python\n[]\n```").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn blank_steps_are_dropped() {
        let text = "```python\n[\"  step  \", \"   \"]\n```";
        assert_eq!(parse_plan(text).unwrap(), vec!["step"]);
    }

    #[test]
    fn missing_fence() {
        assert_eq!(
            parse_plan("[\"a\", \"b\"]"),
            Err(PlanParseError::MissingFence)
        );
    }

    #[test]
    fn unclosed_fence() {
        assert_eq!(
            parse_plan("```python\n[\"a\"]"),
            Err(PlanParseError::UnclosedFence)
        );
    }

    #[test]
    fn rejects_non_string_items() {
        assert!(matches!(
            parse_plan("```python\n[1, 2]\n```"),
            Err(PlanParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_plan("```python\n[\"a\", [\"nested\"]]\n```"),
            Err(PlanParseError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_code() {
        assert!(matches!(
            parse_plan("```python\n__import__('os').system('ls')\n```"),
            Err(PlanParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_plan("```python\n[\"a\"] + [\"b\"]\n```"),
            Err(PlanParseError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(matches!(
            parse_plan("```python\n[\"a, \"b\"\n```"),
            Err(PlanParseError::Malformed { .. })
        ));
    }

    #[test]
    fn render_list_quotes_items() {
        let steps = vec!["say \"hi\"".to_string(), "two".to_string()];
        assert_eq!(render_list(&steps), r#"["say \"hi\"", "two"]"#);
        assert_eq!(render_list(&[]), "[]");
    }
}
