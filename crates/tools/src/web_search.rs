//! Web search tool backed by the SerpApi JSON endpoint.
//!
//! Picks the most direct answer available in the result payload: answer
//! box lists, then the answer box, then the knowledge graph, then the top
//! organic snippets. Every failure is reported as observation text.

use async_trait::async_trait;
use std::time::Duration;
use thinkloop_config::SearchConfig;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::Tool;
use tracing::{debug, warn};

const ENDPOINT: &str = "https://serpapi.com/search.json";

/// Description shown to the model in the tool catalog.
pub const DESCRIPTION: &str = "A web search engine. Use it when you need current events, facts, \
or anything you cannot find in your own knowledge.";

pub struct WebSearchTool {
    config: SearchConfig,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::NotConfigured {
                tool_name: "Search".into(),
                reason: "SERPAPI_API_KEY is not set".into(),
            })?;

        let query = query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput("empty search query".into()));
        }

        debug!(query, engine = %self.config.engine, "Executing web search");

        let failed = |reason: String| ToolError::ExecutionFailed {
            tool_name: "Search".into(),
            reason,
        };

        let response = self
            .client
            .get(ENDPOINT)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .query(&[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("api_key", api_key),
                ("gl", self.config.gl.as_str()),
                ("hl", self.config.hl.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::Timeout {
                        tool_name: "Search".into(),
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    failed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let results: serde_json::Value = response.json().await.map_err(|e| failed(e.to_string()))?;

        if let Some(error) = results["error"].as_str() {
            return Err(failed(error.to_string()));
        }

        Ok(summarize(&results, query))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn invoke(&self, input: &str) -> String {
        match self.search(input).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Web search failed");
                e.to_observation()
            }
        }
    }
}

/// Reduce a SerpApi result payload to the most direct answer it contains.
fn summarize(results: &serde_json::Value, query: &str) -> String {
    if let Some(list) = results["answer_box_list"].as_array() {
        let lines: Vec<&str> = list.iter().filter_map(|v| v.as_str()).collect();
        if !lines.is_empty() {
            return lines.join("\n");
        }
    }

    if let Some(answer) = results["answer_box"]["answer"].as_str() {
        return answer.to_string();
    }

    if let Some(description) = results["knowledge_graph"]["description"].as_str() {
        return description.to_string();
    }

    if let Some(organic) = results["organic_results"].as_array()
        && !organic.is_empty()
    {
        return organic
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "[{}] {}\n{}",
                    i + 1,
                    r["title"].as_str().unwrap_or(""),
                    r["snippet"].as_str().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    format!("Cannot find any information about '{query}'.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_box_list_wins() {
        let results = json!({
            "answer_box_list": ["first", "second"],
            "answer_box": {"answer": "ignored"},
        });
        assert_eq!(summarize(&results, "q"), "first\nsecond");
    }

    #[test]
    fn answer_box_then_knowledge_graph() {
        let results = json!({
            "answer_box": {"answer": "42"},
            "knowledge_graph": {"description": "ignored"},
        });
        assert_eq!(summarize(&results, "q"), "42");

        let results = json!({"knowledge_graph": {"description": "A GPU vendor."}});
        assert_eq!(summarize(&results, "q"), "A GPU vendor.");
    }

    #[test]
    fn organic_results_top_three() {
        let results = json!({
            "organic_results": [
                {"title": "A", "snippet": "a"},
                {"title": "B", "snippet": "b"},
                {"title": "C", "snippet": "c"},
                {"title": "D", "snippet": "d"},
            ]
        });
        assert_eq!(summarize(&results, "q"), "[1] A\na\n\n[2] B\nb\n\n[3] C\nc");
    }

    #[test]
    fn nothing_found() {
        let results = json!({"organic_results": []});
        assert_eq!(
            summarize(&results, "latest GPU"),
            "Cannot find any information about 'latest GPU'."
        );
    }

    #[tokio::test]
    async fn missing_api_key_is_an_observation() {
        let tool = WebSearchTool::new(SearchConfig::default());
        let observation = tool.invoke("latest GPU model").await;
        assert!(observation.starts_with("Error:"));
        assert!(observation.contains("SERPAPI_API_KEY"));
    }

    #[tokio::test]
    async fn empty_query_is_an_observation() {
        let config = SearchConfig {
            api_key: Some("key".into()),
            ..SearchConfig::default()
        };
        let tool = WebSearchTool::new(config);
        let observation = tool.invoke("   ").await;
        assert_eq!(observation, "Error: Invalid tool input: empty search query");
    }
}
