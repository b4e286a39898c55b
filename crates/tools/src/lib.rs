//! Built-in tool implementations for thinkloop.
//!
//! Tools give the ReAct agent the ability to gather information it does
//! not have; currently a SerpApi-backed web search.

pub mod web_search;

use thinkloop_config::SearchConfig;
use thinkloop_core::tool::ToolRegistry;

pub use web_search::WebSearchTool;

/// Name the search tool is registered under in the default registry.
pub const SEARCH_TOOL_NAME: &str = "Search";

/// Create a default tool registry with all built-in tools.
pub fn default_registry(search: &SearchConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        SEARCH_TOOL_NAME,
        web_search::DESCRIPTION,
        WebSearchTool::new(search.clone()),
    );
    registry
}
