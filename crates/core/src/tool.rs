//! Tool trait — the abstraction over agent capabilities.
//!
//! A tool turns one line of model-chosen input text into observation text.
//! Tools are registered by name in a [`ToolRegistry`] and dispatched by the
//! ReAct controller when the model emits `ToolName[input]`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The core Tool trait.
///
/// `invoke` is infallible by signature: an implementation must convert its
/// own failures (timeouts, transport errors, bad input) into observation
/// text, so the controller always has something to append to its transcript.
/// Implementations that talk to the network must bound their own wait time.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool on the given input and describe the outcome.
    async fn invoke(&self, input: &str) -> String;
}

/// Adapter turning a plain closure into a [`Tool`].
pub struct FnTool<F>(pub F);

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    async fn invoke(&self, input: &str) -> String {
        (self.0)(input)
    }
}

/// One named, described capability.
#[derive(Clone)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    tool: Arc<dyn Tool>,
}

impl ToolRegistration {
    pub fn tool(&self) -> Arc<dyn Tool> {
        self.tool.clone()
    }
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A registry of available tools.
///
/// Entries keep their registration order, which is the order
/// [`describe_all`](Self::describe_all) lists them in. The registry is
/// populated before a run and shared read-only (`Arc<ToolRegistry>`) while
/// controllers execute, so it needs no locking.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolRegistration>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under `name`.
    ///
    /// Re-registering an existing name replaces the previous entry in place
    /// (its position in the listing is kept), logs a warning, and returns
    /// the tool that was replaced.
    pub fn register<T>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        tool: T,
    ) -> Option<Arc<dyn Tool>>
    where
        T: Tool + 'static,
    {
        self.register_arc(name, description, Arc::new(tool))
    }

    /// Register a closure as a tool.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Option<Arc<dyn Tool>>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.register(name, description, FnTool(f))
    }

    /// Register an already shared tool.
    pub fn register_arc(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        tool: Arc<dyn Tool>,
    ) -> Option<Arc<dyn Tool>> {
        let name = name.into();
        let entry = ToolRegistration {
            name: name.clone(),
            description: description.into(),
            tool,
        };

        if let Some(&pos) = self.index.get(&name) {
            warn!(tool = %name, "Tool already registered, overriding previous entry");
            let previous = std::mem::replace(&mut self.entries[pos], entry);
            return Some(previous.tool);
        }

        debug!(tool = %name, "Tool registered");
        self.index.insert(name, self.entries.len());
        self.entries.push(entry);
        None
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| self.entries[pos].tool.clone())
    }

    /// Render the catalog embedded into prompts: one `- {name}: {description}`
    /// line per tool, in registration order.
    pub fn describe_all(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("- {}: {}", e.name, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All registrations in registration order.
    pub fn entries(&self) -> &[ToolRegistration] {
        &self.entries
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn invoke(&self, input: &str) -> String {
            input.to_string()
        }
    }

    #[tokio::test]
    async fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register("Echo", "Echoes back the input", EchoTool).is_none());

        let tool = registry.lookup("Echo").expect("registered");
        assert_eq!(tool.invoke("hello world").await, "hello world");
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[tokio::test]
    async fn reregistration_overwrites() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("Search", "first", |_| "one".to_string());
        let replaced = registry.register_fn("Search", "second", |_| "two".to_string());

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.describe_all(), "- Search: second");
        let tool = registry.lookup("Search").unwrap();
        assert_eq!(tool.invoke("q").await, "two");
    }

    #[test]
    fn describe_all_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("Search", "web search", |q| q.to_string());
        registry.register_fn("Calc", "arithmetic", |q| q.to_string());
        registry.register_fn("Search", "web search v2", |q| q.to_string());

        assert_eq!(
            registry.describe_all(),
            "- Search: web search v2\n- Calc: arithmetic"
        );
        assert_eq!(registry.names(), vec!["Search", "Calc"]);
    }

    #[test]
    fn empty_registry_describes_nothing() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.describe_all(), "");
    }
}
