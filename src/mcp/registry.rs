//! Explicit name → handler table for the MCP tool surface.

use crate::error::{Error, Result};
use crate::mcp::context::ToolContext;
use futures::future::BoxFuture;
use rmcp::model::{JsonObject, Tool};
use rmcp::schemars::{self, JsonSchema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

type Handler = Arc<dyn Fn(ToolContext, Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

struct Entry {
    description: &'static str,
    input_schema: Arc<JsonObject>,
    handler: Handler,
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: Arc<BTreeMap<&'static str, Entry>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Tool descriptors in name order.
    pub fn tools(&self) -> Vec<Tool> {
        self.entries
            .iter()
            .map(|(name, entry)| Tool::new(*name, entry.description, entry.input_schema.clone()))
            .collect()
    }

    /// Runs a tool. `None` when no tool of that name is registered.
    pub async fn call(&self, ctx: ToolContext, name: &str, args: Value) -> Option<Result<Value>> {
        let entry = self.entries.get(name)?;
        Some((entry.handler)(ctx, args).await)
    }
}

#[derive(Default)]
pub struct ToolRegistryBuilder {
    entries: BTreeMap<&'static str, Entry>,
}

impl ToolRegistryBuilder {
    /// Registers `handler` under `name`. The input schema is derived from
    /// the argument type; arguments that fail to decode are rejected as an
    /// invalid filter before the handler runs.
    pub fn register<A, R, F, Fut>(mut self, name: &'static str, description: &'static str, handler: F) -> Self
    where
        A: DeserializeOwned + JsonSchema + Send + 'static,
        R: Serialize + 'static,
        F: Fn(ToolContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: Handler = Arc::new(move |ctx: ToolContext, args: Value| -> BoxFuture<'static, Result<Value>> {
            let handler = handler.clone();
            Box::pin(async move {
                let args: A = serde_json::from_value(args).map_err(|e| {
                    Error::invalid_filter(format!("invalid arguments for {}: {}", name, e))
                })?;
                let output = handler(ctx, args).await?;
                Ok(serde_json::to_value(output)?)
            })
        });

        let previous = self.entries.insert(
            name,
            Entry {
                description,
                input_schema: Arc::new(schema_object::<A>()),
                handler: erased,
            },
        );
        debug_assert!(previous.is_none(), "tool {} registered twice", name);
        self
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            entries: Arc::new(self.entries),
        }
    }
}

fn schema_object<A: JsonSchema>() -> JsonObject {
    let schema = schemars::schema_for!(A);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".to_string(), Value::String("object".to_string()));
            map
        }
    }
}
