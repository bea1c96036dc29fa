// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line-oriented request loop.
//!
//! One JSON request per input line, one JSON response per output line.
//! A line that is not a valid request gets an error response; the loop
//! carries on until the input ends.

use crate::config::ConfigError;
use ordoplay_blueprint_commands::{Dispatcher, InMemoryStore, Request, Response, StaticCatalog};
use serde_json::Value;
use std::io::{BufRead, Write};

/// Parameter names that already select a graph
const GRAPH_KEYS: &[&str] = &["graph_id", "blueprint_name"];

/// Error that ends a session
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration or startup documents failed to load
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading requests or writing responses failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Requests answered
    pub requests: usize,
    /// Requests answered with an error
    pub failures: usize,
}

/// Owns the store and catalog for the lifetime of the process
pub struct Session {
    store: InMemoryStore,
    catalog: StaticCatalog,
    dispatcher: Dispatcher,
    default_graph: Option<String>,
    pretty: bool,
}

impl Session {
    /// Create a session over a store and a catalog
    pub fn new(store: InMemoryStore, catalog: StaticCatalog) -> Self {
        Self {
            store,
            catalog,
            dispatcher: Dispatcher::new(),
            default_graph: None,
            pretty: false,
        }
    }

    /// Graph used when a request names none
    pub fn with_default_graph(mut self, graph: Option<String>) -> Self {
        self.default_graph = graph;
        self
    }

    /// Pretty-print responses
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The store
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Answer one input line. Blank lines get no response.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let mut request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "malformed request");
                return Some(Response::error(format!("Invalid request: {err}")));
            }
        };

        if let Some(graph) = &self.default_graph {
            if !GRAPH_KEYS.iter().any(|key| request.params.contains_key(*key)) {
                request.params.insert("graph_id".to_string(), Value::String(graph.clone()));
            }
        }

        tracing::debug!(command = %request.command, "request");
        Some(self.dispatcher.handle(&mut self.store, &self.catalog, &request))
    }

    /// Serve requests from `input` until it ends
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<SessionStats, HostError> {
        let mut stats = SessionStats::default();
        for line in input.lines() {
            let Some(response) = self.handle_line(&line?) else {
                continue;
            };

            stats.requests += 1;
            if !response.success {
                stats.failures += 1;
            }

            let value = response.to_value();
            let text = if self.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            writeln!(output, "{text}")?;
            output.flush()?;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_blueprint_commands::{Blueprint, BlueprintStore};
    use serde_json::json;

    fn session() -> Session {
        let store = InMemoryStore::new().with_blueprint(Blueprint::new("BP_Door", "AActor"));
        Session::new(store, StaticCatalog::builtin())
    }

    fn responses(session: &mut Session, input: &str) -> (SessionStats, Vec<Value>) {
        let mut output = Vec::new();
        let stats = session.run(input.as_bytes(), &mut output).unwrap();
        let lines = String::from_utf8(output).unwrap();
        let values = lines
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (stats, values)
    }

    #[test]
    fn test_requests_and_malformed_lines() {
        let mut session = session();
        let input = concat!(
            r#"{"command":"add_event_node","params":{"graph_id":"BP_Door","event_name":"ReceiveBeginPlay"}}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"command":"find_nodes","params":{"graph_id":"BP_Door","node_type":"Event","event_name":"ReceiveBeginPlay"}}"#,
            "\n",
        );
        let (stats, values) = responses(&mut session, input);

        assert_eq!(stats, SessionStats { requests: 3, failures: 1 });
        assert_eq!(values[0]["success"], true);
        assert_eq!(values[1]["success"], false);
        assert!(values[1]["error"].as_str().unwrap().starts_with("Invalid request"));
        assert_eq!(values[2]["node_guids"], json!([values[0]["node_id"]]));
    }

    #[test]
    fn test_error_response_shape() {
        let mut session = session();
        let (_, values) = responses(&mut session, "{\"command\":\"add_variable\",\"params\":{\"graph_id\":\"BP_Door\"}}\n");
        assert_eq!(values[0], json!({ "success": false, "error": "Missing 'variable_name' parameter" }));
    }

    #[test]
    fn test_default_graph_fills_missing_id() {
        let mut session = session().with_default_graph(Some("BP_Door".to_string()));
        let response = session
            .handle_line(r#"{"command":"add_self_reference"}"#)
            .unwrap();
        assert!(response.success, "{:?}", response.error_message());
        assert_eq!(session.store().blueprint("BP_Door").unwrap().event_graph.node_count(), 1);

        let response = session
            .handle_line(r#"{"command":"add_self_reference","params":{"graph_id":"BP_Window"}}"#)
            .unwrap();
        assert_eq!(response.error_message(), Some("Blueprint not found: BP_Window"));
    }
}
