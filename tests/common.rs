//! Common test utilities: fixture documents and deterministic collaborators.
use keiro::prelude::*;
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

/// `A (start) -> B (end)`, current format.
#[allow(dead_code)]
pub const LINEAR_FLOW_JSON: &str = r#"{
    "configId": "linear",
    "config": {
        "startNode": "A",
        "nodes": {
            "A": { "nodeType": "start", "next": "B" },
            "B": { "nodeType": "end", "end": true }
        }
    }
}"#;

/// A conditional node branching to two targets, current format.
#[allow(dead_code)]
pub const BRANCHING_FLOW_JSON: &str = r#"{
    "configId": "branching",
    "configType": "workflow",
    "configStatus": "published",
    "configOwner": "ops",
    "configDescription": "Routes on the size of x",
    "input": {
        "x": { "type": "value", "value": 3 }
    },
    "required": ["x"],
    "config": {
        "startNode": "Begin",
        "nodes": {
            "Begin": { "nodeType": "start", "config": {}, "next": "Decide", "end": false },
            "Decide": {
                "nodeType": "conditional",
                "config": { "condition": "data.x > 1" },
                "next": null,
                "end": false,
                "nodeAttributes": {
                    "choices": [
                        { "condition": "x>1", "next": "Big" },
                        { "condition": "x<=1", "next": "Small" }
                    ]
                }
            },
            "Big": { "nodeType": "end", "config": {}, "next": null, "end": true },
            "Small": { "nodeType": "end", "config": {}, "next": null, "end": true }
        }
    }
}"#;

/// Every legacy variant at once: bare inputs, object `required`, `type` keys,
/// top-level `choices` and an execute node keeping its invocation in `config`.
#[allow(dead_code)]
pub const LEGACY_FLOW_JSON: &str = r#"{
    "name": "Legacy Flow",
    "configId": "legacy",
    "input": { "region": "eu-west", "retries": 2 },
    "required": { "region": "eu-west" },
    "config": {
        "startNode": "Route",
        "nodes": {
            "Call": {
                "type": "execute",
                "config": { "configId": "billing", "nodeInput": { "amount": 10 } },
                "next": "Done"
            },
            "Route": {
                "type": "conditional",
                "config": { "condition": "data.region == 'eu-west'" },
                "choices": [
                    { "condition": "eu", "next": "Call" },
                    { "condition": "other", "next": "Nowhere" }
                ]
            },
            "Done": { "type": "end", "end": true }
        }
    }
}"#;

#[allow(dead_code)]
pub fn test_importer() -> Importer {
    Importer::builder().build()
}

/// Imports `json` with sequential ids `n-1`, `n-2`, ...
#[allow(dead_code)]
pub fn import(json: &str) -> Flow {
    test_importer()
        .import_str(json, &mut SequentialIds::new("n"), "Test Flow")
        .expect("fixture should parse")
}

/// Imports an already built document with sequential ids.
#[allow(dead_code)]
pub fn import_value(value: &serde_json::Value) -> Flow {
    test_importer().import_value(value, &mut SequentialIds::new("n"), "Test Flow")
}

#[allow(dead_code)]
pub fn test_repository() -> FlowRepository {
    FlowRepository::with_id_generator(Box::new(SequentialIds::new("flow")))
}

#[allow(dead_code)]
pub fn test_store() -> GraphStore {
    GraphStore::with_id_generator(Box::new(SequentialIds::new("store")))
}

/// Finds a node by name, panicking with a readable message when it is missing.
#[allow(dead_code)]
pub fn node<'a>(flow: &'a Flow, name: &str) -> &'a Node {
    flow.nodes
        .iter()
        .find(|n| n.name == name)
        .unwrap_or_else(|| panic!("node '{}' not found", name))
}

/// A hand-built flow in canonical form:
/// `Entry -> Check`, `Check` branching to `Notify` or `Finish`, `Notify -> Finish`.
#[allow(dead_code)]
pub fn create_sample_flow() -> Flow {
    let node = |id: &str, name: &str, node_type: &str, next: Option<&str>| Node {
        id: id.to_string(),
        name: name.to_string(),
        node_type: node_type.to_string(),
        position: Position::new(0.0, 0.0),
        config: json!({}),
        node_attributes: serde_json::Map::new(),
        next: next.map(str::to_string),
        end: false,
    };

    let mut check = node("c", "Check", "conditional", None);
    check.config = json!({ "condition": "data.ok" });
    check.node_attributes.insert(
        "choices".to_string(),
        json!([
            { "condition": "data.ok", "next": "f" },
            { "condition": "!data.ok", "next": "m" }
        ]),
    );
    let mut notify = node("m", "Notify", "restApi", Some("f"));
    notify.config = json!({ "url": "https://hooks.example.com", "method": "POST" });
    notify
        .node_attributes
        .insert("requestMethod".to_string(), json!("POST"));
    let mut finish = node("f", "Finish", "end", None);
    finish.end = true;

    let mut input = ParamMap::new();
    input.insert("user".to_string(), json!("alice"));
    input.insert("limits".to_string(), json!({ "max": 5 }));
    let mut required = ParamMap::new();
    required.insert("user".to_string(), json!("alice"));
    required.insert("token".to_string(), json!(""));

    Flow {
        id: "sample".to_string(),
        name: "Sample".to_string(),
        config_id: "sample-config".to_string(),
        config_type: "workflow".to_string(),
        config_status: "draft".to_string(),
        config_owner: "user".to_string(),
        config_description: "Sample flow".to_string(),
        input,
        required,
        nodes: vec![node("e", "Entry", "start", Some("c")), check, notify, finish],
        connections: vec![
            Connection {
                id: "c1".to_string(),
                source_id: "e".to_string(),
                target_id: "c".to_string(),
                connection_type: None,
            },
            Connection {
                id: "c2".to_string(),
                source_id: "c".to_string(),
                target_id: "f".to_string(),
                connection_type: Some(ConnectionType::Choice),
            },
            Connection {
                id: "c3".to_string(),
                source_id: "c".to_string(),
                target_id: "m".to_string(),
                connection_type: Some(ConnectionType::Choice),
            },
            Connection {
                id: "c4".to_string(),
                source_id: "m".to_string(),
                target_id: "f".to_string(),
                connection_type: None,
            },
        ],
    }
}

/// A log sink shared between a test and the subscriber writing into it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    #[allow(dead_code)]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with every `info` and above event written into the returned logs.
#[allow(dead_code)]
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
