use super::{NodeType, ValidationReport};
use crate::graph::{Attributes, Node};
use ahash::AHashMap;
use serde_json::{Value, json};
use std::sync::Arc;

pub const START: &str = "start";
pub const END: &str = "end";
pub const CONDITIONAL: &str = "conditional";
pub const EXECUTE: &str = "execute";
pub const PARALLEL: &str = "parallel";
pub const REST_API: &str = "restApi";

const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

fn as_attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

fn config_str<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    node.config
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn no_rules(_node: &Node) -> Vec<String> {
    Vec::new()
}

fn validate_conditional(node: &Node) -> Vec<String> {
    let mut errors = Vec::new();
    if config_str(node, "condition").is_none() {
        errors.push("Condition expression is required".to_string());
    }
    errors
}

fn validate_execute(node: &Node) -> Vec<String> {
    let mut errors = Vec::new();
    if config_str(node, "configId").is_none() {
        errors.push("Config ID is required".to_string());
    }
    errors
}

fn validate_parallel(node: &Node) -> Vec<String> {
    let selected = node
        .config
        .get("nodeNames")
        .and_then(Value::as_array)
        .is_some_and(|names| !names.is_empty());
    if selected {
        Vec::new()
    } else {
        vec!["At least one node must be selected for parallel execution".to_string()]
    }
}

fn validate_rest_api(node: &Node) -> Vec<String> {
    let mut errors = Vec::new();
    if config_str(node, "url").is_none() {
        errors.push("URL is required".to_string());
    }
    let method = node.config.get("method").and_then(Value::as_str);
    if !method.is_some_and(|m| HTTP_METHODS.contains(&m)) {
        errors.push("Invalid HTTP method".to_string());
    }
    errors
}

/// Defines the built-in node types and the function registering them.
macro_rules! define_node_types {
    ( $( ($struct_name:ident, $tag:expr, $label:expr, config: $config:tt, attributes: $attributes:tt, validate: $validate:path) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeType for $struct_name {
                fn type_name(&self) -> &str { $tag }
                fn label(&self) -> &str { $label }
                fn default_config(&self) -> Value { json!($config) }
                fn default_node_attributes(&self) -> Attributes { as_attributes(json!($attributes)) }
                fn validate(&self, node: &Node) -> ValidationReport {
                    ValidationReport::from_errors($validate(node))
                }
            }
        )*

        pub(super) fn register_default_node_types(types: &mut AHashMap<String, Arc<dyn NodeType>>) {
            $( types.insert($tag.to_string(), Arc::new($struct_name)); )*
        }
    };
}

define_node_types! {
    (StartNodeType, START, "Start",
        config: { "initialData": {}, "startParams": {} },
        attributes: {},
        validate: no_rules),
    (EndNodeType, END, "End",
        config: { "outputData": {}, "statusCode": 200, "endType": "success" },
        attributes: {
            "input": [
                { "key": "result", "value": "success" },
                { "key": "outputData", "value": "{}" }
            ]
        },
        validate: no_rules),
    (ConditionalNodeType, CONDITIONAL, "Conditional",
        config: {
            "condition": "",
            "trueNodeName": null,
            "falseNodeName": null,
            "evaluationType": "javascript",
            "contextVariable": "data"
        },
        attributes: {},
        validate: validate_conditional),
    (ExecuteNodeType, EXECUTE, "Execute",
        config: { "configId": "" },
        attributes: {},
        validate: validate_execute),
    (ParallelNodeType, PARALLEL, "Parallel",
        config: { "nodeNames": [], "waitForAll": true, "errorHandling": "continueOnError" },
        attributes: {},
        validate: validate_parallel),
    (RestApiNodeType, REST_API, "REST API",
        config: {
            "url": "",
            "method": "GET",
            "headers": {},
            "body": "",
            "responseMapping": "",
            "timeout": 30000,
            "retries": 0
        },
        attributes: {
            "requestSchema": "",
            "responseSchema": "",
            "requestMethod": "GET",
            "requestUrl": "",
            "requestHeaders": {},
            "requestBody": {}
        },
        validate: validate_rest_api),
}
