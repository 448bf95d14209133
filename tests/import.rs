mod common;
use common::*;
use keiro::prelude::*;
use serde_json::json;

#[test]
fn test_linear_flow() {
    let flow = import(LINEAR_FLOW_JSON);

    assert_eq!(flow.id, "n-1");
    assert_eq!(flow.config_id, "linear");
    assert_eq!(flow.name, "Test Flow");
    assert_eq!(flow.nodes.len(), 2);

    let a = node(&flow, "A");
    let b = node(&flow, "B");
    assert_eq!(a.id, "n-2");
    assert_eq!(b.id, "n-3");
    assert_eq!(a.next.as_deref(), Some(b.id.as_str()));
    assert!(b.end);
    assert_eq!(flow.start_node().map(|n| n.name.as_str()), Some("A"));

    assert_eq!(flow.connections.len(), 1);
    let connection = &flow.connections[0];
    assert_eq!(connection.source_id, a.id);
    assert_eq!(connection.target_id, b.id);
    assert_eq!(connection.connection_type, None);
}

#[test]
fn test_missing_config_id_is_generated() {
    let flow = import(r#"{ "config": { "nodes": {} } }"#);
    assert_eq!(flow.id, "n-1");
    assert_eq!(flow.config_id, "n-2");
    assert!(flow.nodes.is_empty());
    assert!(flow.connections.is_empty());
}

#[test]
fn test_metadata_defaults() {
    let flow = import("{}");
    assert_eq!(flow.config_type, "workflow");
    assert_eq!(flow.config_status, "draft");
    assert_eq!(flow.config_owner, "user");
    assert_eq!(flow.config_description, "Imported flow");
    assert!(flow.input.is_empty());
    assert!(flow.required.is_empty());
}

#[test]
fn test_metadata_is_carried_over() {
    let flow = import(BRANCHING_FLOW_JSON);
    assert_eq!(flow.config_id, "branching");
    assert_eq!(flow.config_status, "published");
    assert_eq!(flow.config_owner, "ops");
    assert_eq!(flow.config_description, "Routes on the size of x");
    assert_eq!(flow.input["x"], json!(3));
    assert_eq!(flow.required["x"], json!(3));
}

#[test]
fn test_conditional_choices_are_resolved_to_ids() {
    let flow = import(BRANCHING_FLOW_JSON);
    let decide = node(&flow, "Decide");
    let big = node(&flow, "Big");
    let small = node(&flow, "Small");

    assert_eq!(
        decide.node_attributes["choices"],
        json!([
            { "condition": "x>1", "next": big.id },
            { "condition": "x<=1", "next": small.id }
        ])
    );
    assert_eq!(decide.next, None);

    let choice_edges: Vec<&Connection> = flow
        .connections
        .iter()
        .filter(|c| c.connection_type == Some(ConnectionType::Choice))
        .collect();
    assert_eq!(choice_edges.len(), 2);
    assert!(choice_edges.iter().all(|c| c.source_id == decide.id));

    // Begin -> Decide is the only sequential edge.
    assert_eq!(flow.connections.len(), 3);
}

#[test]
fn test_unresolved_next_is_dropped() {
    let flow = import(
        r#"{ "config": { "startNode": "A", "nodes": {
            "A": { "nodeType": "start", "next": "ZZZ" }
        } } }"#,
    );
    assert_eq!(flow.nodes.len(), 1);
    assert_eq!(flow.nodes[0].next, None);
    assert!(flow.connections.is_empty());
}

#[test]
fn test_unresolved_choice_is_dropped() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "C": { "nodeType": "conditional", "nodeAttributes": { "choices": [
                { "condition": "a", "next": "D" },
                { "condition": "b", "next": "ZZZ" }
            ] } },
            "D": { "nodeType": "end" }
        } } }"#,
    );
    let c = node(&flow, "C");
    let d = node(&flow, "D");
    assert_eq!(c.choices(), vec![Choice::new("a", &d.id)]);
    assert_eq!(flow.connections.len(), 1);
}

#[test]
fn test_next_and_choice_to_same_target_share_one_connection() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "C": { "nodeType": "conditional", "next": "D",
                   "nodeAttributes": { "choices": [{ "condition": "a", "next": "D" }] } },
            "D": { "nodeType": "end" }
        } } }"#,
    );
    let c = node(&flow, "C");
    assert_eq!(flow.connections.len(), 1);
    assert_eq!(flow.connections[0].connection_type, None);
    // The branch itself is still recorded.
    assert_eq!(c.choices().len(), 1);
}

#[test]
fn test_choices_on_non_conditional_nodes_are_not_linked() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "X": { "nodeType": "execute", "nodeAttributes": { "choices": [{ "condition": "a", "next": "Y" }] } },
            "Y": { "nodeType": "end" }
        } } }"#,
    );
    assert!(flow.connections.is_empty());
    assert_eq!(
        node(&flow, "X").node_attributes["choices"],
        json!([{ "condition": "a", "next": "Y" }])
    );
}

#[test]
fn test_legacy_document() {
    let flow = import(LEGACY_FLOW_JSON);

    assert_eq!(flow.name, "Legacy Flow");
    assert_eq!(flow.input["region"], json!("eu-west"));
    assert_eq!(flow.input["retries"], json!(2));
    assert_eq!(flow.required["region"], json!("eu-west"));

    // `startNode` moves Route to the front, the rest keep document order.
    let names: Vec<&str> = flow.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Route", "Call", "Done"]);

    let route = node(&flow, "Route");
    let call = node(&flow, "Call");
    assert_eq!(route.node_type, "conditional");
    assert_eq!(route.choices(), vec![Choice::new("eu", &call.id)]);

    assert_eq!(call.node_attributes["configId"], json!("billing"));
    assert_eq!(call.node_attributes["nodeInput"], json!({ "amount": 10 }));
    assert_eq!(call.config["configId"], json!("billing"));
    assert_eq!(call.next.as_deref(), Some(node(&flow, "Done").id.as_str()));
}

#[test]
fn test_empty_attribute_choices_fall_back_to_top_level_choices() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "C": { "nodeType": "conditional",
                   "nodeAttributes": { "choices": [] },
                   "choices": [{ "condition": "a", "next": "D" }] },
            "D": { "nodeType": "end" }
        } } }"#,
    );
    let c = node(&flow, "C");
    let d = node(&flow, "D");
    assert_eq!(c.choices(), vec![Choice::new("a", &d.id)]);
    assert_eq!(flow.connections.len(), 1);
    assert_eq!(flow.connections[0].connection_type, Some(ConnectionType::Choice));
}

#[test]
fn test_non_empty_attribute_choices_win_over_top_level_choices() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "C": { "nodeType": "conditional",
                   "nodeAttributes": { "choices": [{ "condition": "new", "next": "D" }] },
                   "choices": [{ "condition": "old", "next": "E" }] },
            "D": { "nodeType": "end" },
            "E": { "nodeType": "end" }
        } } }"#,
    );
    let d = node(&flow, "D");
    assert_eq!(node(&flow, "C").choices(), vec![Choice::new("new", &d.id)]);
    assert_eq!(flow.connections.len(), 1);
}

#[test]
fn test_execute_attributes_take_precedence_over_config() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "X": { "nodeType": "execute",
                   "config": { "configId": "from-config" },
                   "nodeAttributes": { "configId": "kept" } }
        } } }"#,
    );
    assert_eq!(flow.nodes[0].node_attributes["configId"], json!("kept"));
}

#[test]
fn test_node_type_key_wins_over_type_key() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "Both": { "nodeType": "end", "type": "start" },
            "EmptyCurrent": { "nodeType": "", "type": "start" }
        } } }"#,
    );
    assert_eq!(node(&flow, "Both").node_type, "end");
    assert_eq!(node(&flow, "EmptyCurrent").node_type, "start");
}

#[test]
fn test_unusable_nodes_are_skipped() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "NoType": { "config": {} },
            "Unknown": { "nodeType": "mystery" },
            "NotAnObject": "start",
            "Kept": { "nodeType": "start", "next": "Unknown" }
        } } }"#,
    );
    assert_eq!(flow.nodes.len(), 1);
    let kept = &flow.nodes[0];
    assert_eq!(kept.name, "Kept");
    assert_eq!(kept.next, None);
    // Skipped definitions still consume their grid slot.
    assert_eq!(kept.position, Position::new(100.0, 250.0));
}

#[test]
fn test_grid_positions() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "N1": { "nodeType": "start" },
            "N2": { "nodeType": "execute" },
            "N3": { "nodeType": "execute" },
            "N4": { "nodeType": "end" }
        } } }"#,
    );
    let positions: Vec<Position> = flow.nodes.iter().map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(100.0, 100.0),
            Position::new(350.0, 100.0),
            Position::new(600.0, 100.0),
            Position::new(100.0, 250.0),
        ]
    );
}

#[test]
fn test_explicit_position_is_honored() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "N1": { "nodeType": "start", "position": { "x": 12.5, "y": -4 } }
        } } }"#,
    );
    assert_eq!(flow.nodes[0].position, Position::new(12.5, -4.0));
}

#[test]
fn test_custom_layout() {
    let importer = Importer::builder()
        .with_layout(GridLayout {
            origin_x: 0.0,
            origin_y: 0.0,
            spacing_x: 10.0,
            spacing_y: 20.0,
            columns: 1,
        })
        .build();
    let flow = importer
        .import_str(
            r#"{ "config": { "nodes": { "A": { "nodeType": "start" }, "B": { "nodeType": "end" } } } }"#,
            &mut SequentialIds::new("n"),
            "Layout",
        )
        .unwrap();
    assert_eq!(flow.nodes[1].position, Position::new(0.0, 20.0));
}

#[test]
fn test_start_node_is_moved_to_front() {
    let flow = import(
        r#"{ "config": { "startNode": "C", "nodes": {
            "A": { "nodeType": "execute", "next": "B" },
            "B": { "nodeType": "end" },
            "C": { "nodeType": "start", "next": "A" }
        } } }"#,
    );
    let names: Vec<&str> = flow.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    // Positions still follow document order.
    assert_eq!(flow.nodes[0].position, Position::new(600.0, 100.0));
}

#[test]
fn test_unresolved_start_node_keeps_document_order() {
    let flow = import(
        r#"{ "config": { "startNode": "Nope", "nodes": {
            "A": { "nodeType": "start" },
            "B": { "nodeType": "end" }
        } } }"#,
    );
    assert_eq!(flow.nodes[0].name, "A");
}

#[test]
fn test_null_and_missing_config_become_empty_objects() {
    let flow = import(
        r#"{ "config": { "nodes": {
            "A": { "nodeType": "start", "config": null },
            "B": { "nodeType": "end" }
        } } }"#,
    );
    assert!(flow.nodes.iter().all(|n| n.config == json!({})));
}

#[test]
fn test_type_mapping() {
    let importer = Importer::builder().with_type_mapping("begin", "start").build();
    let flow = importer
        .import_str(
            r#"{ "config": { "nodes": { "Entry": { "nodeType": "begin" } } } }"#,
            &mut SequentialIds::new("n"),
            "Mapped",
        )
        .unwrap();
    assert_eq!(flow.nodes.len(), 1);
    assert_eq!(flow.nodes[0].node_type, "begin");
}

#[test]
fn test_mapping_to_unknown_type_is_ignored() {
    let importer = Importer::builder().with_type_mapping("begin", "nothing").build();
    assert!(!importer.registry().contains("begin"));
}

#[test]
fn test_malformed_json_is_an_error() {
    let result = test_importer().import_str("{not json", &mut SequentialIds::new("n"), "Broken");
    assert!(matches!(result, Err(ImportError::JsonParseError(_))));
}

#[test]
fn test_wrong_shapes_fall_back_to_defaults() {
    let flow = import_value(&json!({
        "configId": 42,
        "input": "nope",
        "required": 7,
        "config": { "startNode": 3, "nodes": [1, 2, 3] }
    }));
    assert_eq!(flow.config_id, "n-2");
    assert!(flow.input.is_empty());
    assert!(flow.required.is_empty());
    assert!(flow.nodes.is_empty());

    let flow = import_value(&json!([1, 2, 3]));
    assert!(flow.nodes.is_empty());
    assert_eq!(flow.config_type, "workflow");
}
