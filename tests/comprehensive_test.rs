//! End-to-end test driving every engine operation through the public API

use keygraph::{
    EngineConfig, GraphEngine, GraphError, Namespace, Request, ResponseData, SearchCondition,
    SearchFilter,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_person_graph_scenario() {
    init_tracing();
    let engine = GraphEngine::in_memory();

    engine
        .add_node(json!({"guid": "n1", "type": "person", "age": "30"}))
        .unwrap();
    engine
        .add_node(json!({"guid": "n2", "type": "person", "age": "41"}))
        .unwrap();
    engine
        .add_edge("n1", "n2", json!({"guid": "e1", "kind": "knows"}))
        .unwrap();

    // Neighbors of n1 is exactly n2.
    let neighbors = engine.neighbors("n1").unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].guid.as_str(), "n2");

    // Age filter matches only n2.
    let found = engine.search_nodes(
        &[],
        &[SearchFilter::new("age", SearchCondition::GreaterThan, "35")],
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].guid.as_str(), "n2");
}

#[test]
fn test_insert_then_get_returns_equal_properties() {
    let engine = GraphEngine::in_memory();
    let payload = json!({
        "guid": "n1",
        "name": "Alice",
        "age": 30,
        "address": {"city": "Oslo", "zip": "0150"},
        "tags": ["alpha", "beta"]
    });

    let created = engine.add_node(payload.clone()).unwrap();
    let fetched = engine.get_node("n1").unwrap();

    assert_eq!(fetched.properties, created.properties);
    // The stored property mapping round-trips to the original JSON payload.
    assert_eq!(serde_json::to_value(&fetched.properties).unwrap(), payload);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[test]
fn test_duplicate_node_guid_rejected_and_original_intact() {
    let engine = GraphEngine::in_memory();
    engine
        .add_node(json!({"guid": "n1", "type": "person"}))
        .unwrap();

    let err = engine
        .add_node(json!({"guid": "n1", "type": "robot"}))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::DuplicateIdentity {
            namespace: Namespace::Node,
            guid: "n1".to_string(),
        }
    );

    let node = engine.get_node("n1").unwrap();
    assert_eq!(node.get_property("type").unwrap().as_str(), Some("person"));
    assert_eq!(engine.all_nodes().len(), 1);
}

#[test]
fn test_edge_requires_existing_endpoints() {
    let engine = GraphEngine::in_memory();
    engine.add_node(json!({"guid": "a"})).unwrap();

    let err = engine
        .add_edge("a", "missing", json!({"guid": "e1"}))
        .unwrap_err();
    assert_eq!(err, GraphError::DanglingReference("missing".into()));

    let err = engine
        .add_edge("missing", "a", json!({"guid": "e1"}))
        .unwrap_err();
    assert_eq!(err, GraphError::DanglingReference("missing".into()));

    assert!(engine.all_edges().is_empty());
}

#[test]
fn test_update_node_is_wholesale_replacement() {
    let engine = GraphEngine::in_memory();
    engine
        .add_node(json!({"guid": "n1", "type": "person", "age": "30"}))
        .unwrap();

    let updated = engine
        .update_node(json!({"guid": "n1", "type": "robot"}))
        .unwrap();
    assert_eq!(updated.get_property("type").unwrap().as_str(), Some("robot"));

    // `age` is gone from subsequent reads.
    let node = engine.get_node("n1").unwrap();
    assert!(node.get_property("age").is_none());
    assert!(node.updated_at >= node.created_at);
}

#[test]
fn test_update_edge_preserves_endpoints() {
    let engine = GraphEngine::in_memory();
    engine.add_node(json!({"guid": "a"})).unwrap();
    engine.add_node(json!({"guid": "b"})).unwrap();
    engine
        .add_edge("a", "b", json!({"guid": "e1", "weight": 1}))
        .unwrap();

    let updated = engine
        .update_edge(json!({"guid": "e1", "kind": "road"}))
        .unwrap();
    assert_eq!(updated.from.as_str(), "a");
    assert_eq!(updated.to.as_str(), "b");
    assert!(updated.get_property("weight").is_none());

    let err = engine.update_edge(json!({"guid": "ghost"})).unwrap_err();
    assert_eq!(
        err,
        GraphError::NotFound {
            namespace: Namespace::Edge,
            guid: "ghost".to_string(),
        }
    );
}

#[test]
fn test_incident_edges_listing() {
    let engine = GraphEngine::in_memory();
    for guid in ["a", "b", "c"] {
        engine.add_node(json!({"guid": guid})).unwrap();
    }
    engine.add_edge("a", "b", json!({"guid": "e1"})).unwrap();
    engine.add_edge("c", "a", json!({"guid": "e2"})).unwrap();
    engine.add_edge("b", "c", json!({"guid": "e3"})).unwrap();
    engine.add_edge("a", "a", json!({"guid": "loop"})).unwrap();

    let incident: Vec<String> = engine
        .edges_of("a")
        .unwrap()
        .iter()
        .map(|e| e.guid.to_string())
        .collect();
    assert_eq!(incident, vec!["e1", "e2", "loop"]);

    assert!(engine.edges_of("ghost").is_err());
}

#[test]
fn test_node_and_edge_guid_namespaces_are_independent() {
    let engine = GraphEngine::in_memory();
    engine.add_node(json!({"guid": "same"})).unwrap();
    engine.add_node(json!({"guid": "other"})).unwrap();

    // An edge may carry the same literal GUID as a node.
    engine
        .add_edge("same", "other", json!({"guid": "same"}))
        .unwrap();
    assert!(engine.get_node("same").is_ok());
    assert!(engine.get_edge("same").is_ok());
}

#[test]
fn test_custom_identity_property_keys() {
    let engine = GraphEngine::with_config(EngineConfig {
        node_guid_property: "id".to_string(),
        edge_guid_property: "link_id".to_string(),
    });

    // The configured keys are exposed so callers know what to send.
    assert_eq!(engine.node_guid_property(), "id");
    assert_eq!(engine.edge_guid_property(), "link_id");

    engine.add_node(json!({"id": "n1"})).unwrap();

    let err = engine.add_node(json!({"guid": "n2"})).unwrap_err();
    assert_eq!(err, GraphError::MissingIdentityProperty("id".to_string()));
}

#[test]
fn test_envelope_driver_round_trip() {
    let engine = GraphEngine::in_memory();

    // A driver ships requests as JSON and receives envelopes back.
    let request: Request = serde_json::from_value(json!({
        "op": "AddNode",
        "payload": {"guid": "n1", "type": "person"}
    }))
    .unwrap();
    let envelope = engine.execute(request);
    assert!(envelope.success);

    let request: Request =
        serde_json::from_value(json!({"op": "GetNode", "guid": "ghost"})).unwrap();
    let envelope = engine.execute(request);
    assert!(!envelope.success);
    assert_eq!(envelope.error.as_ref().unwrap().code, "NotFound");

    let request: Request = serde_json::from_value(json!({"op": "GetAllNodes"})).unwrap();
    match engine.execute(request).data {
        Some(ResponseData::Nodes(nodes)) => assert_eq!(nodes.len(), 1),
        other => panic!("unexpected data: {other:?}"),
    }
}

#[test]
fn test_fresh_guid_insert_then_get() {
    let engine = GraphEngine::in_memory();
    let guid = uuid::Uuid::new_v4().to_string();
    let payload = json!({"guid": guid.clone(), "type": "person"});

    engine.add_node(payload.clone()).unwrap();

    let node = engine.get_node(&guid).unwrap();
    assert_eq!(serde_json::to_value(&node.properties).unwrap(), payload);
}
