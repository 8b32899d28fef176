//! Structured request/response contract for external drivers
//!
//! Drivers that source payloads from elsewhere (prompts, files, pipes) speak
//! to the engine through [`Request`] values and get one [`ResultEnvelope`]
//! back per request: no streaming, no partial responses. How requests are
//! sourced and how envelopes are rendered is entirely the driver's concern.

use crate::engine::GraphEngine;
use crate::graph::{Edge, GraphError, GraphResult, Node};
use crate::query::SearchFilter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One engine request, JSON-shape-compatible
///
/// ```json
/// {"op": "AddNode", "payload": {"guid": "n1", "type": "person"}}
/// {"op": "SearchNodes", "filters": [{"field": "age", "condition": "GreaterThan", "value": "35"}]}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    AddNode {
        payload: serde_json::Value,
    },
    GetNode {
        guid: String,
    },
    UpdateNode {
        payload: serde_json::Value,
    },
    GetAllNodes,
    AddEdge {
        from: String,
        to: String,
        payload: serde_json::Value,
    },
    GetEdge {
        guid: String,
    },
    UpdateEdge {
        payload: serde_json::Value,
    },
    GetAllEdges,
    GetEdges {
        node: String,
    },
    GetNeighbors {
        node: String,
    },
    GetDescendants {
        node: String,
    },
    SearchNodes {
        #[serde(default)]
        guids: Vec<String>,
        #[serde(default)]
        filters: Vec<FilterSpec>,
    },
    SearchEdges {
        #[serde(default)]
        guids: Vec<String>,
        #[serde(default)]
        filters: Vec<FilterSpec>,
    },
}

/// Wire form of a search filter; the condition arrives as free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub condition: String,
    pub value: String,
}

impl FilterSpec {
    /// Validate the condition name against the closed condition set
    pub fn into_filter(self) -> GraphResult<SearchFilter> {
        let condition = self.condition.parse()?;
        Ok(SearchFilter::new(self.field, condition, self.value))
    }
}

/// Successful payload of an envelope
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Node(Node),
    Nodes(Vec<Node>),
    Edge(Edge),
    Edges(Vec<Edge>),
}

/// Machine-readable error detail
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Response envelope: success indicator, payload, and error detail
///
/// Exactly one of `data` and `error` is present.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ResultEnvelope {
    pub fn ok(data: ResponseData) -> Self {
        ResultEnvelope {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: &GraphError) -> Self {
        ResultEnvelope {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }
}

fn wrap<T>(result: GraphResult<T>, into: impl FnOnce(T) -> ResponseData) -> ResultEnvelope {
    match result {
        Ok(value) => ResultEnvelope::ok(into(value)),
        Err(err) => {
            debug!(code = err.code(), "request failed: {err}");
            ResultEnvelope::fail(&err)
        }
    }
}

fn parse_filters(specs: Vec<FilterSpec>) -> GraphResult<Vec<SearchFilter>> {
    specs.into_iter().map(FilterSpec::into_filter).collect()
}

impl GraphEngine {
    /// Execute one structured request and assemble its envelope
    ///
    /// Caller errors are carried inside the envelope; this never panics on
    /// bad input.
    pub fn execute(&self, request: Request) -> ResultEnvelope {
        match request {
            Request::AddNode { payload } => wrap(self.add_node(payload), ResponseData::Node),
            Request::GetNode { guid } => wrap(self.get_node(&guid), ResponseData::Node),
            Request::UpdateNode { payload } => wrap(self.update_node(payload), ResponseData::Node),
            Request::GetAllNodes => ResultEnvelope::ok(ResponseData::Nodes(self.all_nodes())),
            Request::AddEdge { from, to, payload } => {
                wrap(self.add_edge(&from, &to, payload), ResponseData::Edge)
            }
            Request::GetEdge { guid } => wrap(self.get_edge(&guid), ResponseData::Edge),
            Request::UpdateEdge { payload } => wrap(self.update_edge(payload), ResponseData::Edge),
            Request::GetAllEdges => ResultEnvelope::ok(ResponseData::Edges(self.all_edges())),
            Request::GetEdges { node } => wrap(self.edges_of(&node), ResponseData::Edges),
            Request::GetNeighbors { node } => wrap(self.neighbors(&node), ResponseData::Nodes),
            Request::GetDescendants { node } => wrap(self.descendants(&node), ResponseData::Nodes),
            Request::SearchNodes { guids, filters } => match parse_filters(filters) {
                Ok(filters) => {
                    ResultEnvelope::ok(ResponseData::Nodes(self.search_nodes(&guids, &filters)))
                }
                Err(err) => ResultEnvelope::fail(&err),
            },
            Request::SearchEdges { guids, filters } => match parse_filters(filters) {
                Ok(filters) => {
                    ResultEnvelope::ok(ResponseData::Edges(self.search_edges(&guids, &filters)))
                }
                Err(err) => ResultEnvelope::fail(&err),
            },
        }
    }
}
