use serde::{Deserialize, Serialize};

/// A discovered cloud resource from the backend graph store. Read-only on
/// this side; replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub is_internet_exposed: bool,
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub iam_role: Option<String>,
}

impl GraphNode {
    pub fn new(id: &str, name: &str, node_type: &str) -> Self {
        GraphNode {
            id: id.to_string(),
            name: name.to_string(),
            node_type: node_type.to_string(),
            vpc_id: None,
            subnet_id: None,
            is_internet_exposed: false,
            security_groups: Vec::new(),
            iam_role: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    Observed,
    Allowed,
}

/// An observed-traffic or configured-reachability relationship between two
/// nodes in the dependency map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub flows: u64,
    #[serde(default)]
    pub bytes_total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}
