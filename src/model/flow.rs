use serde::{Deserialize, Serialize};

/// A node as it appears on a rendered flow strip. `tier` is a display hint
/// (internet, edge, compute, data, aws), not a topology fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowNode {
    pub id: String,
    pub name: String,
    pub tier: String,
}

impl FlowNode {
    pub fn new(id: &str, name: &str, tier: &str) -> Self {
        FlowNode {
            id: id.to_string(),
            name: name.to_string(),
            tier: tier.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    SecurityGroup,
    Iam,
    Nacl,
}

/// A security gate rendered inline on a flow segment. `matched` is false
/// when the gate is a placeholder because no gap-analysis record could be
/// correlated with the resource name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowCheckpoint {
    pub id: String,
    pub name: String,
    pub kind: CheckpointKind,
    pub used_count: u32,
    pub total_count: u32,
    pub gap_count: u32,
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowSegment {
    pub from: FlowNode,
    pub to: FlowNode,
    pub checkpoints: Vec<FlowCheckpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Active,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryStat {
    pub label: String,
    pub value: String,
}

impl SummaryStat {
    pub fn new(label: &str, value: String) -> Self {
        SummaryStat {
            label: label.to_string(),
            value,
        }
    }
}

/// A UI-synthesized illustrative path built from heuristic matching over
/// real topology and gap-analysis data. Ephemeral: rebuilt from scratch on
/// every request, ids derived from build order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    pub id: String,
    pub path_description: String,
    pub source: FlowNode,
    pub destination: FlowNode,
    pub segments: Vec<FlowSegment>,
    pub status: FlowStatus,
    pub total_gaps: u32,
    pub summary_stats: Vec<SummaryStat>,
}
