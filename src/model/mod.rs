pub mod flow;
pub mod gaps;
pub mod topology;

pub use flow::{
    CheckpointKind, Flow, FlowCheckpoint, FlowNode, FlowSegment, FlowStatus, SummaryStat,
};
pub use gaps::{
    IamGap, NaclAnalysis, NaclRule, RuleAnalysis, RuleStatus, SgGapAnalysis, TrafficSummary,
    XrayService, XrayServiceMap,
};
pub use topology::{EdgeKind, GraphEdge, GraphNode, Topology};
