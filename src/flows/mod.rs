pub mod builder;
pub mod drilldown;
pub mod resolver;
pub mod sources;

pub use builder::{build_full_stack_flows, FlowBuildContext};
pub use drilldown::{load_node_details, NodeDetails};
pub use sources::{Fetched, FlowSources};
