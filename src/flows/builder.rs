//! Heuristic construction of the full-stack flow strips.
//!
//! This does not path-find over the real edge set. It assumes the classic
//! web-tier → app-tier → data-tier shape and fills each of a fixed set of
//! templates with whichever discovered resources happen to exist, wiring
//! security gates in via best-effort name matching. A missing bucket skips
//! its template silently; no partial flow is ever emitted.

use crate::flows::resolver::{
    nacl_checkpoint, resolve_iam_checkpoint, resolve_sg_checkpoint, PLACEHOLDER_APP_SG,
    PLACEHOLDER_DB_SG, PLACEHOLDER_WEB_SG,
};
use crate::model::{
    Flow, FlowCheckpoint, FlowNode, FlowSegment, FlowStatus, GraphEdge, GraphNode, IamGap,
    NaclAnalysis, SgGapAnalysis, SummaryStat, TrafficSummary, XrayServiceMap,
};

/// Rendering volume cap: flows are built for at most this many compute nodes.
pub const MAX_COMPUTE_NODES: usize = 3;

/// Display defaults used when the optional traffic / APM fetches were
/// unavailable.
pub const DEFAULT_REQUEST_COUNT: u64 = 1250;
pub const DEFAULT_P95_LATENCY_MS: f64 = 45.0;

/// Everything the builder consumes. Only `nodes` is required in practice;
/// every other field degrades to "absent" when its fetch failed.
#[derive(Debug, Default, Clone)]
pub struct FlowBuildContext {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub sg_gaps: Vec<SgGapAnalysis>,
    pub iam_gaps: Vec<IamGap>,
    pub nacls: Vec<NaclAnalysis>,
    pub traffic: Option<TrafficSummary>,
    pub xray: Option<XrayServiceMap>,
}

impl FlowBuildContext {
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        sg_gaps: Vec<SgGapAnalysis>,
        iam_gaps: Vec<IamGap>,
    ) -> Self {
        FlowBuildContext {
            nodes,
            edges,
            sg_gaps,
            iam_gaps,
            ..Default::default()
        }
    }
}

/// Typed buckets produced by substring matching on the lower-cased node
/// type (and name, for resources AWS reports under generic types).
#[derive(Debug, Default)]
struct NodeBuckets<'a> {
    compute: Vec<&'a GraphNode>,
    databases: Vec<&'a GraphNode>,
    storage: Vec<&'a GraphNode>,
    nosql: Vec<&'a GraphNode>,
    functions: Vec<&'a GraphNode>,
    load_balancers: Vec<&'a GraphNode>,
    vpc_endpoints: Vec<&'a GraphNode>,
    secrets_managers: Vec<&'a GraphNode>,
}

fn partition_nodes(nodes: &[GraphNode]) -> NodeBuckets<'_> {
    let mut buckets = NodeBuckets::default();
    for node in nodes {
        let t = node.node_type.to_lowercase();
        let n = node.name.to_lowercase();
        if t.contains("lambda") {
            buckets.functions.push(node);
        } else if t.contains("dynamodb") {
            buckets.nosql.push(node);
        } else if t.contains("rds") {
            buckets.databases.push(node);
        } else if t.contains("s3") {
            buckets.storage.push(node);
        } else if is_load_balancer(&t, &n) {
            buckets.load_balancers.push(node);
        } else if is_vpc_endpoint(&t, &n) {
            buckets.vpc_endpoints.push(node);
        } else if is_secrets_manager(&t, &n) {
            buckets.secrets_managers.push(node);
        } else if t.contains("ec2") || t.contains("instance") {
            buckets.compute.push(node);
        }
    }
    buckets
}

fn is_load_balancer(t: &str, n: &str) -> bool {
    t.contains("loadbalancer")
        || t.contains("load-balancer")
        || t.contains("alb")
        || t.contains("elb")
        || n.contains("alb")
        || n.contains("elb")
}

fn is_vpc_endpoint(t: &str, n: &str) -> bool {
    t.contains("vpcendpoint") || t.contains("vpc-endpoint") || t.contains("vpce") || n.contains("vpce")
}

fn is_secrets_manager(t: &str, n: &str) -> bool {
    t.contains("secret") || n.contains("secret")
}

fn flow_node(node: &GraphNode, tier: &str) -> FlowNode {
    FlowNode::new(&node.id, &node.name, tier)
}

fn internet_node() -> FlowNode {
    FlowNode::new("internet", "Internet", "internet")
}

fn aws_api_node() -> FlowNode {
    FlowNode::new("aws-api", "AWS APIs", "aws")
}

fn api_gateway_node() -> FlowNode {
    FlowNode::new("api-gateway", "API Gateway", "edge")
}

fn segment(from: FlowNode, to: FlowNode, checkpoints: Vec<FlowCheckpoint>) -> FlowSegment {
    FlowSegment {
        from,
        to,
        checkpoints,
    }
}

/// Build the fixed catalogue of illustrative flows from whatever resources
/// and gap analyses are present. Pure and synchronous; called once per
/// request against data already sized for a browser tab.
pub fn build_full_stack_flows(ctx: &FlowBuildContext) -> Vec<Flow> {
    let buckets = partition_nodes(&ctx.nodes);
    let mut drafts: Vec<(Vec<FlowSegment>, Option<String>)> = Vec::new();

    for compute in buckets.compute.iter().take(MAX_COMPUTE_NODES) {
        if let Some(segments) = database_flow(compute, &buckets, ctx) {
            drafts.push((segments, Some(compute.name.clone())));
        }
        if let Some(segments) = storage_flow(compute, &buckets, ctx) {
            drafts.push((segments, Some(compute.name.clone())));
        }
        if let Some(segments) = secrets_flow(compute, &buckets, ctx) {
            drafts.push((segments, Some(compute.name.clone())));
        }
        if let Some(segments) = aws_api_flow(compute, ctx) {
            drafts.push((segments, Some(compute.name.clone())));
        }
    }

    if let Some(segments) = serverless_flow(&buckets, ctx) {
        let name = buckets.functions.first().map(|f| f.name.clone());
        drafts.push((segments, name));
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(idx, (segments, service_name))| finalize(idx, segments, service_name, ctx))
        .collect()
}

/// Internet → [load balancer] → compute → database.
fn database_flow(
    compute: &GraphNode,
    buckets: &NodeBuckets<'_>,
    ctx: &FlowBuildContext,
) -> Option<Vec<FlowSegment>> {
    let db = buckets.databases.first()?;
    let internet = internet_node();
    let c = flow_node(compute, "compute");
    let d = flow_node(db, "data");

    let mut entry_gates = Vec::new();
    if let Some(nacl) = nacl_checkpoint(&ctx.nacls) {
        entry_gates.push(nacl);
    }
    entry_gates.push(resolve_sg_checkpoint(
        &compute.name,
        &ctx.sg_gaps,
        &PLACEHOLDER_WEB_SG,
    ));

    let data_gates = vec![
        resolve_sg_checkpoint(&compute.name, &ctx.sg_gaps, &PLACEHOLDER_APP_SG),
        resolve_sg_checkpoint(&db.name, &ctx.sg_gaps, &PLACEHOLDER_DB_SG),
    ];

    let mut segments = Vec::new();
    if let Some(lb) = buckets.load_balancers.first() {
        let l = flow_node(lb, "edge");
        segments.push(segment(internet, l.clone(), entry_gates));
        segments.push(segment(
            l,
            c.clone(),
            vec![resolve_sg_checkpoint(
                &compute.name,
                &ctx.sg_gaps,
                &PLACEHOLDER_APP_SG,
            )],
        ));
    } else {
        segments.push(segment(internet, c.clone(), entry_gates));
    }
    segments.push(segment(c, d, data_gates));
    Some(segments)
}

/// Compute → [S3 gateway endpoint] → bucket, gated by the app SG and the
/// instance role.
fn storage_flow(
    compute: &GraphNode,
    buckets: &NodeBuckets<'_>,
    ctx: &FlowBuildContext,
) -> Option<Vec<FlowSegment>> {
    let bucket = buckets.storage.first()?;
    let c = flow_node(compute, "compute");
    let s = flow_node(bucket, "data");
    let sg_gate = resolve_sg_checkpoint(&compute.name, &ctx.sg_gaps, &PLACEHOLDER_APP_SG);
    let iam_gate =
        resolve_iam_checkpoint(&compute.name, compute.iam_role.as_deref(), &ctx.iam_gaps);

    let gateway = buckets
        .vpc_endpoints
        .iter()
        .find(|e| e.name.to_lowercase().contains("s3"));

    Some(match gateway {
        Some(endpoint) => {
            let e = flow_node(endpoint, "edge");
            vec![
                segment(c, e.clone(), vec![sg_gate]),
                segment(e, s, vec![iam_gate]),
            ]
        }
        None => vec![segment(c, s, vec![sg_gate, iam_gate])],
    })
}

/// Compute → [interface endpoint] → Secrets Manager, IAM gated.
fn secrets_flow(
    compute: &GraphNode,
    buckets: &NodeBuckets<'_>,
    ctx: &FlowBuildContext,
) -> Option<Vec<FlowSegment>> {
    let secrets = buckets.secrets_managers.first()?;
    let c = flow_node(compute, "compute");
    let s = flow_node(secrets, "data");
    let sg_gate = resolve_sg_checkpoint(&compute.name, &ctx.sg_gaps, &PLACEHOLDER_APP_SG);
    let iam_gate =
        resolve_iam_checkpoint(&compute.name, compute.iam_role.as_deref(), &ctx.iam_gaps);

    let interface = buckets
        .vpc_endpoints
        .iter()
        .find(|e| e.name.to_lowercase().contains("secret"));

    Some(match interface {
        Some(endpoint) => {
            let e = flow_node(endpoint, "edge");
            vec![
                segment(c, e.clone(), vec![sg_gate]),
                segment(e, s, vec![iam_gate]),
            ]
        }
        None => vec![segment(c, s, vec![sg_gate, iam_gate])],
    })
}

/// Internet → compute → generic AWS APIs. Only emitted when an IAM gap
/// record actually matched the compute node; an all-placeholder version of
/// this template carries no information.
fn aws_api_flow(compute: &GraphNode, ctx: &FlowBuildContext) -> Option<Vec<FlowSegment>> {
    let iam_gate =
        resolve_iam_checkpoint(&compute.name, compute.iam_role.as_deref(), &ctx.iam_gaps);
    if !iam_gate.matched {
        return None;
    }

    let internet = internet_node();
    let c = flow_node(compute, "compute");
    let mut entry_gates = Vec::new();
    if let Some(nacl) = nacl_checkpoint(&ctx.nacls) {
        entry_gates.push(nacl);
    }
    entry_gates.push(resolve_sg_checkpoint(
        &compute.name,
        &ctx.sg_gaps,
        &PLACEHOLDER_WEB_SG,
    ));

    Some(vec![
        segment(internet, c.clone(), entry_gates),
        segment(c, aws_api_node(), vec![iam_gate]),
    ])
}

/// API Gateway → Lambda → DynamoDB, attempted once per build.
fn serverless_flow(
    buckets: &NodeBuckets<'_>,
    ctx: &FlowBuildContext,
) -> Option<Vec<FlowSegment>> {
    let function = buckets.functions.first()?;
    let table = buckets.nosql.first()?;
    let f = flow_node(function, "compute");
    let t = flow_node(table, "data");
    let invoke_gate =
        resolve_iam_checkpoint(&function.name, function.iam_role.as_deref(), &ctx.iam_gaps);
    let table_gate =
        resolve_iam_checkpoint(&function.name, function.iam_role.as_deref(), &ctx.iam_gaps);

    Some(vec![
        segment(api_gateway_node(), f.clone(), vec![invoke_gate]),
        segment(f, t, vec![table_gate]),
    ])
}

fn finalize(
    idx: usize,
    segments: Vec<FlowSegment>,
    service_name: Option<String>,
    ctx: &FlowBuildContext,
) -> Flow {
    let total_gaps: u32 = segments
        .iter()
        .flat_map(|s| s.checkpoints.iter())
        .map(|c| c.gap_count)
        .sum();

    let path_description = describe_path(&segments);
    let source = segments[0].from.clone();
    let destination = segments[segments.len() - 1].to.clone();

    let requests = ctx
        .traffic
        .as_ref()
        .map(|t| t.total_requests)
        .unwrap_or(DEFAULT_REQUEST_COUNT);
    let p95 = resolve_p95(service_name.as_deref(), ctx);

    let status = if total_gaps > 0 {
        FlowStatus::Warning
    } else {
        FlowStatus::Active
    };

    Flow {
        id: format!("flow-{}", idx),
        path_description,
        source,
        destination,
        segments,
        status,
        total_gaps,
        summary_stats: vec![
            SummaryStat::new("Requests", requests.to_string()),
            SummaryStat::new("Gaps", total_gaps.to_string()),
            SummaryStat::new("p95 latency", format!("{:.0}ms", p95)),
        ],
    }
}

/// Segments form a contiguous chain, so the path is the first node followed
/// by every segment's destination.
fn describe_path(segments: &[FlowSegment]) -> String {
    let mut names = vec![segments[0].from.name.clone()];
    for seg in segments {
        names.push(seg.to.name.clone());
    }
    names.join(" → ")
}

fn resolve_p95(service_name: Option<&str>, ctx: &FlowBuildContext) -> f64 {
    let (name, xray) = match (service_name, ctx.xray.as_ref()) {
        (Some(n), Some(x)) => (n, x),
        _ => return DEFAULT_P95_LATENCY_MS,
    };
    let short = crate::flows::resolver::short_name(name);
    xray.services
        .iter()
        .find(|s| {
            let svc = s.name.to_lowercase();
            svc.contains(&short) || short.contains(&svc)
        })
        .map(|s| s.p95_latency_ms)
        .unwrap_or(DEFAULT_P95_LATENCY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, node_type: &str) -> GraphNode {
        GraphNode::new(id, name, node_type)
    }

    #[test]
    fn partitioning_is_type_driven() {
        let nodes = vec![
            node("i-1", "app-1", "EC2"),
            node("db-1", "payments-db", "RDS"),
            node("b-1", "assets", "S3Bucket"),
            node("fn-1", "ingest", "LambdaFunction"),
            node("t-1", "events", "DynamoDBTable"),
            node("lb-1", "public-alb", "Instance"),
            node("vpce-1", "vpce-s3-gateway", "VpcEndpoint"),
        ];
        let buckets = partition_nodes(&nodes);
        assert_eq!(buckets.compute.len(), 1);
        assert_eq!(buckets.databases.len(), 1);
        assert_eq!(buckets.storage.len(), 1);
        assert_eq!(buckets.functions.len(), 1);
        assert_eq!(buckets.nosql.len(), 1);
        assert_eq!(buckets.load_balancers.len(), 1);
        assert_eq!(buckets.vpc_endpoints.len(), 1);
    }

    #[test]
    fn compute_nodes_are_capped() {
        let mut nodes: Vec<GraphNode> = (0..10)
            .map(|i| node(&format!("i-{}", i), &format!("web-{}", i), "ec2"))
            .collect();
        nodes.push(node("db-1", "orders-db", "rds"));
        let ctx = FlowBuildContext::new(nodes, vec![], vec![], vec![]);
        let flows = build_full_stack_flows(&ctx);
        assert_eq!(flows.len(), MAX_COMPUTE_NODES);
    }

    #[test]
    fn storage_flow_routes_through_gateway_endpoint() {
        let nodes = vec![
            node("i-1", "app-1", "ec2"),
            node("b-1", "assets", "s3"),
            node("vpce-1", "vpce-s3-gateway", "vpcendpoint"),
        ];
        let ctx = FlowBuildContext::new(nodes, vec![], vec![], vec![]);
        let flows = build_full_stack_flows(&ctx);
        assert_eq!(flows.len(), 1);
        let flow = &flows[0];
        assert_eq!(flow.path_description, "app-1 → vpce-s3-gateway → assets");
        assert_eq!(flow.segments.len(), 2);
    }

    #[test]
    fn serverless_flow_is_attempted_once() {
        let nodes = vec![
            node("fn-1", "ingest", "lambda"),
            node("fn-2", "export", "lambda"),
            node("t-1", "events", "dynamodb"),
        ];
        let ctx = FlowBuildContext::new(nodes, vec![], vec![], vec![]);
        let flows = build_full_stack_flows(&ctx);
        assert_eq!(flows.len(), 1);
        assert_eq!(
            flows[0].path_description,
            "API Gateway → ingest → events"
        );
    }
}
