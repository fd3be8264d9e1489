//! Per-node drill-down: the lookups behind the least-privilege detail card.
//!
//! Each lookup (resource configuration, findings, SG rules, IAM detail) is
//! independently optional; whatever subset succeeds is merged and the rest
//! defaults to absence.

use serde::Serialize;
use serde_json::Value;

use crate::flows::resolver::short_name;
use crate::flows::sources::Fetched;
use crate::model::{GraphNode, IamGap, RuleAnalysis, SgGapAnalysis, Topology};
use crate::proxy::{BackendClient, ProxyError};

#[derive(Debug, Serialize)]
pub struct NodeDetails {
    pub node_id: String,
    pub node_name: String,
    pub node_type: String,
    pub resource_config: Option<Value>,
    pub findings: Vec<Value>,
    pub security_group_rules: Vec<RuleAnalysis>,
    pub iam_gap: Option<IamGap>,
}

/// Locate the node in the system topology, then fan out the optional
/// lookups. Only an unknown node or an unreachable topology fetch fails.
pub async fn load_node_details(
    client: &BackendClient,
    system_name: &str,
    node_id: &str,
) -> Result<NodeDetails, ProxyError> {
    let topology: Topology = client
        .get_json(&format!(
            "/api/dependency-map/graph?systemName={}",
            system_name
        ))
        .await?;

    let node = topology
        .nodes
        .iter()
        .find(|n| n.id == node_id)
        .ok_or_else(|| ProxyError::Backend {
            status: 404,
            message: format!("Node {} not found in system {}", node_id, system_name),
        })?;

    let (resource_config, findings, sg_rules, iam_gap) = tokio::join!(
        fetch_resource_config(client, node),
        fetch_findings(client, node),
        fetch_sg_rules(client, node),
        fetch_iam_gap(client, node),
    );

    Ok(NodeDetails {
        node_id: node.id.clone(),
        node_name: node.name.clone(),
        node_type: node.node_type.clone(),
        resource_config: resource_config.into_option(),
        findings: findings.unwrap_or_default(),
        security_group_rules: sg_rules.unwrap_or_default(),
        iam_gap: iam_gap.into_option(),
    })
}

async fn fetch_resource_config(client: &BackendClient, node: &GraphNode) -> Fetched<Value> {
    Fetched::from_result(
        client
            .get_json(&format!("/api/resources/{}", node.id))
            .await,
        "Resource configuration",
    )
}

/// All findings, filtered down to the ones naming this resource.
async fn fetch_findings(client: &BackendClient, node: &GraphNode) -> Fetched<Vec<Value>> {
    let result: Result<Vec<Value>, ProxyError> = client.get_json("/api/findings").await;
    match result {
        Ok(all) => {
            let short = short_name(&node.name);
            let matching = all
                .into_iter()
                .filter(|f| finding_mentions(f, &short))
                .collect();
            Fetched::Available(matching)
        }
        Err(e) => {
            log::debug!("Findings unavailable: {}", e);
            Fetched::Unavailable
        }
    }
}

fn finding_mentions(finding: &Value, short: &str) -> bool {
    ["resource_name", "resource", "resource_id"]
        .iter()
        .filter_map(|key| finding.get(key).and_then(|v| v.as_str()))
        .any(|name| {
            let name = name.to_lowercase();
            name.contains(short) || short.contains(name.as_str())
        })
}

async fn fetch_sg_rules(client: &BackendClient, node: &GraphNode) -> Fetched<Vec<RuleAnalysis>> {
    let sg_id = match node.security_groups.first() {
        Some(id) => id,
        None => return Fetched::Available(Vec::new()),
    };
    let result: Result<SgGapAnalysis, ProxyError> = client
        .get_json(&format!("/api/security-groups/{}/gap-analysis", sg_id))
        .await;
    match result {
        Ok(gap) => Fetched::Available(gap.rules_analysis),
        Err(e) => {
            log::debug!("SG rules for {} unavailable: {}", sg_id, e);
            Fetched::Unavailable
        }
    }
}

async fn fetch_iam_gap(client: &BackendClient, node: &GraphNode) -> Fetched<IamGap> {
    let role = match node.iam_role.as_deref() {
        Some(role) => role,
        None => return Fetched::Unavailable,
    };
    Fetched::from_result(
        client
            .get_json(&format!("/api/iam-roles/{}/gap-analysis", role))
            .await,
        "IAM gap detail",
    )
}
