//! Fan-out collection of everything the flow builder consumes.
//!
//! Mirrors the dashboard's fetch discipline: the topology is required, and
//! every enrichment source (SG gaps, IAM gaps, NACLs, traffic, X-Ray) is
//! fetched in parallel and allowed to fail independently. A failed fetch is
//! a first-class `Unavailable`, not an empty vector, so callers can tell
//! "nothing configured" apart from "could not ask".

use std::collections::HashSet;

use crate::flows::builder::FlowBuildContext;
use crate::model::{IamGap, NaclAnalysis, SgGapAnalysis, Topology, TrafficSummary, XrayServiceMap};
use crate::proxy::{BackendClient, ProxyError};

/// Per-SG fetch cap; gap analyses are requested one security group at a
/// time and a large system would otherwise fan out unboundedly.
const MAX_SG_LOOKUPS: usize = 10;

/// Outcome of one best-effort sub-fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Available(T),
    Unavailable,
}

impl<T> Fetched<T> {
    pub fn from_result(result: Result<T, ProxyError>, what: &str) -> Self {
        match result {
            Ok(value) => Fetched::Available(value),
            Err(e) => {
                log::debug!("{} unavailable: {}", what, e);
                Fetched::Unavailable
            }
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Available(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

fn window_days(window: &str) -> u32 {
    match window {
        "7d" => 7,
        "30d" => 30,
        _ => 1,
    }
}

pub struct FlowSources<'a> {
    client: &'a BackendClient,
}

impl<'a> FlowSources<'a> {
    pub fn new(client: &'a BackendClient) -> Self {
        FlowSources { client }
    }

    /// Load everything the builder needs for one system. Only the topology
    /// fetch can fail the call; enrichment failures degrade to absence.
    pub async fn load(&self, system_name: &str, window: &str) -> Result<FlowBuildContext, ProxyError> {
        let topology: Topology = self
            .client
            .get_json(&format!(
                "/api/dependency-map/graph?systemName={}",
                system_name
            ))
            .await?;

        let days = window_days(window);
        let (sg_gaps, iam_gaps, nacls, traffic, xray) = tokio::join!(
            self.fetch_sg_gaps(&topology, days),
            self.fetch_iam_gaps(system_name),
            self.fetch_nacls(system_name),
            self.fetch_traffic(system_name),
            self.fetch_xray(),
        );

        Ok(FlowBuildContext {
            nodes: topology.nodes,
            edges: topology.edges,
            sg_gaps: sg_gaps.unwrap_or_default(),
            iam_gaps: iam_gaps.unwrap_or_default(),
            nacls: nacls.unwrap_or_default(),
            traffic: traffic.into_option(),
            xray: xray.into_option(),
        })
    }

    /// One gap-analysis call per distinct security group referenced by the
    /// topology, bounded, each failure dropped.
    async fn fetch_sg_gaps(&self, topology: &Topology, days: u32) -> Fetched<Vec<SgGapAnalysis>> {
        let mut seen = HashSet::new();
        let sg_ids: Vec<&String> = topology
            .nodes
            .iter()
            .flat_map(|n| n.security_groups.iter())
            .filter(|id| seen.insert(id.as_str()))
            .take(MAX_SG_LOOKUPS)
            .collect();

        let mut gaps = Vec::new();
        for sg_id in sg_ids {
            let result: Result<SgGapAnalysis, ProxyError> = self
                .client
                .get_json(&format!(
                    "/api/security-groups/{}/gap-analysis?days={}",
                    sg_id, days
                ))
                .await;
            match result {
                Ok(gap) => gaps.push(gap),
                Err(e) => log::debug!("SG gap analysis for {} unavailable: {}", sg_id, e),
            }
        }
        Fetched::Available(gaps)
    }

    async fn fetch_iam_gaps(&self, system_name: &str) -> Fetched<Vec<IamGap>> {
        Fetched::from_result(
            self.client
                .get_json(&format!("/api/iam-analysis/gaps/{}", system_name))
                .await,
            "IAM gap analysis",
        )
    }

    async fn fetch_nacls(&self, system_name: &str) -> Fetched<Vec<NaclAnalysis>> {
        Fetched::from_result(
            self.client
                .get_json(&format!("/api/nacl-analysis?system_name={}", system_name))
                .await,
            "NACL analysis",
        )
    }

    async fn fetch_traffic(&self, system_name: &str) -> Fetched<TrafficSummary> {
        Fetched::from_result(
            self.client
                .get_json(&format!("/api/traffic-data?system_name={}", system_name))
                .await,
            "Traffic data",
        )
    }

    async fn fetch_xray(&self) -> Fetched<XrayServiceMap> {
        Fetched::from_result(
            self.client.get_json("/api/xray/service-map").await,
            "X-Ray service map",
        )
    }
}
