use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleStatus {
    Used,
    Unused,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleAnalysis {
    pub source: String,
    pub port_range: String,
    pub protocol: String,
    pub status: RuleStatus,
    #[serde(default)]
    pub hits: u64,
}

/// Per-security-group usage summary computed by the backend from VPC flow
/// logs: which configured rules were actually hit in the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SgGapAnalysis {
    pub sg_id: String,
    pub sg_name: String,
    #[serde(default)]
    pub rules_analysis: Vec<RuleAnalysis>,
    pub used_rules: u32,
    pub unused_rules: u32,
    pub total_rules: u32,
}

/// Per-role least-privilege summary: allowed vs observed permission counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IamGap {
    pub role_name: String,
    pub allowed_permissions: u32,
    pub used_permissions: u32,
    pub unused_permissions: u32,
    #[serde(default)]
    pub usage_percent: f64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NaclRule {
    pub cidr: String,
    pub action: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NaclAnalysis {
    pub nacl_id: String,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub inbound_rules: Vec<NaclRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrafficSummary {
    #[serde(default)]
    pub total_requests: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XrayService {
    pub name: String,
    #[serde(default)]
    pub p95_latency_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XrayServiceMap {
    #[serde(default)]
    pub services: Vec<XrayService>,
}
