//! Best-effort correlation of flow nodes with gap-analysis records.
//!
//! Matching is name-containment on prefix-stripped lower-cased names. It is
//! deliberately fuzzy: the backend discovers resources from AWS APIs while
//! gap analyses are keyed by SG/role names that follow org naming
//! conventions, and the two rarely agree exactly. A miss never fails a flow;
//! it substitutes a named placeholder so the strip always renders a gate.

use crate::model::{CheckpointKind, FlowCheckpoint, IamGap, NaclAnalysis, SgGapAnalysis};

/// Environment/org prefixes stripped before name comparison.
const NAME_PREFIXES: &[&str] = &[
    "prod-",
    "production-",
    "staging-",
    "stg-",
    "dev-",
    "test-",
    "qa-",
    "corp-",
    "aws-",
];

/// Placeholder gate values substituted when no gap-analysis record matches.
/// Named so tests can assert against them precisely.
#[derive(Debug, Clone, Copy)]
pub struct Placeholder {
    pub id: &'static str,
    pub name: &'static str,
    pub used_count: u32,
    pub total_count: u32,
}

/// Web-tier SG default: one of two rules assumed in use, so an unmatched
/// internet-facing gate always surfaces one gap.
pub const PLACEHOLDER_WEB_SG: Placeholder = Placeholder {
    id: "sg-web-default",
    name: "web security group",
    used_count: 1,
    total_count: 2,
};

pub const PLACEHOLDER_APP_SG: Placeholder = Placeholder {
    id: "sg-app-default",
    name: "app security group",
    used_count: 1,
    total_count: 1,
};

pub const PLACEHOLDER_DB_SG: Placeholder = Placeholder {
    id: "sg-db-default",
    name: "db security group",
    used_count: 1,
    total_count: 1,
};

pub const PLACEHOLDER_IAM: Placeholder = Placeholder {
    id: "iam-role-default",
    name: "execution role",
    used_count: 1,
    total_count: 1,
};

impl Placeholder {
    pub fn checkpoint(&self, kind: CheckpointKind) -> FlowCheckpoint {
        FlowCheckpoint {
            id: self.id.to_string(),
            name: self.name.to_string(),
            kind,
            used_count: self.used_count,
            total_count: self.total_count,
            gap_count: self.total_count - self.used_count,
            matched: false,
        }
    }
}

/// Lower-case a resource name and strip org/environment prefixes until none
/// apply, yielding the short name used for containment matching.
pub fn short_name(name: &str) -> String {
    let mut short = name.to_lowercase();
    loop {
        let before = short.len();
        for prefix in NAME_PREFIXES {
            if let Some(rest) = short.strip_prefix(prefix) {
                short = rest.to_string();
            }
        }
        if short.len() == before {
            return short;
        }
    }
}

fn names_overlap(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Find the SG gap analysis whose name or id overlaps the node's short
/// name; fall back to `placeholder` on a miss.
pub fn resolve_sg_checkpoint(
    node_name: &str,
    sg_gaps: &[SgGapAnalysis],
    placeholder: &Placeholder,
) -> FlowCheckpoint {
    let short = short_name(node_name);
    let matched = sg_gaps.iter().find(|gap| {
        names_overlap(&gap.sg_name.to_lowercase(), &short)
            || names_overlap(&gap.sg_id.to_lowercase(), &short)
    });

    match matched {
        Some(gap) => FlowCheckpoint {
            id: gap.sg_id.clone(),
            name: gap.sg_name.clone(),
            kind: CheckpointKind::SecurityGroup,
            used_count: gap.used_rules,
            total_count: gap.total_rules,
            gap_count: gap.unused_rules,
            matched: true,
        },
        None => placeholder.checkpoint(CheckpointKind::SecurityGroup),
    }
}

/// Find the IAM gap whose role name overlaps the node's attached role (when
/// known) or the node's short name; placeholder on a miss.
pub fn resolve_iam_checkpoint(
    node_name: &str,
    iam_role: Option<&str>,
    iam_gaps: &[IamGap],
) -> FlowCheckpoint {
    let short = short_name(node_name);
    let role_short = iam_role.map(short_name);
    let matched = iam_gaps.iter().find(|gap| {
        let gap_name = gap.role_name.to_lowercase();
        names_overlap(&gap_name, &short)
            || role_short
                .as_deref()
                .map(|r| names_overlap(&gap_name, r))
                .unwrap_or(false)
    });

    match matched {
        Some(gap) => FlowCheckpoint {
            id: gap.role_name.clone(),
            name: gap.role_name.clone(),
            kind: CheckpointKind::Iam,
            used_count: gap.used_permissions,
            total_count: gap.allowed_permissions,
            gap_count: gap.unused_permissions,
            matched: true,
        },
        None => PLACEHOLDER_IAM.checkpoint(CheckpointKind::Iam),
    }
}

fn is_public_cidr(cidr: &str) -> bool {
    cidr == "0.0.0.0/0" || cidr == "::/0"
}

/// NACL gate from the first available record (not matched per-subnet).
/// Inbound allows split into specific sources (counted as used) versus
/// public allows (counted as gaps).
pub fn nacl_checkpoint(nacls: &[NaclAnalysis]) -> Option<FlowCheckpoint> {
    let nacl = nacls.first()?;
    let allows = nacl
        .inbound_rules
        .iter()
        .filter(|r| r.action.eq_ignore_ascii_case("allow"));
    let (mut specific, mut public) = (0u32, 0u32);
    for rule in allows {
        if is_public_cidr(&rule.cidr) {
            public += 1;
        } else {
            specific += 1;
        }
    }
    Some(FlowCheckpoint {
        id: nacl.nacl_id.clone(),
        name: format!("NACL {}", nacl.nacl_id),
        kind: CheckpointKind::Nacl,
        used_count: specific,
        total_count: specific + public,
        gap_count: public,
        matched: true,
    })
}
