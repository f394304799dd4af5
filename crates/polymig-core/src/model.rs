use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outer list is a disjunction ("OR"), inner list a conjunction ("AND") of tags.
pub type TagExpression = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Allow,
    Reject,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyPolicyMode {
    IncomingTraffic,
    OutgoingTraffic,
    Bidirectional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Reject,
}

/// The legacy identity-based policy declaration. Read-only input: never
/// mutated in place, only deep-copied and rebuilt into rule-set policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAccessPolicy {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub description: String,
    pub action: PolicyAction,
    pub apply_policy_mode: ApplyPolicyMode,
    pub subject: TagExpression,
    pub object: TagExpression,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub logs_enabled: bool,
    #[serde(default)]
    pub observation_enabled: bool,
    #[serde(default)]
    pub associated_tags: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<String>,
    #[serde(default)]
    pub annotations: serde_json::Value,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub propagate: bool,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub normalized_tags: Vec<String>,
}

impl NetworkAccessPolicy {
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

/// A named CIDR bundle tagged with identities, advertising its own service
/// ports. `entries` is opaque to the translation kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalNetwork {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub associated_tags: Vec<String>,
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub service_ports: Vec<String>,
}

impl ExternalNetwork {
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

/// A single rule inside a rule-set policy's `incomingRules`/`outgoingRules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRule {
    pub action: RuleAction,
    pub object: TagExpression,
    #[serde(default)]
    pub protocol_ports: Vec<String>,
    #[serde(default)]
    pub logs_disabled: bool,
    #[serde(default)]
    pub observation_enabled: bool,
}

impl NetworkRule {
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

/// The migration target: one subject disjunct, directional rule lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRuleSetPolicy {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub description: String,
    pub subject: TagExpression,
    #[serde(default)]
    pub incoming_rules: Vec<NetworkRule>,
    #[serde(default)]
    pub outgoing_rules: Vec<NetworkRule>,
    #[serde(default)]
    pub associated_tags: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<String>,
    #[serde(default)]
    pub annotations: serde_json::Value,
    #[serde(default)]
    pub normalized_tags: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub propagate: bool,
    #[serde(default)]
    pub fallback: bool,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl NetworkRuleSetPolicy {
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Skeleton carrying the NAP's passthrough fields, ready to be cloned
    /// per emitted subject disjunct by the translator.
    pub fn skeleton_from(nap: &NetworkAccessPolicy, now: DateTime<Utc>) -> Self {
        Self {
            name: nap.name.clone(),
            namespace: nap.namespace.clone(),
            description: nap.description.clone(),
            subject: Vec::new(),
            incoming_rules: Vec::new(),
            outgoing_rules: Vec::new(),
            associated_tags: nap.associated_tags.clone(),
            metadata: nap.metadata.clone(),
            annotations: nap.annotations.clone(),
            normalized_tags: nap.normalized_tags.clone(),
            disabled: nap.disabled,
            protected: nap.protected,
            propagate: nap.propagate,
            fallback: nap.fallback,
            create_time: now,
            update_time: now,
        }
    }
}
