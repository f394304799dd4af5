use crate::clock::Clock;
use crate::error::TranslateError;
use crate::expander::expand_network_rule;
use crate::model::{
    ApplyPolicyMode, ExternalNetwork, NetworkAccessPolicy, NetworkRule, NetworkRuleSetPolicy,
    PolicyAction, RuleAction,
};

fn map_action(action: PolicyAction) -> Result<RuleAction, TranslateError> {
    match action {
        PolicyAction::Allow => Ok(RuleAction::Allow),
        PolicyAction::Reject => Ok(RuleAction::Reject),
        PolicyAction::Continue => Err(TranslateError::UnsupportedAction(action)),
    }
}

/// Expands a single `NetworkAccessPolicy` into one or more
/// `NetworkRuleSetPolicy` objects, running every incoming/outgoing rule
/// through the external-network matcher and port/protocol algebra. A
/// `continue` action produces no output. Accumulates, across all rules of
/// all emitted policies, the (deep-copied, `version=v2`-tagged) external
/// networks that were actually matched.
pub fn convert_to_network_rule_set_policies(
    nap: &NetworkAccessPolicy,
    extnets: &[ExternalNetwork],
    clock: &dyn Clock,
) -> Result<(Vec<NetworkRuleSetPolicy>, Vec<ExternalNetwork>), TranslateError> {
    if matches!(nap.action, PolicyAction::Continue) {
        return Ok((Vec::new(), Vec::new()));
    }

    let now = clock.now();
    let skeleton_policy = NetworkRuleSetPolicy::skeleton_from(nap, now);
    let skeleton_rule = NetworkRule {
        action: map_action(nap.action)?,
        object: Vec::new(),
        protocol_ports: nap.ports.clone(),
        logs_disabled: !nap.logs_enabled,
        observation_enabled: nap.observation_enabled,
    };

    let mut policies = Vec::new();

    let wants_incoming = matches!(
        nap.apply_policy_mode,
        ApplyPolicyMode::IncomingTraffic | ApplyPolicyMode::Bidirectional
    );
    let wants_outgoing = matches!(
        nap.apply_policy_mode,
        ApplyPolicyMode::OutgoingTraffic | ApplyPolicyMode::Bidirectional
    );

    if wants_incoming {
        for object in &nap.object {
            let mut policy = skeleton_policy.clone();
            policy.subject = vec![object.clone()];
            policy.incoming_rules = nap
                .subject
                .iter()
                .map(|subject| {
                    let mut rule = skeleton_rule.deep_copy();
                    rule.object = vec![subject.clone()];
                    rule
                })
                .collect();
            policy.normalized_tags = nap.normalized_tags.clone();
            policies.push(policy);
        }
    }

    if wants_outgoing {
        for subject in &nap.subject {
            let mut policy = skeleton_policy.clone();
            policy.subject = vec![subject.clone()];
            policy.outgoing_rules = nap
                .object
                .iter()
                .map(|object| {
                    let mut rule = skeleton_rule.deep_copy();
                    rule.object = vec![object.clone()];
                    rule
                })
                .collect();
            policy.normalized_tags = nap.normalized_tags.clone();
            policies.push(policy);
        }
    }

    let mut matched_extnets = Vec::new();
    for policy in &mut policies {
        let mut expanded_incoming = Vec::new();
        for rule in &policy.incoming_rules {
            let (rules, matched) = expand_network_rule(rule, extnets)?;
            expanded_incoming.extend(rules);
            matched_extnets.extend(matched);
        }
        policy.incoming_rules = expanded_incoming;

        let mut expanded_outgoing = Vec::new();
        for rule in &policy.outgoing_rules {
            let (rules, matched) = expand_network_rule(rule, extnets)?;
            expanded_outgoing.extend(rules);
            matched_extnets.extend(matched);
        }
        policy.outgoing_rules = expanded_outgoing;
    }

    Ok((policies, matched_extnets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    fn nap(subject: Vec<Vec<&str>>, object: Vec<Vec<&str>>, mode: ApplyPolicyMode) -> NetworkAccessPolicy {
        NetworkAccessPolicy {
            name: "np".into(),
            namespace: String::new(),
            description: String::new(),
            action: PolicyAction::Allow,
            apply_policy_mode: mode,
            subject: subject.into_iter().map(|c| c.into_iter().map(String::from).collect()).collect(),
            object: object.into_iter().map(|c| c.into_iter().map(String::from).collect()).collect(),
            ports: vec![],
            logs_enabled: false,
            observation_enabled: false,
            associated_tags: vec![],
            metadata: vec![],
            annotations: serde_json::Value::Null,
            disabled: false,
            protected: false,
            propagate: false,
            fallback: false,
            normalized_tags: vec![],
        }
    }

    #[test]
    fn continue_action_is_a_no_op() {
        let mut policy = nap(vec![vec!["a"]], vec![vec!["b"]], ApplyPolicyMode::Bidirectional);
        policy.action = PolicyAction::Continue;
        let (policies, extnets) = convert_to_network_rule_set_policies(&policy, &[], &clock()).unwrap();
        assert!(policies.is_empty());
        assert!(extnets.is_empty());
    }

    #[test]
    fn bidirectional_no_external_networks() {
        let policy = nap(vec![vec!["app=foo"]], vec![vec!["app=bar"]], ApplyPolicyMode::Bidirectional);
        let (policies, _) = convert_to_network_rule_set_policies(&policy, &[], &clock()).unwrap();
        assert_eq!(policies.len(), 2);

        let incoming = policies.iter().find(|p| !p.incoming_rules.is_empty()).unwrap();
        assert_eq!(incoming.subject, vec![vec!["app=bar".to_string()]]);
        assert_eq!(incoming.incoming_rules.len(), 1);
        assert_eq!(incoming.incoming_rules[0].action, RuleAction::Allow);
        assert_eq!(incoming.incoming_rules[0].object, vec![vec!["app=foo".to_string()]]);

        let outgoing = policies.iter().find(|p| !p.outgoing_rules.is_empty()).unwrap();
        assert_eq!(outgoing.subject, vec![vec!["app=foo".to_string()]]);
        assert_eq!(outgoing.outgoing_rules[0].object, vec![vec!["app=bar".to_string()]]);
    }

    #[test]
    fn direction_count_matches_disjunct_counts() {
        let policy = nap(
            vec![vec!["a"], vec!["b"]],
            vec![vec!["c"], vec!["d"], vec!["e"]],
            ApplyPolicyMode::Bidirectional,
        );
        let (policies, _) = convert_to_network_rule_set_policies(&policy, &[], &clock()).unwrap();
        assert_eq!(policies.len(), 2 + 3);
    }

    #[test]
    fn every_policy_has_exactly_one_subject_disjunct() {
        let policy = nap(
            vec![vec!["a"], vec!["b"]],
            vec![vec!["c"], vec!["d"]],
            ApplyPolicyMode::Bidirectional,
        );
        let (policies, _) = convert_to_network_rule_set_policies(&policy, &[], &clock()).unwrap();
        for p in &policies {
            assert_eq!(p.subject.len(), 1);
        }
    }

    #[test]
    fn external_network_intersection_narrows_outgoing_rule() {
        let mut policy = nap(vec![vec!["app=foo"]], vec![vec!["app=bar"]], ApplyPolicyMode::OutgoingTraffic);
        policy.ports = vec!["tcp/80:90".to_string()];
        let extnets = vec![ExternalNetwork {
            name: "e1".into(),
            id: String::new(),
            associated_tags: vec!["app=bar".to_string()],
            entries: vec![],
            service_ports: vec!["tcp/78:81".to_string()],
        }];

        let (policies, matched) =
            convert_to_network_rule_set_policies(&policy, &extnets, &clock()).unwrap();

        assert_eq!(policies.len(), 1);
        let p = &policies[0];
        assert_eq!(p.subject, vec![vec!["app=foo".to_string()]]);
        assert_eq!(p.outgoing_rules.len(), 1);
        assert_eq!(p.outgoing_rules[0].protocol_ports, vec!["tcp/80:81".to_string()]);
        assert_eq!(
            p.outgoing_rules[0].object,
            vec![vec![
                "app=bar".to_string(),
                "$identity=externalnetwork".to_string(),
                "$name=e1".to_string(),
                "version=v2".to_string(),
            ]]
        );

        assert_eq!(matched.len(), 1);
        assert!(matched[0].associated_tags.contains(&"version=v2".to_string()));
    }

    #[test]
    fn deep_copy_isolation_from_input() {
        let mut policy = nap(vec![vec!["app=foo"]], vec![vec!["app=bar"]], ApplyPolicyMode::Bidirectional);
        let original = policy.clone();
        let (mut policies, _) = convert_to_network_rule_set_policies(&policy, &[], &clock()).unwrap();
        policies[0].subject[0].push("mutated".to_string());
        policy.subject[0].push("also-mutated".to_string());
        assert_eq!(original.subject, vec![vec!["app=foo".to_string()]]);
    }
}
