use crate::algebra::compound::protocol_ports_intersection;
use crate::error::TranslateError;
use crate::matcher::matching_external_networks;
use crate::model::{ExternalNetwork, NetworkRule};
use crate::service_port::ANY;

const EXTERNAL_NETWORK_IDENTITY: &str = "$identity=externalnetwork";
const VERSION_V2: &str = "version=v2";
const INEFFECTIVE: &str = "policy=ineffective";

/// Collapses an empty or `any`-containing `protocolPorts` list down to the
/// canonical single-entry `["any"]`.
fn normalize_protocol_ports(ports: &[String]) -> Vec<String> {
    if ports.is_empty() {
        return vec![ANY.to_string()];
    }
    if ports.iter().any(|p| p.eq_ignore_ascii_case(ANY)) {
        return vec![ANY.to_string()];
    }
    ports.to_vec()
}

/// For each external network matching `rule.object`, produces a refined
/// rule whose ports/protocols are intersected with that network's
/// advertisement and whose object tags are rewritten to anchor on it. When
/// no external network matches, the rule passes through unchanged.
pub fn expand_network_rule(
    rule: &NetworkRule,
    extnets: &[ExternalNetwork],
) -> Result<(Vec<NetworkRule>, Vec<ExternalNetwork>), TranslateError> {
    let matching = matching_external_networks(&rule.object, extnets)?;

    if matching.is_empty() {
        return Ok((vec![rule.deep_copy()], Vec::new()));
    }

    let rule_ports = normalize_protocol_ports(&rule.protocol_ports);

    let mut rules = Vec::with_capacity(matching.len());
    for extnet in &matching {
        let extnet_ports = normalize_protocol_ports(&extnet.service_ports);
        let pp = protocol_ports_intersection(&rule_ports, &extnet_ports);

        let mut new_rule = rule.deep_copy();
        for conjunction in &mut new_rule.object {
            conjunction.retain(|tag| !tag.eq_ignore_ascii_case(EXTERNAL_NETWORK_IDENTITY));
            conjunction.push(EXTERNAL_NETWORK_IDENTITY.to_string());
            conjunction.push(format!("$name={}", extnet.name));
            conjunction.push(VERSION_V2.to_string());
        }

        new_rule.protocol_ports = pp;
        if new_rule.protocol_ports.is_empty() {
            new_rule.object.push(vec![INEFFECTIVE.to_string()]);
        }

        rules.push(new_rule);
    }

    Ok((rules, matching))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleAction;

    fn rule(object: Vec<Vec<&str>>, ports: &[&str]) -> NetworkRule {
        NetworkRule {
            action: RuleAction::Allow,
            object: object.into_iter().map(|c| c.into_iter().map(String::from).collect()).collect(),
            protocol_ports: ports.iter().map(|p| p.to_string()).collect(),
            logs_disabled: false,
            observation_enabled: false,
        }
    }

    fn extnet(name: &str, tags: &[&str], ports: &[&str]) -> ExternalNetwork {
        ExternalNetwork {
            name: name.to_string(),
            id: String::new(),
            associated_tags: tags.iter().map(|t| t.to_string()).collect(),
            entries: vec![],
            service_ports: ports.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn no_match_passes_rule_through() {
        let r = rule(vec![vec!["app=bar"]], &["tcp/80"]);
        let (rules, matching) = expand_network_rule(&r, &[]).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].protocol_ports, vec!["tcp/80".to_string()]);
        assert!(matching.is_empty());
    }

    #[test]
    fn match_narrows_ports_and_rewrites_object() {
        let r = rule(vec![vec!["app=bar"]], &["tcp/80:90"]);
        let ens = vec![extnet("e1", &["app=bar"], &["tcp/78:81"])];
        let (rules, matching) = expand_network_rule(&r, &ens).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].protocol_ports, vec!["tcp/80:81".to_string()]);
        assert_eq!(
            rules[0].object,
            vec![vec![
                "app=bar".to_string(),
                "$identity=externalnetwork".to_string(),
                "$name=e1".to_string(),
                "version=v2".to_string(),
            ]]
        );
        assert_eq!(matching.len(), 1);
        assert!(matching[0].associated_tags.contains(&"version=v2".to_string()));
    }

    #[test]
    fn empty_intersection_marks_rule_ineffective() {
        let r = rule(vec![vec!["app=bar"]], &["tcp/80"]);
        let ens = vec![extnet("e1", &["app=bar"], &["udp/80"])];
        let (rules, _) = expand_network_rule(&r, &ens).unwrap();
        assert!(rules[0].protocol_ports.is_empty());
        assert!(rules[0].object.contains(&vec!["policy=ineffective".to_string()]));
    }

    #[test]
    fn multiple_matches_emit_one_rule_each() {
        let r = rule(vec![vec!["app=bar"]], &["tcp/80"]);
        let ens = vec![
            extnet("e1", &["app=bar"], &["tcp/80"]),
            extnet("e2", &["app=bar"], &["any"]),
        ];
        let (rules, matching) = expand_network_rule(&r, &ens).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(matching.len(), 2);
    }
}
