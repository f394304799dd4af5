use std::collections::BTreeSet;

pub const ANY_PROTOCOL: &str = "ANY";

/// Intersects two sets of non-TCP/UDP protocols, already uppercased, honoring
/// `ANY` on either side:
///
/// | service has ANY | restricted has ANY | result |
/// |---|---|---|
/// | yes | yes | `{ANY}` |
/// | no  | yes | `service \ {ANY}` |
/// | yes | no  | `restricted` |
/// | no  | no  | `service ∩ restricted` |
pub fn intersected_protocols(
    service: &BTreeSet<String>,
    restricted: &BTreeSet<String>,
) -> Vec<String> {
    let service_has_any = service.contains(ANY_PROTOCOL);
    let restricted_has_any = restricted.contains(ANY_PROTOCOL);

    if service_has_any && restricted_has_any {
        return vec![ANY_PROTOCOL.to_string()];
    }

    let mut result = BTreeSet::new();

    if !restricted_has_any {
        for protocol in restricted {
            if !service.contains(protocol) && !service_has_any {
                continue;
            }
            result.insert(protocol.clone());
        }
    }

    if restricted_has_any && !service_has_any {
        for protocol in service {
            result.insert(protocol.clone());
        }
    }

    result.into_iter().collect()
}
