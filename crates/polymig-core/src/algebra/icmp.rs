use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::service_port::{ANY, ICMP, ICMP6};

fn is_icmp_token(token: &str) -> bool {
    let upper = token.to_uppercase();
    upper.contains(&ICMP.to_uppercase()) || upper.contains(&ICMP6.to_uppercase())
}

/// Expands `proto/type/c1,c2,...` into one entry per code
/// (`proto/type/c1`, `proto/type/c2`, ...). Tokens with fewer than three
/// `/`-separated segments are returned unchanged.
fn expand_codes(token: &str) -> Vec<String> {
    let parts: Vec<&str> = token.splitn(3, '/').collect();
    if parts.len() < 3 {
        return vec![token.to_string()];
    }
    let base = format!("{}/{}/", parts[0], parts[1]);
    parts[2].split(',').map(|code| format!("{base}{code}")).collect()
}

/// Splits `servicePorts`/`restrictedPorts` into an ICMP subset (lowercased,
/// per-code expanded) and the non-ICMP remainder, tracking whether the
/// remainder contains `any`.
fn split_icmp(tokens: &[String]) -> (HashSet<String>, Vec<String>, bool) {
    let mut icmps = HashSet::new();
    let mut remainder = Vec::new();
    let mut has_any = false;

    for token in tokens {
        if is_icmp_token(token) {
            for expanded in expand_codes(token) {
                icmps.insert(expanded.to_lowercase());
            }
        } else {
            if token.eq_ignore_ascii_case(ANY) {
                has_any = true;
            }
            remainder.push(token.clone());
        }
    }

    (icmps, remainder, has_any)
}

/// Intersects two ICMP/ICMP6 type/code sets, returning
/// `(intersectedIcmps, serviceRemainder, restrictedRemainder)`. Codes are
/// sorted lexicographically, not numerically — `"10"` sorts before `"2"` —
/// matching the downstream consumer's tolerance for that ordering.
pub fn intersected_icmp(
    service_ports: &[String],
    restricted_ports: &[String],
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let (service_icmps, service_remainder, service_has_any) = split_icmp(service_ports);
    let (restricted_icmps, restricted_remainder, restricted_has_any) = split_icmp(restricted_ports);

    let mut groups: BTreeMap<String, Option<BTreeSet<String>>> = BTreeMap::new();

    let mut collect = |icmp: &str, groups: &mut BTreeMap<String, Option<BTreeSet<String>>>| {
        let parts: Vec<&str> = icmp.splitn(3, '/').collect();
        if parts.len() < 3 {
            groups.entry(icmp.to_string()).or_insert(None);
            return;
        }
        let key = format!("{}/{}", parts[0], parts[1]);
        groups
            .entry(key)
            .and_modify(|codes| {
                codes.get_or_insert_with(BTreeSet::new).insert(parts[2].to_string());
            })
            .or_insert_with(|| Some(BTreeSet::from([parts[2].to_string()])));
    };

    for icmp in &service_icmps {
        if !restricted_icmps.contains(icmp) && !restricted_ports.is_empty() && !restricted_has_any {
            continue;
        }
        collect(icmp, &mut groups);
    }

    for icmp in &restricted_icmps {
        if !service_icmps.contains(icmp) && !service_ports.is_empty() && !service_has_any {
            continue;
        }
        collect(icmp, &mut groups);
    }

    let mut intersected: Vec<String> = groups
        .into_iter()
        .map(|(key, codes)| match codes {
            None => key,
            Some(codes) => format!("{key}/{}", codes.into_iter().collect::<Vec<_>>().join(",")),
        })
        .collect();
    intersected.sort();

    (intersected, service_remainder, restricted_remainder)
}
