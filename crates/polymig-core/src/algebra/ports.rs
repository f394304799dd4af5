use std::collections::BTreeSet;

use crate::algebra::protocols::intersected_protocols;
use crate::port::{build_ranges, parse_port_spec};
use crate::service_port::{parse_service_port, ANY, TCP, UDP};

const ALL_PORTS: &str = "1:65535";

/// Extracts, for a given L4 `protocol` (`tcp`, `udp`, or `""` when only the
/// non-port-bearing "other" protocols are wanted), the intersection of the
/// service and restricted token lists: the other-protocols intersection and
/// the intersected port ranges for `protocol`.
///
/// Mirrors the upstream intersection kernel, including its asymmetric
/// quirks: `any` fans out to "all ports of `protocol`" on both sides, but
/// only the restricted side gets the alternate-L4 sentinel guard (step 2 —
/// an alternate L4 on the restricted side with no matching restricted ports
/// seeds port `0` so the intersection collapses to empty rather than being
/// mistaken for "no restriction at all").
pub fn extract_protocols_ports(
    protocol: &str,
    service_tokens: &[String],
    restricted_tokens: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut restricted_ports: BTreeSet<i32> = BTreeSet::new();
    let mut service_ports: BTreeSet<i32> = BTreeSet::new();
    let mut restricted_protocols: BTreeSet<String> = BTreeSet::new();
    let mut service_protocols: BTreeSet<String> = BTreeSet::new();
    let mut found_alternate = false;

    for token in restricted_tokens {
        let Ok((mut rprotocol, mut rports)) = parse_service_port(token) else {
            tracing::warn!(token, "unable to parse restricted service port");
            continue;
        };

        if !rprotocol.eq_ignore_ascii_case(TCP) && !rprotocol.eq_ignore_ascii_case(UDP) {
            restricted_protocols.insert(rprotocol.to_uppercase());
            if !rprotocol.eq_ignore_ascii_case(ANY) {
                continue;
            }
        }

        if rprotocol.eq_ignore_ascii_case(ANY) && !protocol.is_empty() {
            rprotocol = protocol.to_string();
            rports = ALL_PORTS.to_string();
        }

        if !protocol.eq_ignore_ascii_case(&rprotocol) {
            found_alternate = true;
            continue;
        }

        let Ok(spec) = parse_port_spec(&rports) else {
            continue;
        };
        for port in (spec.min as i32)..=(spec.max as i32) {
            restricted_ports.insert(port);
        }
    }

    if found_alternate && restricted_ports.is_empty() {
        restricted_ports.insert(0);
    }

    for token in service_tokens {
        let Ok((mut sprotocol, mut sports)) = parse_service_port(token) else {
            tracing::warn!(token, "unable to parse service port");
            continue;
        };

        if !sprotocol.eq_ignore_ascii_case(TCP) && !sprotocol.eq_ignore_ascii_case(UDP) {
            service_protocols.insert(sprotocol.to_uppercase());
            if !sprotocol.eq_ignore_ascii_case(ANY) {
                continue;
            }
        }

        if sprotocol.eq_ignore_ascii_case(ANY) && !protocol.is_empty() {
            sprotocol = protocol.to_string();
            sports = ALL_PORTS.to_string();
        }

        if !protocol.eq_ignore_ascii_case(&sprotocol) {
            continue;
        }

        let Ok(spec) = parse_port_spec(&sports) else {
            continue;
        };
        for port in (spec.min as i32)..=(spec.max as i32) {
            service_ports.insert(port);
        }
    }

    let intersected_ports = trim_port_range(&service_ports, &restricted_ports);
    let other_protocols = intersected_protocols(&service_protocols, &restricted_protocols);

    (other_protocols, intersected_ports)
}

/// If there's no restriction on ports at all, nothing is returned (ports are
/// only ever emitted as an intersection, never as the bare service side).
/// Otherwise the ranges are the service ports that also fall in the
/// restricted set.
fn trim_port_range(service: &BTreeSet<i32>, restricted: &BTreeSet<i32>) -> Vec<String> {
    if restricted.is_empty() {
        return Vec::new();
    }
    let included: Vec<i32> = service.iter().filter(|p| restricted.contains(p)).copied().collect();
    build_ranges(&included)
}
