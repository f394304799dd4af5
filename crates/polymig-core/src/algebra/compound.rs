use crate::algebra::icmp::intersected_icmp;
use crate::algebra::ports::extract_protocols_ports;
use crate::service_port::ANY;

/// The compound intersection used to refine a rule's `protocolPorts`
/// against a matched external network's `servicePorts`: ICMP first, then
/// the non-port-bearing "other" protocols (short-circuiting on `any`), then
/// TCP and UDP ranges.
pub fn protocol_ports_intersection(rule_ports: &[String], extnet_ports: &[String]) -> Vec<String> {
    let (icmps, ext_remainder, rule_remainder) = intersected_icmp(extnet_ports, rule_ports);

    let (misc, _) = extract_protocols_ports("", &ext_remainder, &rule_remainder);
    if misc.iter().any(|p| p.eq_ignore_ascii_case(ANY)) {
        return vec![ANY.to_string()];
    }

    let (_, tcp_ports) = extract_protocols_ports("tcp", &ext_remainder, &rule_remainder);
    let tcp_ports: Vec<String> = tcp_ports.into_iter().map(|p| format!("tcp/{p}")).collect();

    let (_, udp_ports) = extract_protocols_ports("udp", &ext_remainder, &rule_remainder);
    let udp_ports: Vec<String> = udp_ports.into_iter().map(|p| format!("udp/{p}")).collect();

    let mut result = icmps;
    result.extend(tcp_ports);
    result.extend(udp_ports);
    result.extend(misc);
    result.sort();
    result
}
