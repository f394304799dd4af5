use crate::error::ServicePortError;
use crate::port::parse_port_spec;

pub const TCP: &str = "tcp";
pub const UDP: &str = "udp";
pub const ANY: &str = "any";
pub const ICMP: &str = "icmp";
pub const ICMP6: &str = "icmp6";

/// L3/L4 protocols with no port concept, recognized case-insensitively.
/// The upstream object model's validator draws from a fuller IANA protocol
/// name table that wasn't available to ground this against directly (see
/// DESIGN.md); this list covers the common "other" protocols named in
/// example tokens (igmp, rdp, isis) plus the rest of the commonly-filtered
/// set.
const OTHER_PROTOCOLS: &[&str] = &[
    "igmp", "gre", "esp", "ah", "ospf", "rdp", "isis", "sctp", "vrrp", "pim", "l2tp", "ipip",
    "egp", "rsvp", "skip", "encap", "pgm", "ipcomp", "ddp", "mobile", "all",
];

fn is_other_protocol(token: &str) -> bool {
    OTHER_PROTOCOLS.iter().any(|p| p.eq_ignore_ascii_case(token))
}

fn is_icmp_family(protocol: &str) -> bool {
    protocol.eq_ignore_ascii_case(ICMP) || protocol.eq_ignore_ascii_case(ICMP6)
}

/// Validates a `servicePort` token against the same grammar the object
/// model enforces at decode time: `protocol`, `protocol/ports`, or (ICMP
/// only) `protocol/type` and `protocol/type/codes`.
pub fn validate_service_port(token: &str) -> Result<(), ServicePortError> {
    if token.is_empty() {
        return Err(ServicePortError(token.to_string()));
    }

    let parts: Vec<&str> = token.split('/').collect();
    let protocol = parts[0];

    if is_icmp_family(protocol) {
        match parts.len() {
            1 => Ok(()),
            2 => {
                parts[1]
                    .parse::<u8>()
                    .map_err(|_| ServicePortError(token.to_string()))?;
                Ok(())
            }
            3 => {
                parts[1]
                    .parse::<u8>()
                    .map_err(|_| ServicePortError(token.to_string()))?;
                if parts[2].is_empty() {
                    return Err(ServicePortError(token.to_string()));
                }
                for code in parts[2].split(',') {
                    code.parse::<u8>()
                        .map_err(|_| ServicePortError(token.to_string()))?;
                }
                Ok(())
            }
            _ => Err(ServicePortError(token.to_string())),
        }
    } else if protocol.eq_ignore_ascii_case(ANY) {
        if parts.len() == 1 {
            Ok(())
        } else {
            Err(ServicePortError(token.to_string()))
        }
    } else if protocol.eq_ignore_ascii_case(TCP) || protocol.eq_ignore_ascii_case(UDP) {
        match parts.len() {
            1 => Ok(()),
            2 => {
                parse_port_spec(parts[1]).map_err(|_| ServicePortError(token.to_string()))?;
                Ok(())
            }
            _ => Err(ServicePortError(token.to_string())),
        }
    } else if is_other_protocol(protocol) {
        if parts.len() == 1 {
            Ok(())
        } else {
            Err(ServicePortError(token.to_string()))
        }
    } else {
        Err(ServicePortError(token.to_string()))
    }
}

/// Splits a validated `servicePort` token into `(protocol, portsOrEmpty)`.
/// For ICMP tokens the remainder after the first `/` is preserved whole
/// (`"1/2,3"` for `icmp/1/2,3`) — the ICMP algebra, not this parser, knows
/// how to decompose it further.
pub fn parse_service_port(token: &str) -> Result<(String, String), ServicePortError> {
    validate_service_port(token)?;
    match token.split_once('/') {
        Some((protocol, ports)) => Ok((protocol.to_string(), ports.to_string())),
        None => Ok((token.to_string(), String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_tokens() {
        for ok in ["tcp", "tcp/80", "udp/10:20", "any", "icmp", "icmp/1", "icmp/1/2,3,4"] {
            assert!(validate_service_port(ok).is_ok(), "expected '{ok}' to be accepted");
        }
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["ISISsas", "tcp/80/900", "any/80", "tcp//80", "", "icmp/abc"] {
            assert!(validate_service_port(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn splits_protocol_and_ports() {
        assert_eq!(
            parse_service_port("tcp/80:90").unwrap(),
            ("tcp".to_string(), "80:90".to_string())
        );
        assert_eq!(parse_service_port("any").unwrap(), ("any".to_string(), String::new()));
        assert_eq!(
            parse_service_port("icmp/1/2,3").unwrap(),
            ("icmp".to_string(), "1/2,3".to_string())
        );
    }
}
