use crate::error::PortError;

/// An inclusive port range over `0..=65535`. `min == max` represents a
/// single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub min: u16,
    pub max: u16,
}

impl PortSpec {
    pub fn new(min: u16, max: u16) -> Result<Self, PortError> {
        if min > max {
            return Err(PortError(format!("min {min} greater than max {max}")));
        }
        Ok(Self { min, max })
    }
}

/// Parses a port token: either a single decimal integer in `0..=65535`, or
/// `min:max` with `min <= max <= 65535`. Anything else (negative numbers,
/// commas, more than one colon, an out-of-range endpoint) is malformed.
pub fn parse_port_spec(s: &str) -> Result<PortSpec, PortError> {
    if let Some((lo, hi)) = s.split_once(':') {
        if lo.is_empty() || hi.is_empty() || hi.contains(':') {
            return Err(PortError(s.to_string()));
        }
        let min: u32 = lo.parse().map_err(|_| PortError(s.to_string()))?;
        let max: u32 = hi.parse().map_err(|_| PortError(s.to_string()))?;
        if max >= 65536 {
            return Err(PortError(s.to_string()));
        }
        let min = u16::try_from(min).map_err(|_| PortError(s.to_string()))?;
        let max = u16::try_from(max).map_err(|_| PortError(s.to_string()))?;
        PortSpec::new(min, max)
    } else {
        let value: u32 = s.parse().map_err(|_| PortError(s.to_string()))?;
        if value >= 65536 {
            return Err(PortError(s.to_string()));
        }
        let value = value as u16;
        PortSpec::new(value, value)
    }
}

/// Collapses a sorted, de-duplicated sequence of integers into the minimal
/// list of contiguous range strings: `"n"` for a run of one, `"lo:hi"` for a
/// run of two or more. Contiguity requires `k` immediately followed by
/// `k + 1`; any gap starts a new run.
pub fn build_ranges(ports: &[i32]) -> Vec<String> {
    let mut ranges = Vec::new();
    let mut iter = ports.iter().copied();
    let Some(mut start) = iter.next() else {
        return ranges;
    };
    let mut curr = start;
    for port in iter {
        if port == curr + 1 {
            curr = port;
            continue;
        }
        ranges.push(fmt_range(start, curr));
        start = port;
        curr = port;
    }
    ranges.push(fmt_range(start, curr));
    ranges
}

fn fmt_range(start: i32, end: i32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}:{end}")
    }
}
