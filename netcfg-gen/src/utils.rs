//! Subnet and mask arithmetic shared by the config modules.
//!
//! All helpers are lenient: malformed input yields `None` instead of an error,
//! so a half-filled config can still be validated and rendered.

use std::net::Ipv4Addr;

/// Inclusive IPv4 address range covered by a CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrRange {
    pub start: u32,
    pub end: u32,
}

impl CidrRange {
    /// True when the two ranges share at least one address.
    pub fn overlaps(&self, other: &CidrRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr <= self.end
    }
}

/// Parse a dotted-quad IPv4 address into its integer form.
pub fn ip_to_u32(ip: &str) -> Option<u32> {
    ip.trim().parse::<Ipv4Addr>().ok().map(u32::from)
}

/// Network mask for a prefix length. `/0` maps to an all-zero mask.
pub fn prefix_mask(bits: u8) -> u32 {
    if bits == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(bits.min(32)))
    }
}

/// Extract the prefix length of a CIDR string such as `10.0.0.0/24`.
pub fn parse_cidr_prefix(cidr: &str) -> Option<u8> {
    let (_, prefix) = cidr.trim().split_once('/')?;
    let bits = prefix.trim().parse::<u8>().ok()?;
    (bits <= 128).then_some(bits)
}

/// Compute the address range of an IPv4 CIDR block.
pub fn cidr_range(cidr: &str) -> Option<CidrRange> {
    let (ip, prefix) = cidr.trim().split_once('/')?;
    let base = ip_to_u32(ip)?;
    let bits = prefix.trim().parse::<u8>().ok().filter(|b| *b <= 32)?;
    let start = base & prefix_mask(bits);
    let size = 1u64 << (32 - u32::from(bits));
    let end = (u64::from(start) + size - 1) as u32;
    Some(CidrRange { start, end })
}

/// Check whether `gateway` lies inside `cidr`.
///
/// Returns `None` when either value is absent or malformed.
pub fn gateway_in_subnet(gateway: Option<&str>, cidr: Option<&str>) -> Option<bool> {
    let gateway = gateway.filter(|g| !g.trim().is_empty())?;
    let cidr = cidr.filter(|c| !c.trim().is_empty())?;
    let range = cidr_range(cidr)?;
    let addr = ip_to_u32(gateway)?;
    Some(range.contains(addr))
}

/// True when the two CIDR blocks overlap. Malformed input never overlaps.
pub fn subnets_overlap(a: &str, b: &str) -> bool {
    match (cidr_range(a), cidr_range(b)) {
        (Some(a), Some(b)) => a.overlaps(&b),
        _ => false,
    }
}

/// Prefix length from either a CIDR (`x.x.x.x/24` or `/24`) or a dotted mask.
pub fn mask_to_prefix(mask: Option<&str>) -> Option<u8> {
    let mask = mask.map(str::trim).filter(|m| !m.is_empty())?;
    if let Some((_, prefix)) = mask.split_once('/') {
        return prefix.trim().parse::<u8>().ok().filter(|b| *b <= 32);
    }
    let value = ip_to_u32(mask)?;
    Some(value.count_ones() as u8)
}

/// Dotted mask for a CIDR string, e.g. `10.0.0.0/24` → `255.255.255.0`.
pub fn mask_from_cidr(cidr: Option<&str>) -> Option<String> {
    let cidr = cidr?;
    let (_, prefix) = cidr.trim().split_once('/')?;
    let bits = prefix.trim().parse::<u8>().ok().filter(|b| *b <= 32)?;
    Some(Ipv4Addr::from(prefix_mask(bits)).to_string())
}

/// Explicit mask when present, otherwise the mask implied by `subnet`.
pub fn pick_mask(subnet: Option<&str>, explicit: Option<&str>) -> Option<String> {
    normalize_mask(explicit).or_else(|| mask_from_cidr(subnet))
}

/// Trimmed mask or `None` when blank.
pub fn normalize_mask(mask: Option<&str>) -> Option<String> {
    mask.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

/// Cisco wildcard mask for a dotted netmask, e.g. `255.255.255.0` → `0.0.0.255`.
pub fn wildcard_from_mask(mask: &str) -> Option<String> {
    let value = ip_to_u32(mask)?;
    Some(Ipv4Addr::from(!value).to_string())
}

/// Split a CIDR into `(network address, dotted mask)`.
pub fn split_cidr(cidr: &str) -> Option<(String, String)> {
    let (ip, _) = cidr.trim().split_once('/')?;
    let mask = mask_from_cidr(Some(cidr))?;
    Some((ip.trim().to_string(), mask))
}

/// Cisco ACL address operand: `any` when blank, `host a.b.c.d` for a bare
/// address, `network wildcard` for a CIDR. Anything else passes through.
pub fn acl_address(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "any".to_string();
    };
    if ip_to_u32(value).is_some() {
        return format!("host {value}");
    }
    split_cidr(value)
        .filter(|(net, _)| ip_to_u32(net).is_some())
        .and_then(|(net, mask)| Some(format!("{net} {}", wildcard_from_mask(&mask)?)))
        .unwrap_or_else(|| value.to_string())
}

/// Parse a RouterOS-style rate (`512k`, `10M`, `1G`, `10M/20M`) into bits per
/// second. For `upload/download` pairs the first value is used.
pub fn parse_rate(rate: &str) -> Option<u64> {
    let first = rate.split('/').next()?.trim();
    if first.is_empty() {
        return None;
    }
    let (digits, multiplier) = match first.chars().last()? {
        'k' | 'K' => (&first[..first.len() - 1], 1_000),
        'm' | 'M' => (&first[..first.len() - 1], 1_000_000),
        'g' | 'G' => (&first[..first.len() - 1], 1_000_000_000),
        _ => (first, 1),
    };
    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
