use serde::Serialize;

/// Display metadata for one top-level section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionHint {
    pub key: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub group: &'static str,
}

const HINTS: &[SectionHint] = &[
    SectionHint {
        key: "hostname",
        label: "Hostname",
        hint: "e.g. CORE-EDGE-01",
        group: "Base",
    },
    SectionHint {
        key: "interfaces",
        label: "Interfaces",
        hint: "Define uplink/access ports",
        group: "Interfaces",
    },
    SectionHint {
        key: "vlans",
        label: "VLANs",
        hint: "Define VLAN IDs and gateway IPs",
        group: "VLANs",
    },
    SectionHint {
        key: "routing",
        label: "Routing",
        hint: "Static routes, OSPF, BGP, RIP",
        group: "Routing",
    },
    SectionHint {
        key: "services",
        label: "Services",
        hint: "SSH, NTP, DNS, syslog, SNMP, flow export",
        group: "Services",
    },
    SectionHint {
        key: "firewall",
        label: "Firewall",
        hint: "Baseline security rules",
        group: "Security",
    },
    SectionHint {
        key: "nat",
        label: "NAT",
        hint: "Address translation rules",
        group: "Security",
    },
    SectionHint {
        key: "vpn",
        label: "VPN",
        hint: "Site-to-site and remote access",
        group: "Security",
    },
    SectionHint {
        key: "qos",
        label: "QoS",
        hint: "Traffic shaping",
        group: "Performance",
    },
    SectionHint {
        key: "metadata",
        label: "Environment",
        hint: "Used for safety confirmations",
        group: "Safety",
    },
];

/// Section hints in the order a form should present them.
pub fn section_hints() -> &'static [SectionHint] {
    HINTS
}
