use pnet::datalink::NetworkInterface;

/// Name fragments that mark an interface as a likely VPN tunnel.
pub const VPN_NAME_HINTS: &[&str] = &["nord", "tun", "utun", "vpn", "openvpn", "wireguard"];

/// Whether a single interface looks like a usable VPN tunnel: operationally
/// up, not loopback, and named like one.
pub fn is_vpn_candidate(interface: &NetworkInterface) -> bool {
    if !interface.is_up() || interface.is_loopback() {
        return false;
    }
    let name = interface.name.to_lowercase();
    VPN_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

/// Picks the first plausible VPN interface in enumeration order.
///
/// This is a heuristic, not a guarantee: any interface whose name happens to
/// contain one of the hints will be selected. `--iface` exists for exactly
/// that case.
pub fn detect_vpn_interface(interfaces: &[NetworkInterface]) -> Option<&NetworkInterface> {
    interfaces.iter().find(|interface| is_vpn_candidate(interface))
}
