use serde::{Deserialize, Serialize};

/// A MyHOME gateway known to the management API, keyed by MAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub mac: String,
    pub name: String,
    pub host: String,
    /// Passive (activation-based) discovery is collecting endpoints.
    pub discovery_by_activation: bool,
}

impl Gateway {
    pub fn has_mac(&self, mac: &str) -> bool {
        same_mac(&self.mac, mac)
    }
}

/// Compare two MAC addresses ignoring case and `:`/`-`/`.` separators,
/// so operator input matches the server's `aa:bb:..` form.
pub fn same_mac(a: &str, b: &str) -> bool {
    mac_digits(a).eq(mac_digits(b))
}

fn mac_digits(mac: &str) -> impl Iterator<Item = char> + '_ {
    mac.chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .map(|c| c.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_comparison_ignores_case_and_separators() {
        assert!(same_mac("00:03:50:AA:BB:CC", "00:03:50:aa:bb:cc"));
        assert!(same_mac("00-03-50-aa-bb-cc", "00:03:50:aa:bb:cc"));
        assert!(same_mac("0003.50aa.bbcc", "00:03:50:aa:bb:cc"));
        assert!(!same_mac("00:03:50:aa:bb:cd", "00:03:50:aa:bb:cc"));
        assert!(!same_mac("00:03:50:aa:bb", "00:03:50:aa:bb:cc"));
    }
}
