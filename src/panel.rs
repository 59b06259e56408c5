//! Panel hostname and login URL derivation.
//!
//! serv00 panels live at numbered hostnames (`panel3.serv00.com`); the ct8
//! panel is a single host (`panel.ct8.pl`) where the panel number is
//! irrelevant.

/// Hostname prefix shared by all panel hosts.
pub const PANEL_HOST_PREFIX: &str = "panel";

/// Domain used when an account does not override it.
pub const DEFAULT_DOMAIN: &str = "serv00.com";

/// Special-cased domain with a single, unnumbered panel host.
pub const CT8_DOMAIN: &str = "ct8.pl";

/// Login path; the `next` parameter sends the panel back to its root after
/// authentication.
pub const LOGIN_PATH: &str = "/login/?next=/";

/// Derive the panel hostname for an account. For `ct8.pl` the panel number
/// is ignored entirely.
pub fn panel_host(domain: Option<&str>, panel_num: u32) -> String {
    match domain {
        Some(CT8_DOMAIN) => format!("{}.{}", PANEL_HOST_PREFIX, CT8_DOMAIN),
        Some(domain) => format!("{}{}.{}", PANEL_HOST_PREFIX, panel_num, domain),
        None => format!("{}{}.{}", PANEL_HOST_PREFIX, panel_num, DEFAULT_DOMAIN),
    }
}

/// Full login URL for an account's panel.
pub fn login_url(domain: Option<&str>, panel_num: u32) -> String {
    format!("https://{}{}", panel_host(domain, panel_num), LOGIN_PATH)
}

/// Human-readable server label used in the report: `ct8` for the ct8.pl
/// panel, `serv00-{n}` otherwise.
pub fn server_label(domain: Option<&str>, panel_num: u32) -> String {
    if domain == Some(CT8_DOMAIN) {
        "ct8".to_string()
    } else {
        format!("serv00-{}", panel_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ct8_host_ignores_panel_number() {
        assert_eq!(panel_host(Some("ct8.pl"), 3), "panel.ct8.pl");
        assert_eq!(panel_host(Some("ct8.pl"), 17), "panel.ct8.pl");
        assert_eq!(login_url(Some("ct8.pl"), 17), "https://panel.ct8.pl/login/?next=/");
    }

    #[test]
    fn test_default_domain_host() {
        assert_eq!(panel_host(None, 5), "panel5.serv00.com");
        assert_eq!(login_url(None, 5), "https://panel5.serv00.com/login/?next=/");
    }

    #[test]
    fn test_explicit_domain_host() {
        assert_eq!(panel_host(Some("serv00.com"), 12), "panel12.serv00.com");
        assert_eq!(panel_host(Some("example.net"), 2), "panel2.example.net");
    }

    #[test]
    fn test_server_labels() {
        assert_eq!(server_label(Some("ct8.pl"), 9), "ct8");
        assert_eq!(server_label(None, 9), "serv00-9");
        assert_eq!(server_label(Some("serv00.com"), 4), "serv00-4");
    }
}
