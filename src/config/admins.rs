//! Administrator configuration loaded from environment variables.
//!
//! `SACCO_ADMIN_IDS` holds a comma-separated list of Discord user IDs allowed to run the
//! `/admin` commands (confirming contributions, reviewing and disbursing loans).

use std::collections::HashSet;

/// Parses a comma-separated list of Discord user IDs, ignoring blanks and whitespace.
#[must_use]
pub fn parse_admin_ids(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Gets the set of admin user IDs from `SACCO_ADMIN_IDS`. Empty when unset.
#[must_use]
pub fn get_admin_ids() -> HashSet<String> {
    std::env::var("SACCO_ADMIN_IDS")
        .map(|raw| parse_admin_ids(&raw))
        .unwrap_or_default()
}

/// Whether the given Discord user ID is a configured administrator.
#[must_use]
pub fn is_admin(user_id: &str) -> bool {
    get_admin_ids().contains(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        let ids = parse_admin_ids(" 111, 222 ,,333 ");
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("111"));
        assert!(ids.contains("222"));
        assert!(ids.contains("333"));
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        assert!(parse_admin_ids("").is_empty());
        assert!(parse_admin_ids(" , ").is_empty());
    }

    #[test]
    fn test_unknown_user_is_not_admin() {
        assert!(!is_admin("definitely-not-a-discord-id"));
    }
}
