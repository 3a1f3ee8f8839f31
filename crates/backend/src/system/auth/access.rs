//! Role → allowed path prefixes
//!
//! The table is built once and only read afterwards. Matching is a plain
//! `starts_with` without a path-segment boundary, so `/dashboard/retailer`
//! also admits `/dashboard/retailerX`.

use std::collections::HashMap;

use contracts::enums::user_role::UserRole;
use once_cell::sync::Lazy;

/// Open to every role except [`UserRole::Developer`]
pub const ROLE_REQUEST_PREFIX: &str = "/role-request";
/// Open to every role
pub const SEARCH_PREFIX: &str = "/search";

static ROLE_PREFIXES: Lazy<HashMap<i64, Vec<&'static str>>> = Lazy::new(|| {
    UserRole::all()
        .into_iter()
        .map(|role| (role.code(), vec![role.home_prefix()]))
        .collect()
});

/// Allowlist for a role code, shared prefixes included.
/// Unknown codes get the shared prefixes only.
pub fn allowed_prefixes(role: i64) -> Vec<&'static str> {
    let mut prefixes = ROLE_PREFIXES.get(&role).cloned().unwrap_or_default();
    if role != UserRole::Developer.code() {
        prefixes.push(ROLE_REQUEST_PREFIX);
    }
    prefixes.push(SEARCH_PREFIX);
    prefixes
}

pub fn is_path_allowed(prefixes: &[&str], path: &str) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_allowlist() {
        assert_eq!(allowed_prefixes(1), vec!["/dashboard/developer", "/search"]);
    }

    #[test]
    fn test_other_roles_get_role_request() {
        assert_eq!(
            allowed_prefixes(4),
            vec!["/dashboard/retailer", "/role-request", "/search"]
        );
        assert_eq!(
            allowed_prefixes(8),
            vec!["/customer", "/role-request", "/search"]
        );
        for code in 2..=8 {
            assert!(allowed_prefixes(code).contains(&ROLE_REQUEST_PREFIX));
        }
    }

    #[test]
    fn test_unknown_role_gets_shared_prefixes_only() {
        assert_eq!(allowed_prefixes(99), vec!["/role-request", "/search"]);
        assert_eq!(allowed_prefixes(-1), vec!["/role-request", "/search"]);
    }

    #[test]
    fn test_prefix_matching() {
        let prefixes = allowed_prefixes(4);
        assert!(is_path_allowed(&prefixes, "/dashboard/retailer"));
        assert!(is_path_allowed(&prefixes, "/dashboard/retailer/dashboard"));
        assert!(is_path_allowed(&prefixes, "/search/results"));
        assert!(!is_path_allowed(&prefixes, "/dashboard/developer/dashboard"));
        assert!(!is_path_allowed(&prefixes, "/dashboard"));
        assert!(!is_path_allowed(&prefixes, "/"));
    }

    #[test]
    fn test_no_segment_boundary() {
        // Known gap: prefix match does not stop at '/'
        let prefixes = allowed_prefixes(4);
        assert!(is_path_allowed(&prefixes, "/dashboard/retailerX"));
        assert!(is_path_allowed(&prefixes, "/searchable"));
    }
}
