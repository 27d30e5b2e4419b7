use crate::domain::UserId;

// ============== Authorization ==============

/// Allowlist check for the admin panel.
///
/// An empty allowlist leaves the panel open to every user; a configured one
/// admits only the listed ids. Updates without a sender are always rejected.
pub fn is_authorized(user_id: Option<UserId>, allowed_users: &[i64]) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    if allowed_users.is_empty() {
        return true;
    }
    allowed_users.contains(&user_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowlist_is_open() {
        assert!(is_authorized(Some(UserId(5)), &[]));
        assert!(!is_authorized(None, &[]));
    }

    #[test]
    fn configured_allowlist_is_enforced() {
        assert!(is_authorized(Some(UserId(5)), &[1, 5]));
        assert!(!is_authorized(Some(UserId(6)), &[1, 5]));
    }
}
