//! Authorization gate: one pure decision function for every protected
//! navigation, instead of role checks scattered across the surface.

/// Capability a navigation target demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    // ---
    /// Open to everyone, session or not.
    Public,
    /// Any valid session.
    Authenticated,
    /// Valid session whose user carries the admin flag.
    Admin,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    // ---
    Allow,
    /// No usable session: send the caller to the login entry point.
    RedirectLogin,
    /// Valid session, insufficient role: send the caller home.
    RedirectHome,
}

/// Decide whether a request may proceed.
///
/// Pure and synchronous; session validity is established (with its
/// side effects) before this is called.
pub fn decide(required: Capability, session_valid: bool, is_admin: bool) -> Decision {
    // ---
    match required {
        Capability::Public => Decision::Allow,
        Capability::Authenticated => {
            if session_valid {
                Decision::Allow
            } else {
                Decision::RedirectLogin
            }
        }
        Capability::Admin => {
            if !session_valid {
                Decision::RedirectLogin
            } else if is_admin {
                Decision::Allow
            } else {
                Decision::RedirectHome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn public_always_allows() {
        // ---
        assert_eq!(decide(Capability::Public, false, false), Decision::Allow);
        assert_eq!(decide(Capability::Public, true, true), Decision::Allow);
    }

    #[test]
    fn authenticated_requires_valid_session() {
        // ---
        assert_eq!(
            decide(Capability::Authenticated, true, false),
            Decision::Allow
        );
        assert_eq!(
            decide(Capability::Authenticated, false, false),
            Decision::RedirectLogin
        );
        // Role is irrelevant without a session.
        assert_eq!(
            decide(Capability::Authenticated, false, true),
            Decision::RedirectLogin
        );
    }

    #[test]
    fn admin_decision_table() {
        // ---
        assert_eq!(decide(Capability::Admin, true, true), Decision::Allow);
        assert_eq!(decide(Capability::Admin, true, false), Decision::RedirectHome);
        assert_eq!(decide(Capability::Admin, false, false), Decision::RedirectLogin);
        assert_eq!(decide(Capability::Admin, false, true), Decision::RedirectLogin);
    }
}
