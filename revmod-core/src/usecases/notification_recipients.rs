use super::prelude::*;

/// E-mail addresses of all active users with one of the roles.
///
/// Users without an address are skipped.
pub fn email_addresses_of_roles<I: IdentityProvider + ?Sized>(
    identities: &I,
    roles: &[Role],
) -> Result<Vec<EmailAddress>> {
    let mut addresses = Vec::new();
    for role in roles {
        for user in identities.active_users_with_role(*role)? {
            match user.email {
                Some(email) => addresses.push(email),
                None => log::debug!("User {} has no e-mail address", user.id),
            }
        }
    }
    addresses.sort();
    addresses.dedup();
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};
    use revmod_entities::builders::*;

    #[test]
    fn collect_addresses_of_arbiters() {
        let db = MockDb::with_supervisors(2);
        let addresses = email_addresses_of_roles(&db, &[Role::Arbiter]).unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].as_str(), "arb@example.com");
    }

    #[test]
    fn skip_users_without_address_and_duplicates() {
        let db = MockDb::with_supervisors(2);
        let both = User::build()
            .id("both")
            .username("both")
            .email("both@example.com")
            .role(Role::Supervisor)
            .role(Role::Arbiter)
            .finish();
        db.create_user(&both).unwrap();
        let silent = User::build()
            .id("silent")
            .username("silent")
            .role(Role::Arbiter)
            .finish();
        db.create_user(&silent).unwrap();
        let addresses =
            email_addresses_of_roles(&db, &[Role::Arbiter, Role::Supervisor]).unwrap();
        let addresses: Vec<_> = addresses.iter().map(EmailAddress::as_str).collect();
        assert_eq!(
            addresses,
            vec![
                "arb@example.com",
                "both@example.com",
                "sup1@example.com",
                "sup2@example.com"
            ]
        );
    }
}
