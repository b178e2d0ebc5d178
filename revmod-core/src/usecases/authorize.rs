use super::prelude::*;
use crate::authorization::user::authorize_role;

pub fn authorize_user<I>(identities: &I, user_id: &str, role: Role) -> Result<User>
where
    I: IdentityProvider + ?Sized,
{
    authorize_user_with_any_role(identities, user_id, &[role])
}

pub fn authorize_user_with_any_role<I: IdentityProvider + ?Sized>(
    identities: &I,
    user_id: &str,
    roles: &[Role],
) -> Result<User> {
    let Some(user) = identities.identity(user_id)? else {
        log::warn!("Unknown user '{user_id}' requested a privileged operation");
        return Err(Error::Forbidden);
    };
    let mut last_err = None;
    for role in roles {
        match authorize_role(&user, *role) {
            Ok(()) => return Ok(user),
            Err(err) => last_err = Some(err),
        }
    }
    if let Some(err) = last_err {
        log::warn!("User '{}' is not authorized: {}", user.id, err);
    }
    Err(Error::Forbidden)
}
