use revmod_entities::user::{Role, User};

use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("inactive user")]
    InactiveUser,
    #[error("unauthorized role")]
    UnauthorizedRole,
}

pub type Result<T> = StdResult<T, Error>;

pub fn authorize_role(user: &User, required_role: Role) -> Result<()> {
    if !user.active {
        return Err(Error::InactiveUser);
    }
    if !user.roles.contains(required_role) {
        return Err(Error::UnauthorizedRole);
    }
    Ok(())
}
