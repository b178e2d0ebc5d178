use super::prelude::*;
use crate::RepoError;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username : String,
    pub email    : Option<EmailAddress>,
    pub roles    : Roles,
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && !username.chars().any(char::is_whitespace)
}

fn get_user_by_username<D: UserRepo>(db: &D, username: &str) -> Result<User> {
    db.try_get_user_by_username(username)?
        .ok_or(Error::UserDoesNotExist)
}

pub fn create_new_user<D: UserRepo>(db: &D, new_user: NewUser) -> Result<User> {
    let NewUser {
        username,
        email,
        roles,
    } = new_user;
    let username = username.trim().to_string();
    if !is_valid_username(&username) {
        return Err(Error::Username);
    }
    if db.try_get_user_by_username(&username)?.is_some() {
        return Err(Error::UserExists);
    }
    let user = User {
        id: Id::new(),
        username,
        email,
        active: true,
        roles,
    };
    db.create_user(&user).map_err(|err| match err {
        RepoError::AlreadyExists => Error::UserExists,
        err => Error::Repo(err),
    })?;
    log::info!("Created user {} ({})", user.username, user.id);
    Ok(user)
}

pub fn change_user_role<D: UserRepo>(
    db: &D,
    username: &str,
    role: Role,
    granted: bool,
) -> Result<User> {
    let mut user = get_user_by_username(db, username)?;
    if granted {
        log::info!("Granting role {} to {}", role, user.username);
        user.roles.grant(role);
    } else {
        log::info!("Revoking role {} from {}", role, user.username);
        user.roles.revoke(role);
    }
    db.update_user(&user)?;
    Ok(user)
}

pub fn change_user_activation<D: UserRepo>(db: &D, username: &str, active: bool) -> Result<User> {
    let mut user = get_user_by_username(db, username)?;
    log::info!(
        "{} user {}",
        if active { "Activating" } else { "Deactivating" },
        user.username
    );
    user.active = active;
    db.update_user(&user)?;
    Ok(user)
}

pub fn load_users<D: UserRepo>(db: &D) -> Result<Vec<User>> {
    let mut users = db.all_users()?;
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(users)
}
