use crate::{service::ModerationService, usecases, Result, Role, User};

impl ModerationService {
    pub fn create_user(&self, new_user: usecases::NewUser) -> Result<User> {
        let mut db = self.connections.exclusive()?;
        Ok(db.transaction(|conn| usecases::create_new_user(conn, new_user))?)
    }

    /// Takes effect on the next tally of every review.
    pub fn change_user_role(&self, username: &str, role: Role, granted: bool) -> Result<User> {
        let mut db = self.connections.exclusive()?;
        Ok(db.transaction(|conn| usecases::change_user_role(conn, username, role, granted))?)
    }

    pub fn change_user_activation(&self, username: &str, active: bool) -> Result<User> {
        let mut db = self.connections.exclusive()?;
        Ok(db.transaction(|conn| usecases::change_user_activation(conn, username, active))?)
    }

    pub fn users(&self) -> Result<Vec<User>> {
        let db = self.connections.shared()?;
        Ok(usecases::load_users(&db)?)
    }
}
