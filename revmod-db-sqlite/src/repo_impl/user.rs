use super::*;
use revmod_core::gateways::identity::IdentityProvider;

impl<'a> UserRepo for DbReadOnly<'a> {
    fn create_user(&self, _user: &User) -> Result<()> {
        Err(read_only_err())
    }
    fn update_user(&self, _user: &User) -> Result<()> {
        Err(read_only_err())
    }

    fn try_get_user(&self, id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        try_get_user_by_username(&mut self.conn.borrow_mut(), username)
    }
    fn all_users(&self) -> Result<Vec<User>> {
        all_users(&mut self.conn.borrow_mut())
    }
    fn users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
    fn count_users_with_role(&self, role: Role) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

impl<'a> UserRepo for DbReadWrite<'a> {
    fn create_user(&self, user: &User) -> Result<()> {
        create_user(&mut self.conn.borrow_mut(), user)
    }
    fn update_user(&self, user: &User) -> Result<()> {
        update_user(&mut self.conn.borrow_mut(), user)
    }

    fn try_get_user(&self, id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        try_get_user_by_username(&mut self.conn.borrow_mut(), username)
    }
    fn all_users(&self) -> Result<Vec<User>> {
        all_users(&mut self.conn.borrow_mut())
    }
    fn users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
    fn count_users_with_role(&self, role: Role) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

impl<'a> UserRepo for DbConnection<'a> {
    fn create_user(&self, user: &User) -> Result<()> {
        create_user(&mut self.conn.borrow_mut(), user)
    }
    fn update_user(&self, user: &User) -> Result<()> {
        update_user(&mut self.conn.borrow_mut(), user)
    }

    fn try_get_user(&self, id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        try_get_user_by_username(&mut self.conn.borrow_mut(), username)
    }
    fn all_users(&self) -> Result<Vec<User>> {
        all_users(&mut self.conn.borrow_mut())
    }
    fn users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
    fn count_users_with_role(&self, role: Role) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

// The user accounts of the review database are the default identities.
impl<'a> IdentityProvider for DbReadOnly<'a> {
    fn identity(&self, user_id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), user_id)
    }
    fn supervisor_roster_size(&self) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), Role::Supervisor)
    }
    fn active_users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

impl<'a> IdentityProvider for DbReadWrite<'a> {
    fn identity(&self, user_id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), user_id)
    }
    fn supervisor_roster_size(&self) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), Role::Supervisor)
    }
    fn active_users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

impl<'a> IdentityProvider for DbConnection<'a> {
    fn identity(&self, user_id: &str) -> Result<Option<User>> {
        try_get_user(&mut self.conn.borrow_mut(), user_id)
    }
    fn supervisor_roster_size(&self) -> Result<usize> {
        count_users_with_role(&mut self.conn.borrow_mut(), Role::Supervisor)
    }
    fn active_users_with_role(&self, role: Role) -> Result<Vec<User>> {
        users_with_role(&mut self.conn.borrow_mut(), role)
    }
}

impl<'a> From<&'a User> for models::NewUser<'a> {
    fn from(u: &'a User) -> Self {
        let User {
            id,
            username,
            email,
            active,
            roles,
        } = u;
        Self {
            id: id.as_str(),
            username,
            email: email.as_ref().map(EmailAddress::as_str),
            active: *active,
            is_supervisor: roles.supervisor,
            is_arbiter: roles.arbiter,
        }
    }
}

impl From<models::UserEntity> for User {
    fn from(u: models::UserEntity) -> Self {
        let models::UserEntity {
            id,
            username,
            email,
            active,
            is_supervisor,
            is_arbiter,
        } = u;
        Self {
            id: id.into(),
            username,
            email: email.map(EmailAddress::new_unchecked),
            active,
            roles: Roles {
                supervisor: is_supervisor,
                arbiter: is_arbiter,
            },
        }
    }
}

fn create_user(conn: &mut SqliteConnection, u: &User) -> Result<()> {
    let new_user = models::NewUser::from(u);
    diesel::insert_into(schema::users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn update_user(conn: &mut SqliteConnection, u: &User) -> Result<()> {
    use schema::users::dsl;
    let new_user = models::NewUser::from(u);
    let count = diesel::update(dsl::users.filter(dsl::id.eq(new_user.id)))
        .set(&new_user)
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

fn try_get_user(conn: &mut SqliteConnection, id: &str) -> Result<Option<User>> {
    use schema::users::dsl;
    Ok(dsl::users
        .filter(dsl::id.eq(id))
        .first::<models::UserEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn try_get_user_by_username(conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
    use schema::users::dsl;
    Ok(dsl::users
        .filter(dsl::username.eq(username))
        .first::<models::UserEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(Into::into))
}

fn all_users(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    use schema::users::dsl;
    Ok(dsl::users
        .order_by(dsl::username)
        .load::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn users_with_role(conn: &mut SqliteConnection, role: Role) -> Result<Vec<User>> {
    use schema::users::dsl;
    let query = dsl::users.filter(dsl::active.eq(true)).into_boxed();
    let query = match role {
        Role::Supervisor => query.filter(dsl::is_supervisor.eq(true)),
        Role::Arbiter => query.filter(dsl::is_arbiter.eq(true)),
    };
    Ok(query
        .order_by(dsl::username)
        .load::<models::UserEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn count_users_with_role(conn: &mut SqliteConnection, role: Role) -> Result<usize> {
    // The roster is small enough to be loaded
    Ok(users_with_role(conn, role)?.len())
}
