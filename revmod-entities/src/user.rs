use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{email::EmailAddress, id::Id};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id       : Id,
    pub username : String,
    pub email    : Option<EmailAddress>,
    pub active   : bool,
    pub roles    : Roles,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.active && self.roles.contains(role)
    }
}

/// Moderation roles that can be granted independently of each other.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Supervisor,
    Arbiter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Roles {
    pub supervisor: bool,
    pub arbiter: bool,
}

impl Roles {
    pub const fn none() -> Self {
        Self {
            supervisor: false,
            arbiter: false,
        }
    }

    pub const fn contains(self, role: Role) -> bool {
        match role {
            Role::Supervisor => self.supervisor,
            Role::Arbiter => self.arbiter,
        }
    }

    pub fn grant(&mut self, role: Role) {
        self.set(role, true);
    }

    pub fn revoke(&mut self, role: Role) {
        self.set(role, false);
    }

    fn set(&mut self, role: Role, value: bool) {
        match role {
            Role::Supervisor => self.supervisor = value,
            Role::Arbiter => self.arbiter = value,
        }
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut roles = Self::none();
        for role in iter {
            roles.grant(role);
        }
        roles
    }
}
