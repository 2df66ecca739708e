//! Who may change curation state.
//!
//! Every mutating request from an editor passes two checks: the acting
//! principal can edit the item, and the request carries a valid
//! confirmation token. Failing either is a silent refusal, not an error.

use crate::model::Item;

/// Action name confirmation tokens are bound to.
pub const CURATE_ACTION: &str = "cur_curate_item";

pub trait AccessPolicy {
    fn can_edit(&self, item: &Item) -> bool;

    fn verify_token(&self, token: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: u64,
    pub role: Role,
    session: String,
}

impl Principal {
    pub fn new(user_id: u64, role: Role) -> Self {
        Self {
            user_id,
            role,
            session: String::new(),
        }
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    /// The token an edit form for this principal carries.
    pub fn confirmation_token(&self) -> String {
        format!("{}:{}:{}", CURATE_ACTION, self.user_id, self.session)
    }
}

impl AccessPolicy for Principal {
    fn can_edit(&self, item: &Item) -> bool {
        let own = item.author == Some(self.user_id);
        match self.role {
            Role::Administrator | Role::Editor => true,
            Role::Author => own,
            Role::Contributor => own && !item.is_published(),
            Role::Subscriber => false,
        }
    }

    fn verify_token(&self, token: &str) -> bool {
        token == self.confirmation_token()
    }
}
