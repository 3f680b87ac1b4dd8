//! Per-resource access rules.
//!
//! The policy is plain data held in `AppState`, so handlers consult it
//! instead of hard-coding who may do what.

use crate::{error::AppError, middleware::auth::Caller};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Category,
    Supplier,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Anyone,
    Authenticated,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub read: Requirement,
    pub write: Requirement,
}

impl Rule {
    pub const fn new(read: Requirement, write: Requirement) -> Self {
        Self { read, write }
    }

    fn for_action(&self, action: Action) -> Requirement {
        match action {
            Action::Read => self.read,
            Action::Write => self.write,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub products: Rule,
    pub categories: Rule,
    pub suppliers: Rule,
    pub users: Rule,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            products: Rule::new(Requirement::Anyone, Requirement::Authenticated),
            categories: Rule::new(Requirement::Anyone, Requirement::Authenticated),
            suppliers: Rule::new(Requirement::Authenticated, Requirement::Authenticated),
            users: Rule::new(Requirement::Staff, Requirement::Staff),
        }
    }
}

impl AccessPolicy {
    pub fn rule(&self, resource: Resource) -> Rule {
        match resource {
            Resource::Product => self.products,
            Resource::Category => self.categories,
            Resource::Supplier => self.suppliers,
            Resource::User => self.users,
        }
    }

    /// Anonymous callers failing a rule get 401, authenticated ones 403.
    pub fn check(&self, resource: Resource, action: Action, caller: &Caller) -> Result<(), AppError> {
        match self.rule(resource).for_action(action) {
            Requirement::Anyone => Ok(()),
            Requirement::Authenticated => caller.user().map(|_| ()),
            Requirement::Staff => {
                let user = caller.user()?;
                if user.is_staff {
                    Ok(())
                } else {
                    tracing::debug!(user_id = %user.user_id, ?resource, ?action, "staff access denied");
                    Err(AppError::Forbidden)
                }
            }
        }
    }
}
