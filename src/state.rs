use sea_orm::DatabaseConnection;

use crate::{access::AccessPolicy, middleware::auth::AuthKeys};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub access: AccessPolicy,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, auth: AuthKeys) -> Self {
        Self {
            orm,
            access: AccessPolicy::default(),
            auth,
        }
    }
}
