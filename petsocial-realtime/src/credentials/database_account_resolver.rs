use super::DbPool;
use crate::{
    models::{profile::Profile, user::User},
    schema::users,
};
use diesel::{BelongingToDsl, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use realtime_server::{AccountResolver, AccountStatus, UserId, errors::resolve_error::ResolveError};
use tokio::task;

/// Resolves accounts against `users`, reading the block flag from the
/// user's profile when there is one.
pub struct DatabaseAccountResolver {
    pool: DbPool,
}

impl DatabaseAccountResolver {
    pub fn new(pool: DbPool) -> Self {
        DatabaseAccountResolver { pool }
    }
}

impl AccountResolver for DatabaseAccountResolver {
    async fn resolve_account(&self, user_id: UserId) -> Result<AccountStatus, ResolveError> {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let connection = &mut pool.get().map_err(unavailable)?;

            let Some(user) = users::table
                .find(user_id.0)
                .select(User::as_select())
                .first(connection)
                .optional()
                .map_err(unavailable)?
            else {
                return Ok(AccountStatus::NotFound);
            };

            let profile = Profile::belonging_to(&user)
                .select(Profile::as_select())
                .first(connection)
                .optional()
                .map_err(unavailable)?;

            Ok(match profile {
                Some(profile) if profile.block => AccountStatus::Blocked,
                _ => AccountStatus::Active,
            })
        })
        .await
        .map_err(unavailable)?
    }
}

fn unavailable(error: impl ToString) -> ResolveError {
    ResolveError::Unavailable(error.to_string())
}
