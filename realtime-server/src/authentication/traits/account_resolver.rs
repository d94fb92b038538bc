use crate::{errors::resolve_error::ResolveError, models::user_id::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Blocked,
    NotFound,
}

pub trait AccountResolver: Send + Sync + 'static {
    fn resolve_account(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<AccountStatus, ResolveError>> + Send;
}
