use crate::models::user_id::UserId;

/// `Unauthenticated -> Authenticated -> Closed`, `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(UserId),
    Closed,
}

impl SessionState {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            SessionState::Authenticated(user_id) => Some(*user_id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}
