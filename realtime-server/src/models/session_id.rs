use std::fmt;
use std::sync::Arc;

/// Opaque identity of one transport connection. Only ever compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<String>);

impl SessionId {
    pub fn generate() -> Self {
        SessionId(Arc::new(
            guid_create::GUID::rand().to_string().to_lowercase(),
        ))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
