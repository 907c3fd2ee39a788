use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated account name. Produced only by a successful login;
/// ownership and authorization checks compare against this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds zero or one active identity for the lifetime of a session.
///
/// Passed explicitly into every engine call instead of living in a
/// process-wide global, so multiple sessions can drive the engine
/// concurrently without sharing login state.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn logout(&mut self) {
        self.identity = None;
    }

    pub fn current(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }
}
