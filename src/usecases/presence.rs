//! Use case behind `@who`.

use crate::{
    domain::session::SessionState,
    store::{ChatStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhoError {
    StoreUnavailable,
    GroupNotSet,
    Store(StoreError),
}

impl WhoError {
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable => "Error: not connected to the message store.".to_owned(),
            Self::GroupNotSet => "Error: group not set. Use @exit and join a group.".to_owned(),
            Self::Store(error) => format!("Error listing users: {error}"),
        }
    }
}

/// Returns the line naming everyone with a live feed on the current group.
pub fn who_is_online(
    store: Option<&dyn ChatStore>,
    session: &SessionState,
) -> Result<String, WhoError> {
    let store = store.ok_or(WhoError::StoreUnavailable)?;
    let group = session.group().ok_or(WhoError::GroupNotSet)?;

    let users = store.online_users(group).map_err(WhoError::Store)?;
    if users.is_empty() {
        return Ok(format!("Nobody is online in {group}."));
    }
    Ok(format!("Online in {group}: {}", users.join(", ")))
}
