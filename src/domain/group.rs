/// Group name that lists existing groups instead of joining one.
pub const LIST_GROUPS_KEYWORD: &str = "list";

/// Result of resolving a group by name in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLookup {
    /// True when the lookup created the group document.
    pub created: bool,
    /// Store clock at the moment of the lookup; live feeds start after it.
    pub server_time_ms: i64,
}

/// What the user typed into the group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRequest {
    Empty,
    List,
    Join(String),
}

impl GroupRequest {
    pub fn parse(input: &str) -> Self {
        let name = input.trim();
        if name.is_empty() {
            Self::Empty
        } else if name.eq_ignore_ascii_case(LIST_GROUPS_KEYWORD) {
            Self::List
        } else {
            Self::Join(name.to_owned())
        }
    }
}
