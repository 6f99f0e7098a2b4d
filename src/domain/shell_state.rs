use super::{
    line_input::LineInput,
    transcript::{LineKind, Transcript, TranscriptLine},
};

/// Hint emitted whenever the chat screen is entered.
pub const HELP_HINT: &str = "Type @help for a list of commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    UserName,
    GroupName,
}

/// Exactly one screen is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login(LoginStep),
    Chat,
    /// Startup could not load the store configuration; nothing else is available.
    Blocked(String),
}

/// Groups shown after the `list` keyword, with an optional keyboard selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupListing {
    names: Vec<String>,
    selected: Option<usize>,
}

impl GroupListing {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            selected: None,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.names.get(index))
            .map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.names.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) if index + 1 < self.names.len() => index + 1,
            Some(index) => index,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.names.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |index| index.saturating_sub(1)));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    screen: Screen,
    user_input: LineInput,
    group_input: LineInput,
    message_input: LineInput,
    group_listing: Option<GroupListing>,
    login_notice: Option<TranscriptLine>,
    transcript: Transcript,
    prompt_user: String,
    current_group: String,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            screen: Screen::Login(LoginStep::UserName),
            user_input: LineInput::default(),
            group_input: LineInput::default(),
            message_input: LineInput::default(),
            group_listing: None,
            login_notice: None,
            transcript: Transcript::default(),
            prompt_user: String::new(),
            current_group: String::new(),
        }
    }
}

impl ShellState {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            screen: Screen::Blocked(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn user_input(&self) -> &LineInput {
        &self.user_input
    }

    pub fn group_input(&self) -> &LineInput {
        &self.group_input
    }

    pub fn message_input(&self) -> &LineInput {
        &self.message_input
    }

    /// The field that receives keystrokes on the current screen.
    pub fn active_input_mut(&mut self) -> Option<&mut LineInput> {
        match self.screen {
            Screen::Login(LoginStep::UserName) => Some(&mut self.user_input),
            Screen::Login(LoginStep::GroupName) => Some(&mut self.group_input),
            Screen::Chat => Some(&mut self.message_input),
            Screen::Blocked(_) => None,
        }
    }

    pub fn group_listing(&self) -> Option<&GroupListing> {
        self.group_listing.as_ref()
    }

    pub fn group_listing_mut(&mut self) -> Option<&mut GroupListing> {
        self.group_listing.as_mut()
    }

    pub fn show_group_listing(&mut self, names: Vec<String>) {
        self.group_listing = Some(GroupListing::new(names));
    }

    /// Copies the highlighted group into the group field.
    pub fn apply_group_selection(&mut self) {
        if let Some(name) = self
            .group_listing
            .as_ref()
            .and_then(GroupListing::selected_name)
        {
            let name = name.to_owned();
            self.group_input.set_text(&name);
        }
    }

    pub fn login_notice(&self) -> Option<&TranscriptLine> {
        self.login_notice.as_ref()
    }

    pub fn set_login_notice(&mut self, kind: LineKind, text: impl Into<String>) {
        self.login_notice = Some(TranscriptLine {
            kind,
            text: text.into(),
        });
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn prompt_user(&self) -> &str {
        &self.prompt_user
    }

    pub fn current_group(&self) -> &str {
        &self.current_group
    }

    /// Moves from the user name field to the group name field.
    pub fn advance_to_group_step(&mut self, user: &str) {
        self.prompt_user = user.to_owned();
        self.login_notice = None;
        self.screen = Screen::Login(LoginStep::GroupName);
    }

    /// Reveals the chat screen with a fresh transcript.
    pub fn enter_chat(&mut self, group: &str) {
        self.current_group = group.to_owned();
        self.group_listing = None;
        self.login_notice = None;
        self.message_input.clear();
        self.transcript.clear();
        self.transcript.push_system(HELP_HINT);
        self.screen = Screen::Chat;
    }

    /// Back to the user name field with every input and the transcript cleared.
    pub fn reset_to_login(&mut self) {
        self.user_input.clear();
        self.group_input.clear();
        self.message_input.clear();
        self.group_listing = None;
        self.login_notice = None;
        self.transcript.clear();
        self.prompt_user.clear();
        self.current_group.clear();
        self.screen = Screen::Login(LoginStep::UserName);
    }
}
