//! Classification of submitted chat lines.

/// Prefix that marks a line as a command rather than chat content.
pub const COMMAND_MARKER: char = '@';

/// Bare word that clears the transcript without the marker.
const BARE_CLEAR: &str = "clear";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Clear,
    ShowHistory,
    Time,
    Who,
    Help,
    Exit,
}

impl ChatCommand {
    pub const ALL: [ChatCommand; 6] = [
        ChatCommand::Clear,
        ChatCommand::ShowHistory,
        ChatCommand::Time,
        ChatCommand::Who,
        ChatCommand::Help,
        ChatCommand::Exit,
    ];

    /// Command word without the marker.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::ShowHistory => "showmess",
            Self::Time => "time",
            Self::Who => "who",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::Clear => "Clear the screen",
            Self::ShowHistory => "Show last 30 messages",
            Self::Time => "Show current time in UTC, CT, and IST",
            Self::Who => "Show who is online in this group",
            Self::Help => "Show this help message",
            Self::Exit => "Log out",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.keyword().eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Command(ChatCommand),
    /// Marker line that matches no command.
    UnknownCommand(String),
    Message(String),
}

impl ChatInput {
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        if line.eq_ignore_ascii_case(BARE_CLEAR) {
            return Self::Command(ChatCommand::Clear);
        }

        match line.strip_prefix(COMMAND_MARKER) {
            Some(word) => ChatCommand::from_keyword(word)
                .map(Self::Command)
                .unwrap_or_else(|| Self::UnknownCommand(line.to_owned())),
            None => Self::Message(line.to_owned()),
        }
    }
}

/// Lines rendered by `@help`.
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Available commands:".to_owned()];
    lines.extend(ChatCommand::ALL.into_iter().map(|command| {
        format!(
            "{}{} - {}",
            COMMAND_MARKER,
            command.keyword(),
            command.summary()
        )
    }));
    lines
}
