//! Dispatches one submitted chat line.

use chrono::Utc;

use crate::{
    domain::{
        command::{help_lines, ChatCommand, ChatInput},
        message::Message,
        session::SessionState,
        shell_state::ShellState,
    },
    store::ChatStore,
};

use super::{
    presence::who_is_online,
    send_message::send_message,
    show_history::{history_lines, load_history},
    world_clock::world_clock_lines,
};

const COMMAND_IGNORED: &str = "COMMAND_IGNORED";
const MESSAGE_SEND_FAILED: &str = "MESSAGE_SEND_FAILED";
const HISTORY_LOAD_FAILED: &str = "HISTORY_LOAD_FAILED";
const ONLINE_USERS_FAILED: &str = "ONLINE_USERS_FAILED";

/// What a submitted line turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Ignored,
    Command(ChatCommand),
    Sent(Message),
    /// The line was rendered as an error instead of taking effect.
    Failed,
}

pub struct CommandInterpreter<'a> {
    store: Option<&'a dyn ChatStore>,
    session: &'a mut SessionState,
    state: &'a mut ShellState,
    history_limit: usize,
}

impl<'a> CommandInterpreter<'a> {
    pub fn new(
        store: Option<&'a dyn ChatStore>,
        session: &'a mut SessionState,
        state: &'a mut ShellState,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            session,
            state,
            history_limit,
        }
    }

    pub fn execute(&mut self, line: &str) -> Interpretation {
        match ChatInput::classify(line) {
            ChatInput::Empty => Interpretation::Ignored,
            ChatInput::UnknownCommand(command) => {
                tracing::debug!(code = COMMAND_IGNORED, command = %command, "unknown command ignored");
                Interpretation::Ignored
            }
            ChatInput::Command(command) => self.run_command(command),
            ChatInput::Message(text) => self.send(&text),
        }
    }

    fn run_command(&mut self, command: ChatCommand) -> Interpretation {
        match command {
            ChatCommand::Clear => self.state.transcript_mut().clear(),
            ChatCommand::ShowHistory => return self.show_history(),
            ChatCommand::Time => {
                for line in world_clock_lines(Utc::now()) {
                    self.state.transcript_mut().push_system(line);
                }
            }
            ChatCommand::Who => return self.show_online_users(),
            ChatCommand::Help => {
                for line in help_lines() {
                    self.state.transcript_mut().push_system(line);
                }
            }
            ChatCommand::Exit => {
                let cancelled = self.session.exit();
                self.state.reset_to_login();
                tracing::info!(cancelled_feed = cancelled, "session exited");
            }
        }

        Interpretation::Command(command)
    }

    fn show_history(&mut self) -> Interpretation {
        match load_history(self.store, self.session, self.history_limit) {
            Ok(messages) => {
                let group = self.session.group().unwrap_or_default();
                for line in history_lines(group, &messages) {
                    self.state.transcript_mut().push(line.kind, &line.text);
                }
                Interpretation::Command(ChatCommand::ShowHistory)
            }
            Err(error) => {
                tracing::warn!(code = HISTORY_LOAD_FAILED, error = ?error, "history load failed");
                self.state.transcript_mut().push_error(error.user_message());
                Interpretation::Failed
            }
        }
    }

    fn show_online_users(&mut self) -> Interpretation {
        match who_is_online(self.store, self.session) {
            Ok(line) => {
                self.state.transcript_mut().push_system(line);
                Interpretation::Command(ChatCommand::Who)
            }
            Err(error) => {
                tracing::warn!(code = ONLINE_USERS_FAILED, error = ?error, "online users unavailable");
                self.state.transcript_mut().push_error(error.user_message());
                Interpretation::Failed
            }
        }
    }

    fn send(&mut self, text: &str) -> Interpretation {
        match send_message(self.store, self.session, text) {
            Ok(message) => {
                tracing::debug!(
                    group = %message.group,
                    timestamp_ms = message.timestamp_ms,
                    "message sent"
                );
                Interpretation::Sent(message)
            }
            Err(error) => {
                tracing::warn!(code = MESSAGE_SEND_FAILED, error = ?error, "message not sent");
                self.state.transcript_mut().push_error(error.user_message());
                Interpretation::Failed
            }
        }
    }
}
