use anyhow::Result;

use crate::{
    domain::{
        events::{AppEvent, KeyInput},
        session::SessionState,
        shell_state::{LoginStep, Screen, ShellState},
        transcript::LineKind,
    },
    store::ChatStore,
};

use super::{
    contracts::ShellOrchestrator,
    enter_group::{enter_group, EnterGroupOutcome},
    interpreter::CommandInterpreter,
};

const NO_GROUPS_NOTICE: &str = "No groups yet. Enter a name to create one.";
const GROUP_ENTRY_FAILED: &str = "GROUP_ENTRY_FAILED";

pub struct DefaultShellOrchestrator<S>
where
    S: ChatStore,
{
    state: ShellState,
    session: SessionState,
    store: Option<S>,
    history_limit: usize,
}

impl<S> DefaultShellOrchestrator<S>
where
    S: ChatStore,
{
    pub fn new(store: S, history_limit: usize) -> Self {
        Self {
            state: ShellState::default(),
            session: SessionState::default(),
            store: Some(store),
            history_limit,
        }
    }

    /// Shell that only shows the blocking error screen.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            state: ShellState::blocked(reason),
            session: SessionState::default(),
            store: None,
            history_limit: 0,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    fn drain_deliveries(&mut self) {
        let delivered = self.session.drain_deliveries();
        if self.state.screen() != &Screen::Chat {
            return;
        }

        for event in delivered {
            let line = event.to_line();
            self.state.transcript_mut().push(line.kind, line.text);
        }
    }

    fn handle_key(&mut self, key: KeyInput) {
        if matches!(self.state.screen(), Screen::Blocked(_)) {
            return;
        }

        match key.key.as_str() {
            "enter" => self.submit(),
            "up" => self.move_group_selection(false),
            "down" => self.move_group_selection(true),
            _ => {
                let Some(input) = self.state.active_input_mut() else {
                    return;
                };
                match key.key.as_str() {
                    "backspace" => input.backspace(),
                    "delete" => input.delete(),
                    "left" => input.move_left(),
                    "right" => input.move_right(),
                    "home" => input.move_home(),
                    "end" => input.move_end(),
                    _ => {
                        if let Some(ch) = key.printable() {
                            input.insert(ch);
                        }
                    }
                }
            }
        }
    }

    fn move_group_selection(&mut self, forward: bool) {
        if self.state.screen() != &Screen::Login(LoginStep::GroupName) {
            return;
        }

        let Some(listing) = self.state.group_listing_mut() else {
            return;
        };
        if forward {
            listing.select_next();
        } else {
            listing.select_previous();
        }
        self.state.apply_group_selection();
    }

    fn submit(&mut self) {
        let screen = self.state.screen().clone();
        match screen {
            Screen::Login(LoginStep::UserName) => self.submit_user_name(),
            Screen::Login(LoginStep::GroupName) => self.submit_group_name(),
            Screen::Chat => self.submit_chat_line(),
            Screen::Blocked(_) => {}
        }
    }

    fn submit_user_name(&mut self) {
        let name = self.state.user_input().text().to_owned();
        if !self.session.set_user(&name) {
            return;
        }

        if let Some(user) = self.session.user() {
            tracing::info!(user, "user name set");
            self.state.advance_to_group_step(user);
        }
    }

    fn submit_group_name(&mut self) {
        let input = self.state.group_input().text().to_owned();
        let store = self.store.as_ref().map(|store| store as &dyn ChatStore);

        match enter_group(store, &mut self.session, &input) {
            Ok(EnterGroupOutcome::Ignored) => {}
            Ok(EnterGroupOutcome::Listed(names)) => {
                if names.is_empty() {
                    self.state.set_login_notice(LineKind::System, NO_GROUPS_NOTICE);
                }
                self.state.show_group_listing(names);
                if let Some(field) = self.state.active_input_mut() {
                    field.clear();
                }
            }
            Ok(EnterGroupOutcome::Joined { group, created }) => {
                self.state.enter_chat(&group);
                if created {
                    self.state
                        .transcript_mut()
                        .push_system(format!("Created new group: {group}"));
                }
            }
            Err(error) => {
                tracing::warn!(code = GROUP_ENTRY_FAILED, error = ?error, "group entry failed");
                self.state
                    .set_login_notice(LineKind::Error, error.user_message());
            }
        }
    }

    fn submit_chat_line(&mut self) {
        let Some(line) = self.state.active_input_mut().map(|input| input.take()) else {
            return;
        };
        let store = self.store.as_ref().map(|store| store as &dyn ChatStore);

        CommandInterpreter::new(
            store,
            &mut self.session,
            &mut self.state,
            self.history_limit,
        )
        .execute(&line);
    }
}

impl<S> ShellOrchestrator for DefaultShellOrchestrator<S>
where
    S: ChatStore,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    /// Feed deliveries are applied before every event, so a steady stream of
    /// key presses never holds them back.
    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        self.drain_deliveries();

        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => {
                self.session.exit();
                self.state.stop();
            }
            AppEvent::InputKey(key) => self.handle_key(key),
        }

        Ok(())
    }
}
