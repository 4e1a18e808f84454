//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Hydrated sessions land on the dashboard, so fetch it up front
        let initial = self.state.initial_fetch();
        self.send_commands(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    let follow_ups = self.state.handle_response(response);
                    self.send_commands(follow_ups);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send_commands(&mut self, commands: Vec<NetworkCommand>) {
        self.state.note_sent(commands.len());
        for cmd in commands {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab switching
            UiEvent::SwitchTab(tab) => {
                let cmds = self.state.switch_tab(tab);
                self.send_commands(cmds);
            }

            // List navigation
            UiEvent::NextItem => self.state.next_item(),
            UiEvent::PrevItem => self.state.prev_item(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Data actions
            UiEvent::Refresh => {
                let cmds = self.state.refresh();
                self.send_commands(cmds);
            }
            UiEvent::OpenCreateForm => self.state.open_create_form(),
            UiEvent::OpenEditForm => self.state.open_edit_form(),
            UiEvent::DeleteSelected => {
                let cmds = self.state.delete_selected();
                self.send_commands(cmds);
            }

            // Forms
            UiEvent::FormChar(c) => self.state.form_char(c),
            UiEvent::FormBackspace => self.state.form_backspace(),
            UiEvent::FormNextField => self.state.form_next_field(),
            UiEvent::FormPrevField => self.state.form_prev_field(),
            UiEvent::FormLeft | UiEvent::FormRight => self.state.form_cycle(),
            UiEvent::FormSubmit => {
                let cmds = self.state.form_submit();
                self.send_commands(cmds);
            }
            UiEvent::FormCancel => self.state.form_cancel(),
            UiEvent::ToggleAuthMode => self.state.toggle_auth_mode(),

            // Ledger filters
            UiEvent::CycleTypeFilter => self.state.cycle_type_filter(),
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::ClearSearch => self.state.clear_search(),

            // Session
            UiEvent::Logout => self.state.logout(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
