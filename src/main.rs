//! Tally TUI - terminal client for a personal finance tracker API
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use tally_tui::app::state::{AccountField, AuthField, TxField};
use tally_tui::constants::{API_URL_ENV, DEFAULT_API_URL};
use tally_tui::messages::ui_events::{key_to_ui_event, AppTab, AuthMode, InputMode, Screen};
use tally_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use tally_tui::models::TransactionType;
use tally_tui::ui::{amount_sign, format_currency, format_date, month_name, type_color};
use tally_tui::{AppActor, AppState, NetworkActor, SessionStore, TokenStore};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "tally.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    tracing::info!(%base_url, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, base_url);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor with a session hydrated from the persisted token
    let session = SessionStore::hydrate(TokenStore::new());
    let app_actor = AppActor::new(AppState::new(session), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    match state.screen {
        Screen::Auth => draw_auth_screen(f, state, area),
        Screen::Main => draw_main_screen(f, state, area),
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

// ----------------------------------------------------------------------------
// Auth screen
// ----------------------------------------------------------------------------

fn draw_auth_screen(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup = centered_rect(50, 60, area);
    let form = &state.auth_form;

    let title = match form.mode {
        AuthMode::Login => " Tally - Sign in ",
        AuthMode::Register => " Tally - Create account ",
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let field_count = if form.mode == AuthMode::Register { 3 } else { 2 };
    let mut constraints = vec![Constraint::Length(3); field_count];
    constraints.push(Constraint::Length(2)); // error line
    constraints.push(Constraint::Min(1)); // hints
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut row = 0;
    draw_auth_field(f, rows[row], "Username", &form.username, form.field == AuthField::Username, false);
    row += 1;
    if form.mode == AuthMode::Register {
        draw_auth_field(f, rows[row], "Email", &form.email, form.field == AuthField::Email, false);
        row += 1;
    }
    draw_auth_field(f, rows[row], "Password", &form.password, form.field == AuthField::Password, true);
    row += 1;

    // Form validation error, or the session's auth error
    let error = form.error.as_deref().or(state.auth_error.as_deref());
    if let Some(error) = error {
        let msg = Paragraph::new(error).style(Style::default().fg(Color::Red));
        f.render_widget(msg, rows[row]);
    } else if state.is_loading {
        let msg = Paragraph::new("Signing in...").style(Style::default().fg(Color::Yellow));
        f.render_widget(msg, rows[row]);
    }
    row += 1;

    let hint = match form.mode {
        AuthMode::Login => " Enter:sign in | Tab:next field | Ctrl+T:register | Esc:quit ",
        AuthMode::Register => " Enter:create | Tab:next field | Ctrl+T:sign in | Esc:quit ",
    };
    let hints = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, rows[row]);
}

fn draw_auth_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    focused: bool,
    masked: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let display = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "));
    f.render_widget(Paragraph::new(display.as_str()).block(block), area);

    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + display.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

// ----------------------------------------------------------------------------
// Main screen
// ----------------------------------------------------------------------------

fn draw_main_screen(f: &mut Frame, state: &RenderState, area: Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.active_tab {
        AppTab::Dashboard => draw_dashboard_tab(f, state, main_chunks[1]),
        AppTab::Accounts => draw_accounts_tab(f, state, main_chunks[1]),
        AppTab::Transactions => draw_transactions_tab(f, state, main_chunks[1]),
        AppTab::Reports => draw_reports_tab(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if let Some(form) = &state.account_form {
        draw_account_form_popup(f, form, area);
    }
    if let Some(form) = &state.transaction_form {
        draw_transaction_form_popup(f, state, form, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        } else {
            Span::styled(label, Style::default().fg(Color::Gray))
        }
    };

    let mut spans = vec![
        tab(" 1:Dashboard ", state.active_tab == AppTab::Dashboard),
        Span::raw(" "),
        tab(" 2:Accounts ", state.active_tab == AppTab::Accounts),
        Span::raw(" "),
        tab(" 3:Transactions ", state.active_tab == AppTab::Transactions),
        Span::raw(" "),
        tab(" 4:Reports ", state.active_tab == AppTab::Reports),
    ];
    if let Some(user) = &state.user {
        spans.push(Span::styled(
            format!("  [{}]", user.username),
            Style::default().fg(Color::Green),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_dashboard_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let Some(data) = &state.dashboard else {
        let block = Block::default().borders(Borders::ALL).title(" Dashboard ");
        let msg = if state.is_loading {
            "Loading..."
        } else {
            "No dashboard data. Press 'r' to refresh."
        };
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    };

    // Total balance banner
    let balance_style = if data.total_balance < 0.0 {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };
    let total = Paragraph::new(Line::from(vec![
        Span::raw(" Total balance: "),
        Span::styled(format_currency(data.total_balance), balance_style),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(total, chunks[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    // Accounts summary
    let account_items: Vec<ListItem> = data
        .accounts
        .iter()
        .map(|a| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<20}", a.name)),
                Span::styled(
                    format_currency(a.balance),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();
    let accounts = List::new(account_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Accounts ({}) ", data.accounts.len())),
    );
    f.render_widget(accounts, halves[0]);

    // Recent transactions
    let tx_items: Vec<ListItem> = data
        .recent_transactions
        .iter()
        .map(|tx| ListItem::new(transaction_line(tx)))
        .collect();
    let recent = List::new(tx_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent transactions "),
    );
    f.render_widget(recent, halves[1]);
}

fn draw_accounts_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .accounts
        .iter()
        .map(|a| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<24}", a.name)),
                Span::styled(
                    format!("{:>14}", format_currency(a.balance)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("  opened {}", format_date(&a.created_at)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Accounts (n:new e:rename d:delete r:refresh) "),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    if empty {
        let msg = Paragraph::new("No accounts yet. Press 'n' to create one.")
            .block(Block::default().borders(Borders::ALL).title(" Accounts "))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_account));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_transactions_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    // Filter bar; stays highlighted while a filter narrows the ledger
    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else if state.filter.is_active() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let filter_line = Line::from(vec![
        Span::raw(" type: "),
        Span::styled(
            state.filter.kind.as_str(),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::raw("  search: "),
        Span::styled(
            if state.filter.query.is_empty() && !state.searching {
                "<none>".to_string()
            } else {
                state.filter.query.clone()
            },
            search_style,
        ),
    ]);
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(search_style)
        .title(" Filter (f:type /:search c:clear) ");
    f.render_widget(Paragraph::new(filter_line).block(filter_block), chunks[0]);

    // Ledger
    let items: Vec<ListItem> = state
        .visible_transactions
        .iter()
        .filter_map(|&i| state.transactions.get(i))
        .map(|tx| ListItem::new(transaction_line(tx)))
        .collect();

    let title = format!(
        " Ledger {}/{} (n:new d:delete r:refresh) ",
        state.visible_transactions.len(),
        state.transactions.len()
    );

    if items.is_empty() {
        let msg = if state.transactions.is_empty() {
            "No transactions yet. Press 'n' to create one."
        } else {
            "No transactions match the current filter."
        };
        let empty = Paragraph::new(msg)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_transaction));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

/// One ledger row: date, account, kind, description, signed amount
fn transaction_line(tx: &tally_tui::models::Transaction) -> Line<'static> {
    let color = type_color(tx.kind);
    let mut description = tx.description.clone();
    if tx.kind == TransactionType::Transfer {
        if let Some(target) = &tx.transfer_to_account_name {
            description = format!("{description} -> {target}");
        }
    }
    Line::from(vec![
        Span::styled(
            format!("{:<13}", format_date(&tx.created_at)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{:<16}", tx.account_name)),
        Span::styled(format!("{:<9}", tx.kind.as_str()), Style::default().fg(color)),
        Span::raw(format!("{:<28}", description)),
        Span::styled(
            format!("{}{}", amount_sign(tx.kind), format_currency(tx.amount)),
            Style::default().fg(color),
        ),
    ])
}

fn draw_reports_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Monthly summary (r:refresh) ");

    let Some(data) = &state.dashboard else {
        let msg = if state.is_loading {
            "Loading..."
        } else {
            "No report data. Press 'r' to refresh."
        };
        f.render_widget(
            Paragraph::new(msg)
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    if data.monthly_summary.is_empty() {
        f.render_widget(
            Paragraph::new("No monthly data yet.")
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let lines: Vec<Line> = data
        .monthly_summary
        .iter()
        .map(|row| {
            let color = type_color(row.kind);
            Line::from(vec![
                Span::raw(format!("{:<10} {:<6}", month_name(row.month), row.year)),
                Span::styled(format!("{:<9}", row.kind.as_str()), Style::default().fg(color)),
                Span::styled(
                    format!("{:>14}", format_currency(row.total)),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();

    let report = Paragraph::new(lines).block(block).scroll((state.scroll, 0));
    f.render_widget(report, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(status) = &state.status {
        let style = if status.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        let bar = Paragraph::new(format!(" {}", status.message)).style(style);
        f.render_widget(bar, area);
        return;
    }

    let status = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:cancel | Enter:submit | Tab:next field "
    } else {
        " 1-4:tabs | Up/Down:select | n:new | d:delete | r:refresh | x:logout | ?:help | q:quit "
    };
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

// ----------------------------------------------------------------------------
// Form popups
// ----------------------------------------------------------------------------

fn draw_account_form_popup(
    f: &mut Frame,
    form: &tally_tui::app::state::AccountForm,
    area: Rect,
) {
    let popup = centered_rect(50, 40, area);
    let title = if form.is_rename() {
        " Rename account (Enter:save, Esc:cancel) "
    } else {
        " New account (Enter:save, Esc:cancel) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    draw_auth_field(f, rows[0], "Name", &form.name, form.field == AccountField::Name, false);
    if !form.is_rename() {
        draw_auth_field(
            f,
            rows[1],
            "Opening balance",
            &form.balance,
            form.field == AccountField::Balance,
            false,
        );
    }
    if let Some(error) = &form.error {
        let msg = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(msg, rows[2]);
    }
}

fn draw_transaction_form_popup(
    f: &mut Frame,
    state: &RenderState,
    form: &tally_tui::app::state::TransactionForm,
    area: Rect,
) {
    let popup = centered_rect(60, 70, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New transaction (Enter:save, Esc:cancel, Left/Right:cycle) ")
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let account_name = |idx: usize| {
        state
            .accounts
            .get(idx)
            .map(|a| format!("{} ({})", a.name, format_currency(a.balance)))
            .unwrap_or_else(|| "<none>".to_string())
    };

    let from_label = if form.kind == TransactionType::Transfer {
        "From account"
    } else {
        "Account"
    };
    draw_choice_field(
        f,
        rows[0],
        from_label,
        &account_name(form.account_idx),
        form.field == TxField::Account,
    );
    draw_choice_field(
        f,
        rows[1],
        "Type",
        form.kind.as_str(),
        form.field == TxField::Kind,
    );
    draw_auth_field(f, rows[2], "Amount", &form.amount, form.field == TxField::Amount, false);
    draw_auth_field(
        f,
        rows[3],
        "Description",
        &form.description,
        form.field == TxField::Description,
        false,
    );
    if form.kind == TransactionType::Transfer {
        draw_choice_field(
            f,
            rows[4],
            "To account",
            &account_name(form.transfer_idx),
            form.field == TxField::TransferTo,
        );
    }
    if let Some(error) = &form.error {
        let msg = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(msg, rows[5]);
    }
}

/// A cycled (non-typed) selection field
fn draw_choice_field(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "));
    let display = format!("< {value} >");
    f.render_widget(Paragraph::new(display).block(block), area);
}

// ----------------------------------------------------------------------------
// Help popup
// ----------------------------------------------------------------------------

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TALLY TUI - Keyboard Shortcuts

 NAVIGATION
   1 / 2 / 3 / 4      Switch tab
   Up / Down          Select list item
   PgUp / PgDn        Scroll reports

 DATA
   r                  Refresh current tab
   n                  New account / transaction
   e                  Rename selected account
   d                  Delete selected item

 LEDGER FILTERS
   f                  Cycle type filter
   /                  Search description / account
   c                  Clear filters

 SESSION
   x                  Log out
   Ctrl+T             Toggle login / register (auth screen)

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
