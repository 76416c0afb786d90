use std::sync::Arc;

use chatline_models::{Message, MessageKind, Role, StatusMode};
use chatline_sdk::ChatBackend;
use chatline_widget::{
    wrap, ChatWidget, InputOutcome, Key, KeyInput, WidgetConfig, STATUS_LOADING,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::AppController;
use crate::tui::Action;

/// Rows scrolled per PageUp / PageDown.
const SCROLL_STEP: usize = 5;

/// What a terminal key press means to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppKey {
    Quit,
    ScrollUp,
    ScrollDown,
    ClearLog,
    Input(KeyInput),
}

fn map_key(key: KeyEvent) -> AppKey {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc => AppKey::Quit,
        KeyCode::Char('c') if ctrl => AppKey::Quit,
        KeyCode::Char('l') if ctrl => AppKey::ClearLog,
        KeyCode::PageUp => AppKey::ScrollUp,
        KeyCode::PageDown => AppKey::ScrollDown,
        // Alt+Enter for terminals that cannot report Shift+Enter.
        KeyCode::Enter if shift || key.modifiers.contains(KeyModifiers::ALT) => {
            AppKey::Input(KeyInput::shifted(Key::Enter))
        }
        KeyCode::Enter => AppKey::Input(KeyInput::plain(Key::Enter)),
        KeyCode::Backspace => AppKey::Input(KeyInput::plain(Key::Backspace)),
        KeyCode::Char(c) if !ctrl => AppKey::Input(KeyInput { key: Key::Char(c), shift }),
        _ => AppKey::Input(KeyInput::plain(Key::Other)),
    }
}

pub struct ChatApp<B> {
    widget: ChatWidget,
    backend: Arc<B>,
    tx: UnboundedSender<Action>,
    should_quit: bool,
    /// Advances on every tick; animates the typing indicator.
    tick: usize,
}

impl<B: ChatBackend + 'static> ChatApp<B> {
    pub fn new(config: WidgetConfig, backend: Arc<B>, tx: UnboundedSender<Action>) -> Self {
        Self {
            widget: ChatWidget::new(config),
            backend,
            tx,
            should_quit: false,
            tick: 0,
        }
    }

    /// Fetch the backend status once, in the background.
    pub fn load_status(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.status().await;
            let _ = tx.send(Action::StatusLoaded(result));
        });
    }

    fn start_send(&mut self) {
        let pending = match self.widget.begin_send() {
            Ok(pending) => pending,
            Err(skipped) => {
                debug!(reason = %skipped, "send skipped");
                return;
            }
        };

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.chat(&pending.text).await;
            let _ = tx.send(Action::ChatSettled {
                token: pending.token,
                result,
            });
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match map_key(key) {
            AppKey::Quit => self.should_quit = true,
            AppKey::ScrollUp => self.widget.log_mut().scroll_up(SCROLL_STEP),
            AppKey::ScrollDown => self.widget.log_mut().scroll_down(SCROLL_STEP),
            AppKey::ClearLog => self.widget.clear_log(),
            AppKey::Input(input) => {
                if self.widget.on_input_key(input) == InputOutcome::Submit {
                    self.start_send();
                }
            }
        }
    }

    fn status_color(&self) -> Color {
        match self.widget.status_mode() {
            Some(StatusMode::Sdk) => Color::Green,
            Some(StatusMode::Rest) => Color::Yellow,
            Some(StatusMode::Local) => Color::LightRed,
            None if self.widget.status_label() == STATUS_LOADING => Color::DarkGray,
            None => Color::Red,
        }
    }

    fn message_lines(&self, message: &Message, width: usize) -> Vec<Line<'static>> {
        let prefix = format!("{} ", message.role.avatar());
        let indent = " ".repeat(prefix.chars().count() + 1);
        let text = if message.is_typing() {
            format!("typing{}", ".".repeat(self.tick % 4))
        } else {
            message.text.clone()
        };
        let style = message_style(message.role, message.kind);

        let body_width = width.saturating_sub(indent.len()).max(1);
        wrap(&text, body_width)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let lead = if i == 0 { prefix.clone() } else { indent.clone() };
                Line::from(vec![Span::raw(lead), Span::styled(chunk, style)])
            })
            .collect()
    }

    fn render_log(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Chat");
        let inner_width = usize::from(area.width.saturating_sub(2));
        let inner_height = usize::from(area.height.saturating_sub(2));

        if let Some(placeholder) = self.widget.log().placeholder() {
            let hint = Paragraph::new(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
            .block(block);
            f.render_widget(hint, area);
            return;
        }

        let log = self.widget.log();
        let visible = log.len().saturating_sub(log.scroll_back());
        let mut lines: Vec<Line> = log.messages()[..visible]
            .iter()
            .flat_map(|m| self.message_lines(m, inner_width))
            .collect();
        if lines.len() > inner_height {
            lines.drain(..lines.len() - inner_height);
        }

        let title = if log.scroll_back() > 0 {
            format!("Chat (↓ {} newer)", log.scroll_back())
        } else {
            "Chat".to_string()
        };
        f.render_widget(Paragraph::new(lines).block(block.title(title)), area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let input = self.widget.input();
        let (title, style) = if input.is_enabled() {
            (
                "Message (Enter send · Shift/Alt+Enter newline · Esc quit)",
                Style::default().fg(Color::Yellow),
            )
        } else {
            ("Sending…", Style::default().fg(Color::DarkGray))
        };

        let inner_width = usize::from(area.width.saturating_sub(2));
        let wrapped = wrap(input.text(), inner_width);
        let rows = usize::from(input.rows_for_width(inner_width));
        let skip = wrapped.len().saturating_sub(rows);
        let shown: Vec<Line> = wrapped.into_iter().skip(skip).map(Line::from).collect();

        let cursor = shown.last().map_or(0, |l| l.width());
        let cursor_row = shown.len().saturating_sub(1);

        let paragraph = Paragraph::new(shown)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, area);

        if input.is_enabled() && input.is_focused() {
            let col = u16::try_from(cursor).unwrap_or(u16::MAX);
            let row = u16::try_from(cursor_row).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(1).saturating_add(col).min(area.right().saturating_sub(2));
            let y = area.y.saturating_add(1).saturating_add(row);
            f.set_cursor_position((x, y));
        }
    }
}

impl<B: ChatBackend + 'static> AppController for ChatApp<B> {
    fn update(&mut self, action: Action) {
        match action {
            Action::Tick => self.tick = self.tick.wrapping_add(1),
            Action::Resize(..) => {}
            Action::Key(key) => self.handle_key(key),
            Action::StatusLoaded(result) => self.widget.apply_status(&result),
            Action::ChatSettled { token, result } => {
                if let Some(notice) = self.widget.finish_send(token, result) {
                    let due = tokio::time::Instant::now() + self.widget.config().fallback_delay;
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep_until(due).await;
                        let _ = tx.send(Action::FallbackDue(notice));
                    });
                }
            }
            Action::FallbackDue(notice) => self.widget.show_fallback(&notice),
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let input_width = usize::from(f.area().width.saturating_sub(2));
        let input_height = self
            .widget
            .input()
            .rows_for_width(input_width)
            .saturating_add(2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(input_height),
            ])
            .split(f.area());

        let header = Paragraph::new(Line::from(vec![Span::styled(
            self.widget.status_label().to_string(),
            Style::default()
                .fg(self.status_color())
                .add_modifier(Modifier::BOLD),
        )]))
        .block(Block::default().borders(Borders::ALL).title("Chatline"));
        f.render_widget(header, chunks[0]);

        self.render_log(f, chunks[1]);
        self.render_input(f, chunks[2]);
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

fn message_style(role: Role, kind: MessageKind) -> Style {
    match (role, kind) {
        (_, MessageKind::Error) => Style::default().fg(Color::Red),
        (_, MessageKind::Info) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),
        (_, MessageKind::Typing) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        (Role::User, MessageKind::Normal) => Style::default().fg(Color::Green),
        (Role::Bot, MessageKind::Normal) => Style::default().fg(Color::Cyan),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chatline_models::{ChatErrorBody, ChatOutcome, StatusSnapshot};
    use chatline_sdk::SdkError;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    use super::*;

    struct EchoBackend {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ChatBackend for EchoBackend {
        async fn status(&self) -> Result<StatusSnapshot, SdkError> {
            Ok(StatusSnapshot {
                mode: Some("rest".into()),
                ..Default::default()
            })
        }

        async fn chat(&self, message: &str) -> Result<ChatOutcome, SdkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChatOutcome::Reply(format!("echo: {message}")))
        }
    }

    fn app() -> (ChatApp<EchoBackend>, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(EchoBackend {
            calls: AtomicUsize::new(0),
        });
        (ChatApp::new(WidgetConfig::default(), backend, tx), rx)
    }

    fn press(app: &mut ChatApp<EchoBackend>, code: KeyCode, modifiers: KeyModifiers) {
        app.update(Action::Key(KeyEvent::new(code, modifiers)));
    }

    fn type_str(app: &mut ChatApp<EchoBackend>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn screen(app: &mut ChatApp<EchoBackend>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 16)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn key_mapping() {
        let k = |code, m| map_key(KeyEvent::new(code, m));
        assert_eq!(k(KeyCode::Esc, KeyModifiers::NONE), AppKey::Quit);
        assert_eq!(k(KeyCode::Char('c'), KeyModifiers::CONTROL), AppKey::Quit);
        assert_eq!(k(KeyCode::Char('l'), KeyModifiers::CONTROL), AppKey::ClearLog);
        assert_eq!(
            k(KeyCode::Enter, KeyModifiers::NONE),
            AppKey::Input(KeyInput::plain(Key::Enter))
        );
        assert_eq!(
            k(KeyCode::Enter, KeyModifiers::SHIFT),
            AppKey::Input(KeyInput::shifted(Key::Enter))
        );
        assert_eq!(
            k(KeyCode::Enter, KeyModifiers::ALT),
            AppKey::Input(KeyInput::shifted(Key::Enter))
        );
        assert_eq!(
            k(KeyCode::Char('A'), KeyModifiers::SHIFT),
            AppKey::Input(KeyInput::shifted(Key::Char('A')))
        );
    }

    #[tokio::test]
    async fn enter_sends_and_reply_arrives_as_action() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "hola");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        let log = app.widget.log().messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "hola");
        assert!(log[1].is_typing());
        assert!(!app.widget.controls_enabled());

        let settled = rx.recv().await.unwrap();
        assert!(matches!(settled, Action::ChatSettled { .. }));
        app.update(settled);

        let log = app.widget.log().messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].text, "echo: hola");
        assert!(app.widget.controls_enabled());
        assert_eq!(app.backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn enter_on_blank_input_sends_nothing() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.widget.log().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn status_is_loaded_in_background() {
        let (mut app, mut rx) = app();
        app.load_status();
        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        assert_eq!(app.widget.status_label(), "Status: REST API");
        assert!(screen(&mut app).contains("Status: REST API"));
    }

    #[tokio::test]
    async fn render_shows_placeholder_then_messages() {
        let (mut app, mut rx) = app();
        assert!(screen(&mut app).contains("No messages yet"));

        type_str(&mut app, "hi");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(screen(&mut app).contains("Sending"));

        let settled = rx.recv().await.unwrap();
        app.update(settled);
        let text = screen(&mut app);
        assert!(text.contains("echo: hi"));
        assert!(!text.contains("No messages yet"));
    }

    #[tokio::test]
    async fn long_line_wraps_and_grows_input() {
        let (mut app, _rx) = app();
        type_str(&mut app, &format!("{}ZZEND", "a".repeat(90)));

        assert_eq!(app.widget.input().rows_for_width(68), 2);
        let text = screen(&mut app);
        assert!(text.contains("ZZEND"));
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_arrives_after_configured_delay() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "hola");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        let Some(Action::ChatSettled { token, .. }) = rx.recv().await else {
            panic!("expected a settled chat request");
        };
        let body = ChatErrorBody {
            error: Some("boom".into()),
            fallback_reply: Some("local answer".into()),
            ..ChatErrorBody::default()
        };
        app.update(Action::ChatSettled {
            token,
            result: Ok(ChatOutcome::Rejected { status: 500, body }),
        });

        let kinds = |app: &ChatApp<EchoBackend>| -> Vec<MessageKind> {
            app.widget.log().messages().iter().map(|m| m.kind).collect()
        };
        assert_eq!(kinds(&app), vec![MessageKind::Normal, MessageKind::Error]);

        let delay = app.widget.config().fallback_delay;
        let early = tokio::time::timeout(delay - Duration::from_millis(1), rx.recv()).await;
        assert!(early.is_err());
        assert_eq!(kinds(&app), vec![MessageKind::Normal, MessageKind::Error]);

        let due = rx.recv().await.unwrap();
        assert!(matches!(due, Action::FallbackDue(_)));
        app.update(due);
        assert_eq!(
            kinds(&app),
            vec![MessageKind::Normal, MessageKind::Error, MessageKind::Info]
        );
        assert!(screen(&mut app).contains("Fallback answer: local answer"));
    }

    #[tokio::test]
    async fn ctrl_l_keeps_typing_indicator_while_sending() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "hola");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);

        let log = app.widget.log().messages();
        assert_eq!(log.len(), 1);
        assert!(log[0].is_typing());

        let settled = rx.recv().await.unwrap();
        app.update(settled);
        let log = app.widget.log().messages();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].text, "echo: hola");
    }

    #[test]
    fn escape_quits() {
        let (mut app, _rx) = app();
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit());
    }
}
