use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string edits.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_reply().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // Back to typing
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
            app.input_cursor = app.input.chars().count();
        }

        KeyCode::Char('j') | KeyCode::Down => {
            if app.welcome_active() {
                app.action_nav_down();
            } else {
                app.scroll_down();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.welcome_active() {
                app.action_nav_up();
            } else {
                app.scroll_up();
            }
        }

        // Submit the highlighted quick action
        KeyCode::Enter => {
            if app.welcome_active() {
                app.submit_selected_action();
            }
        }

        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }

        // Alt+Enter inserts a literal newline; plain Enter submits.
        // With an empty draft on the welcome screen, Enter fires the
        // highlighted quick action instead.
        KeyCode::Enter => {
            if key.modifiers.contains(KeyModifiers::ALT) {
                insert_char(app, '\n');
            } else if app.input.trim().is_empty() && app.welcome_active() {
                app.submit_selected_action();
            } else {
                app.submit_input();
            }
        }

        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.input.chars().count();
        }

        // Quick-action selection while the welcome screen is up and the
        // draft is empty; otherwise arrows scroll the transcript.
        KeyCode::Up => {
            if app.welcome_active() && app.input.is_empty() {
                app.action_nav_up();
            } else {
                app.scroll_up();
            }
        }
        KeyCode::Down => {
            if app.welcome_active() && app.input.is_empty() {
                app.action_nav_down();
            } else {
                app.scroll_down();
            }
        }

        KeyCode::Char(c) => insert_char(app, c),

        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
    app.input.insert(byte_pos, c);
    app.input_cursor += 1;
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if app.welcome_active() {
                app.action_nav_down();
            } else {
                app.scroll_down();
                app.scroll_down();
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if app.welcome_active() {
                app.action_nav_up();
            } else {
                app.scroll_up();
                app.scroll_up();
                app.scroll_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut event = KeyEvent::new(code, modifiers);
        event.kind = KeyEventKind::Press;
        event
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_char_to_byte_index_on_cyrillic() {
        let s = "привет";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 3), 6); // 2 bytes per char
        assert_eq!(char_to_byte_index(s, 100), s.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_cursor_editing() {
        let mut app = App::new(Config::default());
        type_text(&mut app, "идея");
        assert_eq!(app.input, "идея");
        assert_eq!(app.input_cursor, 4);

        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "идя");
        assert_eq!(app.input_cursor, 2);

        handle_key(&mut app, key(KeyCode::End));
        assert_eq!(app.input_cursor, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_submits_and_alt_enter_inserts_newline() {
        let mut app = App::new(Config::default());
        type_text(&mut app, "первая строка");
        handle_key(&mut app, key_with(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut app, "вторая строка");
        assert_eq!(app.input, "первая строка\nвторая строка");
        assert!(app.conversation.is_empty());

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.input.is_empty());
        assert_eq!(app.conversation.messages().len(), 1);
        assert_eq!(
            app.conversation.messages()[0].content,
            "первая строка\nвторая строка"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_empty_welcome_fires_quick_action() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.conversation.messages().len(), 1);
        assert_eq!(
            app.conversation.messages()[0].content,
            crate::agent::QUICK_ACTIONS[1].prompt
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_esc_switches_to_normal_mode_and_q_quits() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_c_quits_in_editing_mode() {
        let mut app = App::new(Config::default());
        handle_key(&mut app, key_with(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_polls_the_pending_reply() {
        let mut app = App::new(Config::default());
        type_text(&mut app, "расскажи про цели");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.conversation.is_composing());

        while app.conversation.is_composing() {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            handle_event(&mut app, AppEvent::Tick).await.unwrap();
        }
        assert_eq!(app.conversation.messages().len(), 2);
    }
}
