use super::*;

impl App<Screen> {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Resize(_, _) => Ok(false),
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let on_form = matches!(self.view.kind, ScreenKind::Form);

        if key.code == KeyCode::Char('q') && ctrl {
            self.should_quit = true;
            return Ok(true);
        }

        if key.code == KeyCode::F(1) || key.code == KeyCode::Char('?') {
            self.show_help = !self.show_help;
            return Ok(false);
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return Ok(false);
        }

        if on_form {
            self.handle_form_key(key, ctrl);
        } else if key.code == KeyCode::Char('r') {
            self.reset_region();
        }

        Ok(false)
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Enter => {
                if !self.view.form.is_complete() {
                    self.last_error = Some("Both the API key and the region are required".to_string());
                    return;
                }
                let api_key = self.view.form.api_key.clone();
                let region = self.view.form.region.clone();
                self.submit(&api_key, &region);
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.view.form.toggle_field();
            }
            KeyCode::Backspace => {
                self.view.form.handle_backspace();
            }
            KeyCode::Char(c) if !ctrl => {
                self.view.form.handle_char(c);
            }
            _ => {}
        }
    }
}
