pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Form:
  Tab / ↑ / ↓   Switch between API key and region
  Enter         Save and fetch carbon data
  Backspace     Delete last character

Results:
  r / Ctrl + R  Change region (keeps the API key)

General:
  ? / F1        Toggle this help
  Esc           Close help
  Ctrl + Q      Quit
"#
        .to_string()
    }

    pub fn hint(&self, reset_visible: bool) -> &'static str {
        if reset_visible {
            " [r] change region  [?] help  [Ctrl+Q] quit "
        } else {
            " [Tab] switch field  [Enter] submit  [?] help  [Ctrl+Q] quit "
        }
    }
}
