#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ApiKey,
    Region,
}

/// The two text inputs of the credential form.
#[derive(Debug, Clone)]
pub struct FormState {
    pub api_key: String,
    pub region: String,
    pub focused: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            api_key: String::new(),
            region: String::new(),
            focused: FormField::ApiKey,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.focused_value_mut().push(c);
    }

    pub fn handle_backspace(&mut self) {
        self.focused_value_mut().pop();
    }

    pub fn toggle_field(&mut self) {
        self.focused = match self.focused {
            FormField::ApiKey => FormField::Region,
            FormField::Region => FormField::ApiKey,
        };
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focused {
            FormField::ApiKey => &mut self.api_key,
            FormField::Region => &mut self.region,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.region.is_empty()
    }

    pub fn masked_api_key(&self) -> String {
        "*".repeat(self.api_key.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = FormState::new();
        form.handle_char('k');
        form.toggle_field();
        form.handle_char('D');
        form.handle_char('K');
        form.handle_backspace();

        assert_eq!(form.api_key, "k");
        assert_eq!(form.region, "D");
        assert!(form.is_complete());
    }

    #[test]
    fn mask_hides_every_character() {
        let mut form = FormState::new();
        form.api_key = "abç".to_string();
        assert_eq!(form.masked_api_key(), "***");
    }
}
