use crate::input::{FormField, FormState};
use crate::report::RegionReport;

/// What the session controller can ask of the user interface.
pub trait View {
    /// Show the credential form, pre-filling the API key when one is stored.
    fn show_form(&mut self, prefill_api_key: Option<&str>);
    fn show_loading(&mut self);
    fn show_result(&mut self, report: &RegionReport);
    fn show_error(&mut self, message: &str);
    fn clear_region_input(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenKind {
    Form,
    Loading,
    Result(RegionReport),
    Error(String),
}

/// Terminal adapter for [`View`]; `render` draws whatever this holds.
#[derive(Debug, Clone)]
pub struct Screen {
    pub kind: ScreenKind,
    pub form: FormState,
    pub reset_visible: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            kind: ScreenKind::Form,
            form: FormState::new(),
            reset_visible: false,
        }
    }
}

impl Screen {
    pub fn error_text(&self) -> Option<&str> {
        match self.kind {
            ScreenKind::Error(ref message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&RegionReport> {
        match self.kind {
            ScreenKind::Result(ref report) => Some(report),
            _ => None,
        }
    }
}

impl View for Screen {
    fn show_form(&mut self, prefill_api_key: Option<&str>) {
        self.kind = ScreenKind::Form;
        self.reset_visible = false;
        if let Some(api_key) = prefill_api_key {
            self.form.api_key = api_key.to_string();
            self.form.focused = FormField::Region;
        }
    }

    fn show_loading(&mut self) {
        self.kind = ScreenKind::Loading;
        self.reset_visible = true;
    }

    fn show_result(&mut self, report: &RegionReport) {
        self.kind = ScreenKind::Result(report.clone());
        self.reset_visible = true;
    }

    fn show_error(&mut self, message: &str) {
        self.kind = ScreenKind::Error(message.to_string());
        self.reset_visible = true;
    }

    fn clear_region_input(&mut self) {
        self.form.region.clear();
    }
}
