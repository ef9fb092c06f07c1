use super::*;

impl<V: View> App<V> {
    /// Recomputes the view from the persisted credential. Shows the form
    /// unless both entries are stored, in which case a fetch starts.
    pub fn initialize(&mut self) {
        self.clear_error();
        self.show_stored_state();
    }

    fn show_stored_state(&mut self) {
        let credential = match Credential::load(self.store.as_ref()) {
            Ok(credential) => credential,
            Err(e) => {
                self.report_error("Failed to read stored credentials", e);
                Credential::default()
            }
        };

        match credential.complete() {
            Some((api_key, region_code)) => {
                let (api_key, region_code) = (api_key.to_string(), region_code.to_string());
                tracing::info!(region = %region_code, "stored credentials found, fetching");
                self.view.show_loading();
                self.fetch_and_display(api_key, region_code);
            }
            None => {
                self.view.show_form(credential.api_key.as_deref());
            }
        }
    }

    /// Persists both inputs as the new credential and starts a fetch with them.
    pub fn submit(&mut self, api_key: &str, region_code: &str) {
        if let Err(e) = Credential::save(self.store.as_mut(), api_key, region_code) {
            self.report_error("Failed to save credentials", e);
        } else {
            self.clear_error();
        }

        tracing::info!(region = %region_code, "credentials submitted");
        self.view.show_loading();
        self.fetch_and_display(api_key.to_string(), region_code.to_string());
    }

    /// Forgets the stored region only, then returns to the form.
    pub fn reset_region(&mut self) {
        self.clear_error();
        if let Err(e) = Credential::clear_region(self.store.as_mut()) {
            self.report_error("Failed to clear stored region", e);
        }

        self.view.clear_region_input();
        self.show_stored_state();
    }

    /// One-shot fetch; the outcome arrives as [`AppAsyncEvent::ReportFinished`].
    pub(super) fn fetch_and_display(&mut self, api_key: String, region_code: String) {
        let api = Arc::clone(&self.api);
        let resolve_zone_names = self.config.api.resolve_zone_names;

        self.fetches_in_flight += 1;
        self.spawn_app_task(async move {
            let outcome =
                resolve_report(api.as_ref(), resolve_zone_names, &api_key, &region_code).await;
            AppAsyncEvent::ReportFinished {
                region_code,
                outcome,
            }
        });
    }
}
