use super::*;

/// Fetches the latest reading and, when enabled, a friendly region label.
///
/// Only the reading decides success: a failing zone lookup falls back to the
/// raw region code.
pub async fn resolve_report(
    api: &dyn SignalApi,
    resolve_zone_names: bool,
    api_key: &str,
    region_code: &str,
) -> ApiResult<RegionReport> {
    let reading = api.latest(api_key, region_code).await?;

    let region_label = if resolve_zone_names {
        match api.zones().await {
            Ok(table) => zone_label(&table, region_code),
            Err(e) => {
                tracing::warn!(region = region_code, "zone lookup failed: {e}");
                region_code.to_string()
            }
        }
    } else {
        region_code.to_string()
    };

    Ok(RegionReport::new(region_code, region_label, &reading))
}

impl<V: View> App<V> {
    /// Applies every finished fetch without blocking.
    pub fn process_async_events(&mut self) {
        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            self.apply_async_event(event);
        }
    }

    /// Waits for the next finished fetch and applies it. Returns `false` when
    /// the channel is gone.
    pub async fn settle(&mut self) -> bool {
        let event = match self.app_async_rx {
            Some(ref mut rx) => rx.recv().await,
            None => None,
        };
        match event {
            Some(event) => {
                self.apply_async_event(event);
                true
            }
            None => false,
        }
    }

    fn apply_async_event(&mut self, event: AppAsyncEvent) {
        match event {
            AppAsyncEvent::ReportFinished {
                region_code,
                outcome,
            } => {
                self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                match outcome {
                    Ok(report) => {
                        tracing::info!(
                            region = %region_code,
                            band = report.band.label(),
                            "carbon data loaded"
                        );
                        self.view.show_result(&report);
                    }
                    Err(e) => {
                        let details = self.redact_sensitive(&e.to_string());
                        tracing::error!(region = %region_code, "fetch failed: {details}");
                        if e.is_auth_failure() {
                            tracing::warn!("API key rejected; press r and submit a new one");
                        }
                        self.last_error = Some(e.user_message().to_string());
                        self.view.show_error(&no_data_message(&region_code));
                    }
                }
            }
        }
    }
}
