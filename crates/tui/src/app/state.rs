use super::*;

/// Session controller: owns the persisted credential, drives the view and
/// launches fetch cycles.
pub struct App<V: View = Screen> {
    pub should_quit: bool,
    pub config: Config,
    pub view: V,
    pub keybinds: Keybinds,
    pub show_help: bool,
    pub last_error: Option<String>,
    pub(super) store: Box<dyn KeyValueStore>,
    pub(super) api: Arc<dyn SignalApi>,
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
    pub(super) fetches_in_flight: usize,
}

impl<V: View> App<V> {
    pub fn new(
        config: Config,
        view: V,
        store: Box<dyn KeyValueStore>,
        api: Arc<dyn SignalApi>,
    ) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            config,
            view,
            keybinds: Keybinds,
            show_help: false,
            last_error: None,
            store,
            api,
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
            fetches_in_flight: 0,
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetches_in_flight > 0
    }
}
