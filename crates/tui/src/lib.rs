pub mod app;
pub mod config;
pub mod input;
pub mod keybinds;
pub mod logging;
pub mod report;
pub mod view;

pub use app::App;
pub use config::Config;
pub use view::{Screen, View};
