pub mod auth;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod sounds;
pub mod state;
pub mod store;
pub mod suggest;
pub mod timer;
pub mod tui;
pub mod utils;
pub mod views;

pub use config::Config;
pub use models::{Note, Priority, Task, User};
pub use state::{AppState, StatusFilter, Tab};
pub use store::Store;
pub use utils::Profile;
