//! URL validator app: the debounced coordinator that wires core and engine
//! together, its configuration, and a console presentation layer.
mod error;
mod platform;

pub use error::AppError;
pub use platform::config::{config_path, load_config, parse_config, AppConfig};
pub use platform::console::run_app;
pub use platform::coordinator::Coordinator;
pub use platform::logging::{initialize as initialize_logging, LogDestination};
pub use platform::render::status_summary;
