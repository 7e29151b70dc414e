mod description;
mod error;
mod predicate;
mod resolver;
mod tracking;


pub use description::{LaunchDescription, LaunchEntry};
pub use error::{ConfigError, Result};
pub use predicate::{Environment, Predicate};
pub use resolver::ConfigResolver;
pub use tracking::{TRACKING_FRAME_VARIABLE, extract_string_assignment};
