// Application Layer - Use Cases

pub mod handle_provider;
pub mod time_ago;

// Re-exports
pub use handle_provider::DatabaseHandleProvider;
pub use time_ago::{time_ago, time_ago_millis, RelativeTimeFormatter};
