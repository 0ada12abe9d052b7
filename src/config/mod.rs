mod settings;

pub use settings::{CacheSettings, ProviderSettings, RetrySettings, ServerSettings, Settings};
