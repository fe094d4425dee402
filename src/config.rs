use anyhow::Error;
use confique::Config;
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, Config)]
pub struct PromStashConfig {
    /// Connection string selecting and configuring the storage backend.
    /// The scheme prefix picks the backend, query parameters tune it,
    /// e.g. `memory://?max_series=100000`.
    #[config(env = "PROMSTASH_STORAGE_CONNECTION_STRING", default = "memory://")]
    pub storage_connection_string: String,
}

impl PromStashConfig {
    pub fn load() -> Result<PromStashConfig, Error> {
        let c = PromStashConfig::builder()
            .env()
            .file("settings.toml")
            .load()?;

        Ok(c)
    }
}

static PROMSTASH_CONFIG: OnceLock<Arc<PromStashConfig>> = OnceLock::new();

pub fn get() -> Result<Arc<PromStashConfig>, Error> {
    PROMSTASH_CONFIG.get().cloned().ok_or_else(|| {
        Error::msg(
            "Configuration not loaded. Please call load_configuration() before using the configuration",
        )
    })
}

pub fn load_configuration() -> Result<(), Error> {
    // Check if the configuration has already been loaded
    if PROMSTASH_CONFIG.get().is_some() {
        return Ok(());
    }

    // Load configuration
    let config = PromStashConfig::load()?;
    PROMSTASH_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}

// Used by integration tests - must be always available for test compilation
#[allow(dead_code)] // Used by integration tests, not visible in cargo check
static TEST_CONFIG_INIT: Mutex<()> = Mutex::new(());

/// Test-only function to ensure configuration is loaded exactly once per test run
/// Available for both unit tests and integration tests
#[allow(dead_code)] // Used by integration tests, not visible in cargo check
pub fn load_configuration_for_tests() -> Result<(), Error> {
    let _guard = TEST_CONFIG_INIT.lock().unwrap();

    // If config is already loaded, return success
    if PROMSTASH_CONFIG.get().is_some() {
        return Ok(());
    }

    // Load default configuration for tests
    let config = PromStashConfig::load()?;
    PROMSTASH_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}
