//! Logging utilities

/// Initialize the logging system
///
/// Panics if a logger was already installed; use [`try_init`] from tests.
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring an already installed logger
pub fn try_init() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
