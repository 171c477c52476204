//! Logger bootstrap.
//!
//! All modules log through the `log` facade. In the browser the records go to
//! the devtools console via `console_log`; native builds pick up whatever
//! logger the host installed (none in tests).

use log::LevelFilter;

/// Install the console logger at `level`. Safe to call more than once.
pub fn init(level: LevelFilter) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(level) = level.to_level() {
            if console_log::init_with_level(level).is_err() {
                leptos::logging::warn!("console logger already installed");
            }
        }
    }
    log::set_max_level(level);
}
