//! # Config Commands
//!
//! Retrieves application configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - `config` form command
/// - Currency formatting and the tax rate shown under the totals
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
