//! Pieces shared by every `sac` binary: version string, help styling, log setup.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

const FALLBACK_LOG_FILTER: &str = "info";

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Parses `directive` as an env-filter, falling back to `info` when it does not parse.
pub fn log_filter(directive: &str) -> EnvFilter {
	EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_FILTER))
}

/// Installs the global fmt subscriber. Later calls are ignored.
pub fn init_tracing(directive: &str) {
	let _ = tracing_subscriber::fmt().with_env_filter(log_filter(directive)).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_carries_package_version() {
		assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
	}

	#[test]
	fn invalid_filters_fall_back_to_info() {
		let fallback = EnvFilter::new(FALLBACK_LOG_FILTER).to_string();

		assert_eq!(log_filter("sac_api=[").to_string(), fallback);
		assert_ne!(log_filter("sac_api=debug").to_string(), fallback);
	}
}
