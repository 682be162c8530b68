//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use locomotion::config::ConfigFile;
use locomotion::route::TravelProfile;

/// Travel profile selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ProfileArg {
    /// Car routing
    Driving,
    /// Pedestrian routing
    Walking,
    /// Bicycle routing
    Cycling,
}

impl From<ProfileArg> for TravelProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Driving => TravelProfile::Driving,
            ProfileArg::Walking => TravelProfile::Walking,
            ProfileArg::Cycling => TravelProfile::Cycling,
        }
    }
}

/// CLI takes precedence, then config.
pub fn resolve_profile(cli_profile: Option<ProfileArg>, config: &ConfigFile) -> TravelProfile {
    cli_profile
        .map(TravelProfile::from)
        .unwrap_or(config.provider.profile)
}
