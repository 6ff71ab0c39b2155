use clap::{Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in `-v` count order; `error` is the default and counts as zero.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse `LWS_AUTH_LOG_LEVEL` as a level name or a verbosity count `0..=5`.
fn parse_verbosity(level: &str) -> Result<u8, String> {
    let level = level.trim().to_ascii_lowercase();
    if let Some(count) = LEVEL_NAMES.iter().position(|name| *name == level) {
        return u8::try_from(count).map_err(|err| err.to_string());
    }

    match level.parse::<u8>() {
        Ok(count) if count <= 5 => Ok(count),
        _ => Err(format!(
            "expected one of {} or a number from 0 to 5",
            LEVEL_NAMES.join(", ")
        )),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log verbosity, repeat up to -vvvv (default: error)")
            .env("LWS_AUTH_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_verbosity),
    )
}
