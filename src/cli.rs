use crate::profile::PowerProfile;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "powerplan",
    about = "Switch power plans and tune monitor, standby and hibernate timeouts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file only
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the currently active power plan
    Status,

    /// Activate a power plan and apply its timeout settings
    Apply {
        /// Plan to activate: high-performance, balanced or power-saver
        /// (display names such as "High Performance" also work)
        #[arg(value_parser = PowerProfile::from_str, value_name = "PROFILE")]
        profile: PowerProfile,
    },

    /// List the known power plans and the timeouts each one applies
    List,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: powerplan completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "powerplan",
        &mut std::io::stdout(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_profile() {
        let cli = Cli::try_parse_from(["powerplan", "apply", "power-saver"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Apply {
                profile: PowerProfile::PowerSaver
            }
        ));
    }

    #[test]
    fn test_parse_apply_display_names_ignoring_case() {
        for (name, expected) in [
            ("High Performance", PowerProfile::HighPerformance),
            ("BALANCED", PowerProfile::Balanced),
            ("power saver", PowerProfile::PowerSaver),
            ("POWER-SAVER", PowerProfile::PowerSaver),
        ] {
            let cli = Cli::try_parse_from(["powerplan", "apply", name]).unwrap();
            match cli.command {
                Command::Apply { profile } => assert_eq!(profile, expected, "{}", name),
                _ => panic!("expected apply for {}", name),
            }
        }
    }

    #[test]
    fn test_parse_apply_with_globals() {
        let cli = Cli::try_parse_from(["powerplan", "apply", "high-performance", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Apply {
                profile: PowerProfile::HighPerformance
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_profile() {
        let err = match Cli::try_parse_from(["powerplan", "apply", "turbo"]) {
            Ok(_) => panic!("turbo should not parse as a profile"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unknown power profile: turbo"));
    }
}
