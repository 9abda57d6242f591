//! Command-line arguments for the `feedhook` binary.

use std::path::PathBuf;

use clap::Parser;

/// Poll an RSS/Atom feed, match entries against a rule chain and notify.
#[derive(Parser, Debug)]
#[command(name = "feedhook", version, about)]
pub struct Cli {
    /// Path to the YAML rules config. Watched for changes while running.
    #[arg(long, env = "FEEDHOOK_CONFIG", default_value = "rules.yaml")]
    pub config: PathBuf,

    /// Run a single poll cycle, wait for its notifications and exit.
    #[arg(long)]
    pub once: bool,

    /// Validate the config, print the report and exit.
    #[arg(long, conflicts_with = "once")]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["feedhook"]).unwrap();
        assert!(!cli.once);
        assert!(!cli.check);
    }

    #[test]
    fn explicit_config_and_once() {
        let cli = Cli::try_parse_from(["feedhook", "--config", "/etc/feedhook.yaml", "--once"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/feedhook.yaml"));
        assert!(cli.once);
    }

    #[test]
    fn check_conflicts_with_once() {
        assert!(Cli::try_parse_from(["feedhook", "--check", "--once"]).is_err());
    }
}
