use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{rules, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "requalify")]
#[command(version = VERSION)]
#[command(about = "Move identifiers into a shared module and qualify every reference to them")]
struct Cli {
    /// JSON config file (default: built-in forumcommon table)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite references in place and add the shared import where needed
    Run(run::RunArgs),
    /// Report files that would change; exits 1 if any would
    Check(run::CheckArgs),
    /// Show the rename table and walk settings
    Rules(rules::RulesArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_accepted_before_or_after_subcommand() {
        let before = Cli::try_parse_from(["requalify", "--config", "a.json", "rules"]).unwrap();
        assert_eq!(before.config.as_deref(), Some("a.json"));

        let after =
            Cli::try_parse_from(["requalify", "check", "handlers", "--config", "b.json"]).unwrap();
        assert_eq!(after.config.as_deref(), Some("b.json"));
        assert!(matches!(after.command, Commands::Check(_)));
    }

    #[test]
    fn config_defaults_to_builtin() {
        let cli = Cli::try_parse_from(["requalify", "run", "--dry-run"]).unwrap();
        assert!(cli.config.is_none());
    }
}
