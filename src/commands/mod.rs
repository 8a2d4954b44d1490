pub type CmdResult<T> = requalify::Result<(T, i32)>;

/// Flags shared by every subcommand.
pub(crate) struct GlobalArgs {
    /// Config file path; `None` selects the built-in table.
    pub config: Option<String>,
}

pub mod rules;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $handler:path) => {
        crate::output::map_cmd_result_to_json($handler($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (requalify::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run(args) => dispatch!(args, global, run::run),
        crate::Commands::Check(args) => dispatch!(args, global, run::check),
        crate::Commands::Rules(args) => dispatch!(args, global, rules::run),
    }
}
