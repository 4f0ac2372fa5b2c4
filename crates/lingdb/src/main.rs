use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use lingdb::{LingDbConfig, ResponseStatus};
use owo_colors::OwoColorize;

mod commands;

use commands::{CliError, Command};

/// Config file read from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "lingdb.toml";

#[derive(Parser)]
#[command(name = "lingdb", version, about = "Query linguistic survey datasets")]
struct Arguments {
    /// TOML or YAML configuration file.
    #[arg(short, long, env = "LINGDB_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding `<NAME>/<NAME>.json` dataset files.
    #[arg(long, env = "LINGDB_DATASETS_DIR")]
    datasets_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn load_config(args: &Arguments) -> Result<LingDbConfig, CliError> {
    let config = match &args.config {
        Some(path) => LingDbConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => LingDbConfig::load(DEFAULT_CONFIG_FILE)?,
        None => LingDbConfig::default(),
    };
    Ok(match &args.datasets_dir {
        Some(dir) => config.with_datasets_dir(dir),
        None => config,
    })
}

fn main() -> ExitCode {
    let args = Arguments::parse();

    let result = load_config(&args).and_then(|config| {
        lingdb::console::init(&config.log_filter);
        args.command.run(&config)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red().bold());
            match err.status() {
                Some(ResponseStatus::InsufficientData) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_parse_query_command() {
        let args = Arguments::try_parse_from([
            "lingdb",
            "--datasets-dir",
            "/tmp/data",
            "query",
            "Get=consonants&Length=",
        ])
        .unwrap();
        assert_eq!(args.datasets_dir, Some(PathBuf::from("/tmp/data")));
        assert!(matches!(
            args.command,
            Command::Query { ref query_string } if query_string == "Get=consonants&Length="
        ));
    }

    #[test]
    fn test_parse_describe_command() {
        let args =
            Arguments::try_parse_from(["lingdb", "describe", "F22", "English"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Describe { ref dataset, ref language } if dataset == "F22" && language == "English"
        ));
        assert!(Arguments::try_parse_from(["lingdb", "describe", "F22"]).is_err());
    }
}
