mod logging;
mod output;

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use color_eyre::Result;

use topup_service::{format_amount, prepare, run, RunConfig, RunOutcome, DEFAULT_OUTPUT_FILE};

/// Apply company token top-ups to users and write the per-company report
#[derive(Parser, Debug)]
#[command(name = "topup", version, about)]
struct Cli {
    /// Path to the users JSON file
    users: PathBuf,

    /// Path to the companies JSON file
    companies: PathBuf,

    /// Report destination, overwritten on each run
    #[arg(long, short = 'o', env = "TOPUP_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Print the report to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Log filter for diagnostics on stderr
    #[arg(long, env = "TOPUP_LOG", default_value = "info", value_name = "LEVEL")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            output::dim(&e.to_string());
            output::usage("topup");
            std::process::exit(1);
        }
    };

    logging::init(&cli.log_level)?;

    if let Err(err) = execute(&cli) {
        output::error(&format!("An error occurred: {}", err));
        std::process::exit(1);
    }

    Ok(())
}

fn execute(cli: &Cli) -> Result<()> {
    let config = RunConfig::new(&cli.users, &cli.companies).with_output(&cli.output);
    tracing::debug!(?config, dry_run = cli.dry_run, "starting run");

    output::status(
        "Loading",
        &format!("{} and {}", config.users_path.display(), config.companies_path.display()),
    );

    let outcome = if cli.dry_run {
        prepare(&config)?
    } else {
        run(&config)?
    };

    match outcome {
        RunOutcome::NoInputData => output::info("No users or companies data found. Exiting."),
        RunOutcome::NoValidUsers => output::info("No valid user data found. Exiting."),
        RunOutcome::Report(report) => {
            output::status(
                "Reported",
                &format!(
                    "{} companies, {} users, {} tokens credited ({} rejected)",
                    report.companies.len(),
                    report.listed_users(),
                    format_amount(report.credited_total()),
                    report.validation.rejected.len()
                ),
            );
            if cli.dry_run {
                print!("{}", report.text);
            } else {
                output::success(&format!(
                    "Output file ({}) has been generated successfully.",
                    config.output_path.display()
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_paths() {
        let cli = Cli::try_parse_from(["topup", "users.json", "companies.json"]).unwrap();
        assert_eq!(cli.users, PathBuf::from("users.json"));
        assert_eq!(cli.companies, PathBuf::from("companies.json"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(["topup", "users.json"]).is_err());
        assert!(Cli::try_parse_from(["topup", "a.json", "b.json", "c.json"]).is_err());
    }

    #[test]
    fn test_output_override() {
        let cli =
            Cli::try_parse_from(["topup", "u.json", "c.json", "--output", "report.txt", "--dry-run"])
                .unwrap();
        assert_eq!(cli.output, PathBuf::from("report.txt"));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
