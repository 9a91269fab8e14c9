use console::style;
use ghstats::cli::Cli;
use ghstats::error::GhstatsError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const TOKEN_HELP: &str = "
Authentication options:
  1. Set GITHUB_TOKEN environment variable:
     PowerShell: $env:GITHUB_TOKEN = \"your-token-here\"
     Bash/WSL:  export GITHUB_TOKEN=\"your-token-here\"

  2. Use --token flag (less secure):
     ghstats --token your-token-here

  3. Create a .env file in the project directory:
     GITHUB_TOKEN=your-token-here

Generate a token at: https://github.com/settings/tokens
Required scope: repo";

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_tracing(verbose);

    tokio::select! {
        result = cli.execute() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                report_error(&err, verbose);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n\nOperation interrupted by user");
            ExitCode::from(130)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "ghstats=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn report_error(err: &anyhow::Error, verbose: bool) {
    eprintln!("{}", style(format!("Error: {err:#}")).red());
    match err.downcast_ref::<GhstatsError>() {
        Some(GhstatsError::MissingToken) => eprintln!("{TOKEN_HELP}"),
        Some(GhstatsError::Auth(_)) => {
            eprintln!("Please check your GITHUB_TOKEN environment variable")
        }
        _ => {}
    }
    if verbose {
        eprintln!("\n{err:?}");
    }
}
