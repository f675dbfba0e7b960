mod cli;
mod logging;
mod run;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    match run::execute(&cli).await {
        Ok(summary) => {
            println!("{}", summary.delivered.report_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
