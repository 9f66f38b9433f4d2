use std::process::ExitCode;

use brief_cli::{logging, Cli};
use clap::Parser;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut stdout = std::io::stdout();
    match brief_cli::run(&cli, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
