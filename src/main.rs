//! # myflix Main Entry Point

use anyhow::Result;
use myflix::{logging, AppController, Command, CommandLineArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    logging::init(args.verbose());

    let mut app = AppController::from_args(&args)?;

    match args.command() {
        Command::Shell => app.run_shell().await?,
        command => {
            let output = app.execute(command).await?;
            print!("{output}");
        }
    }

    Ok(())
}
