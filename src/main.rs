use clap::Parser;
use hydrotime::{
    App, AppError, Config,
    cli::{Cli, Command},
    config::Overrides,
    handlers, ui,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = Config::resolve(Overrides {
        data_dir: cli.data_dir,
        api_url: cli.api_url,
        offline: cli.offline,
    });
    info!(data_dir = %config.data_dir.display(), api_url = %config.api_url, mode = ?config.mode, "starting");

    let mut app = App::new(&config).await;
    app.mount().await;

    match handlers::run(&mut app, cli.command.unwrap_or(Command::Status)).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(AppError::NotAuthenticated) => {
            eprintln!("{}", ui::render_login_required(app.state().settings.language));
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
