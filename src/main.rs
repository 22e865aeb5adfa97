use clap::Parser;

use tourstats::cli::{Cli, Commands};
use tourstats::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use tourstats::runtime::modes::{self, Mode};
use tourstats::system::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mode = modes::detect_mode(&cli);

    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

    // CLI 模式下默认只输出警告，避免日志干扰命令输出
    let mut logging = get_config().logging.clone();
    let is_cli_command = !matches!(cli.command, None | Some(Commands::Serve));
    if is_cli_command && std::env::var("RUST_LOG").is_err() {
        logging.level = "warn".to_string();
    }
    let _guard = match init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match mode {
        #[cfg(feature = "server")]
        Mode::Server => {
            if let Err(e) = modes::run_server().await {
                eprintln!("Server error: {:#}", e);
                std::process::exit(1);
            }
        }
        #[cfg(feature = "cli")]
        Mode::Cli => {
            let Some(command) = cli.command else {
                return;
            };
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
        Mode::Unknown => {
            eprintln!("No execution mode enabled; build with the `server` or `cli` feature");
            std::process::exit(1);
        }
    }
}
