use clap::Parser;
use girino_serial::channel::{CancelToken, SerialChannel};
use girino_serial::cli::{self, Args, Command};
use girino_serial::config::{Config, ConfigLoader};
use girino_serial::discovery;
use girino_serial::error::AppResult;
use girino_serial::logging;
use tokio::signal;
use tracing::{debug, warn};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let loader = match load_config(&args) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = logging::init_logging(&loader.config().logging, args.log_level.as_deref()) {
        eprintln!("Warning: logging disabled: {e}");
    }
    match &loader.config_path {
        Some(path) => debug!("Loaded configuration from {}", path.display()),
        None => debug!("No configuration file found, using defaults"),
    }
    let config = loader.into_config();

    if let Err(e) = run(args, config).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn load_config(args: &Args) -> AppResult<ConfigLoader> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    Ok(loader)
}

async fn run(args: Args, config: Config) -> AppResult<()> {
    for name in &config.discovery.prepared_ports {
        discovery::prepare(name);
    }

    let mut stdout = std::io::stdout().lock();

    if let Command::List { json } = args.command {
        let ports = discovery::enumerate();
        return cli::list_ports(&ports, json, &mut stdout);
    }

    let explicit = args.command.port();
    let discovered = if explicit.is_none() && config.discovery.default_port.is_none() {
        discovery::enumerate()
    } else {
        Vec::new()
    };
    let port_name = cli::select_port(explicit, config.discovery.default_port.as_deref(), &discovered)?;

    let params = config.serial.connection_parameters();
    let mut channel = SerialChannel::open_with(&port_name, &params).await?;

    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                debug!("Ctrl+C received, cancelling pending read");
                interrupt.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    let result = match args.command {
        Command::ReadLines { count, .. } => {
            cli::read_lines(&mut channel, count, &cancel, &mut stdout).await.map(|_| ())
        }
        Command::Send { text, crlf, reply, .. } => {
            cli::send(&mut channel, &text, crlf, reply, &cancel, &mut stdout).await
        }
        Command::ReadFrame { bytes, .. } => {
            cli::read_frame(&mut channel, bytes, &cancel, &mut stdout).await
        }
        Command::List { .. } => Ok(()),
    };

    channel.close();
    result
}
