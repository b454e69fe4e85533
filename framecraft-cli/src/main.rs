//! framecraft command-line entry point

use framecraft_cli::{build_frame, Cli, Commands};
use framecraft_core::{Error, Result};
use framecraft_packet::TemplateRegistry;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(cli.log_level())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();
}

fn list(registry: &TemplateRegistry) {
    for info in registry.list() {
        println!("{:<6} {:>3} bytes  {}", info.name, info.size, info.help);
    }
}

fn describe(registry: &TemplateRegistry, protocol: &str) -> Result<()> {
    let template = registry
        .get_by_name(protocol)
        .ok_or_else(|| Error::UnknownProtocol(protocol.to_string()))?;

    println!("{}: {}", template.name(), template.help());
    for field in template.fields() {
        let default = template
            .default_value(field.name())
            .map(|v| format!(" (default 0x{})", hex::encode(v)))
            .unwrap_or_default();
        println!(
            "  {:<8} {:>3} bits @ {:>3}  {}{}",
            field.name(),
            field.bit_width(),
            field.bit_offset(),
            field.help(),
            default
        );
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let registry = TemplateRegistry::with_builtin()?;

    match &cli.command {
        Commands::List => list(&registry),
        Commands::Help { protocol } => describe(&registry, protocol)?,
        Commands::Hex { frame } => {
            let bytes = build_frame(&registry, frame)?;
            println!("{}", hex::encode(&bytes));
        }
        Commands::Write { file, frame } => {
            let bytes = build_frame(&registry, frame)?;
            std::fs::write(file, &bytes)?;
            info!(path = %file.display(), size = bytes.len(), "Frame written");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
