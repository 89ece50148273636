use clap::Parser;
use liq_hunter::cli::{Cli, Commands};
use liq_hunter::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Missing or invalid configuration is fatal
    let config = Config::load(&cli.config)?;

    liq_hunter::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => args.execute(&config).await?,
        Commands::Check(args) => args.execute(&config).await?,
        Commands::Config => {
            println!("# effective configuration ({})", cli.config);
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
