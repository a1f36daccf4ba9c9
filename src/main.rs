use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser)]
#[command(name = "posterforge")]
#[command(about = "Render article-summary poster PNGs over HTTP", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum number of concurrent rasterizations (each launches a
    /// headless Chrome instance)
    #[arg(long, default_value_t = 4)]
    max_renders: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    posterforge::server::run_server(addr, cli.max_renders).await?;
    Ok(())
}
