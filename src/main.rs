use clap::Parser;

use codetok_lib::bootstrap::tracing::init_tracing_subscriber;
use codetok_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing before anything logs
    // 在任何日志输出之前初始化 tracing
    if let Err(err) = init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    cli::run(cli).await
}
