use clap::Parser;
use folio_logger::{Logger, parse_level};
use folio_shell::{Cli, execute};
use tokio::io::AsyncWriteExt;

#[folio_runtime::main(cli)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&cli.log_level)?).stderr(true).init()?;

    if let Some(output) = execute(cli.command).await? {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}
