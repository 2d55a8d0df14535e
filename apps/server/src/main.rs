use anyhow::Context;
use folio::domain::config::ApiConfig;
use folio::kernel::config::load_config;
use folio_logger::{LogFormat, Logger, parse_level};
use folio_server::Server;

#[folio_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig = load_config(Some("config/server")).context("Critical: Configuration is malformed")?;

    let logging = &cfg.logging;
    let mut logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&logging.level)?)
        .format(logging.format.parse::<LogFormat>()?);
    if let Some(directives) = &logging.directives {
        logger = logger.directives(directives.clone());
    }
    if let Some(directory) = &logging.directory {
        logger = logger.directory(directory.clone());
    }
    let _log = logger.init()?;

    Server::builder().config(cfg).build().await?.run().await
}
