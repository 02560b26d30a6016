use anyhow::Result;
use tracing::info;

use mazechase::app::App;
use mazechase::config::load_config;
use mazechase::logging::setup_logging;

pub fn main() -> Result<()> {
    setup_logging();

    let config = load_config()?;
    info!(?config, "Configuration loaded");

    let mut app = App::new(config)?;
    while app.run()? {}

    println!("{}", app.summary());
    Ok(())
}
