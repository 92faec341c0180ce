// src/bin/lookup_ticker.rs
use anyhow::{anyhow, Context};
use dotenv::dotenv;
use log::{info, warn};

use earnings_move_dashboard::config::Config;
use earnings_move_dashboard::models::Ticker;
use earnings_move_dashboard::render::render_text;
use earnings_move_dashboard::services::earnings::lookup_earnings;
use earnings_move_dashboard::services::orats::OratsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_ticker.clone());
    let ticker = Ticker::parse(&input)?;

    info!("Looking up earnings moves for {}", ticker);
    let client = OratsClient::new(&config).context("building ORATS client")?;

    match lookup_earnings(&client, &ticker, config.live_price).await? {
        Some(lookup) => {
            print!("{}", render_text(&lookup));
            Ok(())
        }
        None => {
            warn!("No data found for {}", ticker);
            Err(anyhow!("No data found for the specified ticker ({}).", ticker))
        }
    }
}
