//! Terminal influencer list.
//!
//! Usage: `list_influencers [search] [status]`
//!
//! Mounts the list view against the API at `API_BASE_URL`
//! (default `http://localhost:3000`), runs a search with the given filters
//! and prints the result.

use dotenvy::dotenv;
use std::env;

use fraterny_affiliates::client::InfluencerApiClient;
use fraterny_affiliates::view::{render_text, InfluencerListView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let base_url = env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let mut args = env::args().skip(1);
    let search = args.next().unwrap_or_default();
    let status = args.next().unwrap_or_default();

    let client = InfluencerApiClient::new(&base_url)?;
    tracing::info!("Listing influencers from {}", base_url);

    let mut view = InfluencerListView::mount(client, None).await;

    if !search.is_empty() || !status.is_empty() {
        view.type_search(search);
        view.select_status(status);
        view.search().await;
    }

    print!("{}", render_text(view.state()));

    if view.state().error().is_some() {
        std::process::exit(1);
    }

    Ok(())
}
