//! Influencer list view: UI state, its fetch driver, and rendering.

pub mod format;
pub mod render;
pub mod state;

pub use render::{render_html, render_text};
pub use state::{
    FetchOutcome, InfluencerListView, InfluencerSource, ListViewState, Screen, PAGE_SIZE,
};
