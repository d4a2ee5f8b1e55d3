use askama::Template;

use super::format::{format_inr, format_join_date, format_number, initial};
use super::state::{ListViewState, Screen};
use crate::models::{Influencer, InfluencerStatus};

/// One influencer card, fully formatted.
pub struct Card {
    pub initial: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub badge_class: &'static str,
    pub affiliate_code: String,
    pub commission: String,
    pub earnings: String,
    pub balance: String,
    pub clicks: i32,
    pub signups: i32,
    pub purchases: i32,
    pub conversion: String,
    pub joined: String,
    pub is_india: bool,
}

impl From<&Influencer> for Card {
    fn from(influencer: &Influencer) -> Self {
        Self {
            initial: initial(&influencer.name),
            name: influencer.name.clone(),
            email: influencer.email.clone(),
            status: influencer.status.clone().unwrap_or_default(),
            badge_class: InfluencerStatus::badge_class(influencer.status.as_deref()),
            affiliate_code: influencer.affiliate_code.clone(),
            commission: format_number(&influencer.commission_rate),
            earnings: format_inr(&influencer.total_earnings),
            balance: format_inr(&influencer.remaining_balance),
            clicks: influencer.total_clicks,
            signups: influencer.total_signups,
            purchases: influencer.total_purchases,
            conversion: format_number(&influencer.conversion_rate),
            joined: format_join_date(&influencer.created_at),
            is_india: influencer.is_india,
        }
    }
}

pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn status_options(current: &str) -> Vec<StatusOption> {
    let mut options = vec![StatusOption {
        value: "",
        label: "All Status",
        selected: current.is_empty(),
    }];
    options.extend(InfluencerStatus::ALL.iter().map(|status| StatusOption {
        value: status.as_str(),
        label: status.label(),
        selected: status.as_str() == current,
    }));
    options
}

#[derive(Template)]
#[template(path = "influencers_list.html")]
struct InfluencersListTemplate<'a> {
    loading: bool,
    error: Option<&'a str>,
    search_term: &'a str,
    status_options: Vec<StatusOption>,
    cards: Vec<Card>,
    retry_query: String,
}

/// Renders the view as a full HTML page.
pub fn render_html(state: &ListViewState) -> Result<String, askama::Error> {
    let screen = state.screen();
    let template = InfluencersListTemplate {
        loading: matches!(screen, Screen::Loading),
        error: match screen {
            Screen::Error(message) => Some(message),
            _ => None,
        },
        search_term: state.search_term(),
        status_options: status_options(state.status_filter()),
        cards: state.influencers().iter().map(Card::from).collect(),
        retry_query: retry_query(state),
    };
    template.render()
}

/// Query string that reloads the page with the active filters.
fn retry_query(state: &ListViewState) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if !state.search_term().is_empty() {
        serializer.append_pair("search", state.search_term());
    }
    if !state.status_filter().is_empty() {
        serializer.append_pair("status", state.status_filter());
    }
    serializer.finish()
}

/// Renders the view as plain text for terminals.
pub fn render_text(state: &ListViewState) -> String {
    match state.screen() {
        Screen::Loading => "Loading influencers...\n".to_string(),
        Screen::Error(message) => format!("⚠️ {}\n", message),
        Screen::Empty => {
            "No influencers found. Try adjusting your search criteria.\n".to_string()
        }
        Screen::Results => {
            let mut out = String::new();
            for card in state.influencers().iter().map(Card::from) {
                out.push_str(&format!(
                    "[{}] {} <{}> {}\n",
                    card.initial, card.name, card.email, card.status
                ));
                out.push_str(&format!(
                    "    code {} | commission {}% | earnings {} | balance {}\n",
                    card.affiliate_code, card.commission, card.earnings, card.balance
                ));
                out.push_str(&format!(
                    "    clicks {} | signups {} | purchases {} | rate {}%\n",
                    card.clicks, card.signups, card.purchases, card.conversion
                ));
                out.push_str(&format!(
                    "    joined {}{}\n",
                    card.joined,
                    if card.is_india { " 🇮🇳" } else { "" }
                ));
            }
            out.push_str(&format!(
                "Showing {} influencers\n",
                state.influencers().len()
            ));
            out
        }
    }
}
