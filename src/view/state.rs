use async_trait::async_trait;

use crate::client::{ClientError, InfluencerApiClient, ListRequest};
use crate::models::{ApiResponse, Influencer};

/// Rows requested per fetch.
pub const PAGE_SIZE: u32 = 50;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch influencers";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// How a fetch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(Vec<Influencer>),
    /// The API answered with an error envelope.
    Rejected(String),
    /// No usable answer at all.
    NetworkFailure,
}

impl FetchOutcome {
    pub fn from_response(result: Result<ApiResponse<Vec<Influencer>>, ClientError>) -> Self {
        match result {
            Ok(envelope) if envelope.is_success() => FetchOutcome::Loaded(envelope.data),
            Ok(envelope) => FetchOutcome::Rejected(envelope.message),
            Err(e) => {
                tracing::error!("Fetch error: {}", e);
                FetchOutcome::NetworkFailure
            }
        }
    }
}

/// What the view shows, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Results,
}

/// State of the influencer list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewState {
    influencers: Vec<Influencer>,
    loading: bool,
    error: Option<String>,
    search_term: String,
    status_filter: String,
    seeded: bool,
}

impl ListViewState {
    /// Seeded views start idle; unseeded views start loading and need a fetch.
    pub fn new(initial: Option<Vec<Influencer>>) -> Self {
        let seeded = initial.is_some();
        Self {
            influencers: initial.unwrap_or_default(),
            loading: !seeded,
            error: None,
            search_term: String::new(),
            status_filter: String::new(),
            seeded,
        }
    }

    pub fn needs_initial_fetch(&self) -> bool {
        !self.seeded
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Changing the status does not refetch; only a search does.
    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.status_filter = status.into();
    }

    /// Enters the loading state and returns the request to send.
    pub fn begin_fetch(&mut self) -> ListRequest {
        self.loading = true;
        self.error = None;
        ListRequest {
            limit: PAGE_SIZE,
            search: Some(self.search_term.clone()).filter(|s| !s.is_empty()),
            status: Some(self.status_filter.clone()).filter(|s| !s.is_empty()),
        }
    }

    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded(rows) => self.influencers = rows,
            FetchOutcome::Rejected(message) if message.is_empty() => {
                self.error = Some(FETCH_FAILED_MESSAGE.to_string())
            }
            FetchOutcome::Rejected(message) => self.error = Some(message),
            FetchOutcome::NetworkFailure => self.error = Some(NETWORK_ERROR_MESSAGE.to_string()),
        }
        self.loading = false;
    }

    pub fn screen(&self) -> Screen<'_> {
        if self.loading && !self.seeded {
            Screen::Loading
        } else if let Some(error) = self.error.as_deref() {
            Screen::Error(error)
        } else if self.influencers.is_empty() {
            Screen::Empty
        } else {
            Screen::Results
        }
    }

    pub fn influencers(&self) -> &[Influencer] {
        &self.influencers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }
}

/// Anything the view can fetch influencers from.
#[async_trait]
pub trait InfluencerSource: Send + Sync {
    async fn fetch(
        &self,
        request: &ListRequest,
    ) -> Result<ApiResponse<Vec<Influencer>>, ClientError>;
}

#[async_trait]
impl InfluencerSource for InfluencerApiClient {
    async fn fetch(
        &self,
        request: &ListRequest,
    ) -> Result<ApiResponse<Vec<Influencer>>, ClientError> {
        self.list(request).await
    }
}

/// Drives a [`ListViewState`] against a source, one fetch at a time.
pub struct InfluencerListView<S> {
    source: S,
    state: ListViewState,
}

impl<S: InfluencerSource> InfluencerListView<S> {
    /// Builds the view; an unseeded view fetches once before returning.
    pub async fn mount(source: S, initial: Option<Vec<Influencer>>) -> Self {
        let mut view = Self {
            source,
            state: ListViewState::new(initial),
        };
        if view.state.needs_initial_fetch() {
            view.fetch().await;
        }
        view
    }

    pub fn state(&self) -> &ListViewState {
        &self.state
    }

    /// Edits the search box.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.state.set_search_term(text);
    }

    /// Changes the status selector.
    pub fn select_status(&mut self, status: impl Into<String>) {
        self.state.set_status_filter(status);
    }

    /// Key press in the search box; Enter searches.
    pub async fn key_press(&mut self, key: &str) {
        if key == "Enter" {
            self.fetch().await;
        }
    }

    pub async fn search(&mut self) {
        self.fetch().await;
    }

    /// The error panel's "Try Again".
    pub async fn retry(&mut self) {
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        let request = self.state.begin_fetch();
        let outcome = FetchOutcome::from_response(self.source.fetch(&request).await);
        self.state.finish_fetch(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseStatus;
    use std::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<Vec<ApiResponse<Vec<Influencer>>>>,
        requests: Mutex<Vec<ListRequest>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<ApiResponse<Vec<Influencer>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ListRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl<'a> InfluencerSource for &'a ScriptedSource {
        async fn fetch(
            &self,
            request: &ListRequest,
        ) -> Result<ApiResponse<Vec<Influencer>>, ClientError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            Ok(if responses.is_empty() {
                ApiResponse::success(Vec::new(), "")
            } else {
                responses.remove(0)
            })
        }
    }

    #[test]
    fn test_seeded_state_is_idle() {
        let state = ListViewState::new(Some(Vec::new()));
        assert!(!state.is_loading());
        assert!(!state.needs_initial_fetch());
        assert_eq!(state.screen(), Screen::Empty);
    }

    #[test]
    fn test_unseeded_state_shows_loading_until_resolved() {
        let mut state = ListViewState::new(None);
        assert!(state.needs_initial_fetch());
        assert_eq!(state.screen(), Screen::Loading);

        let request = state.begin_fetch();
        assert_eq!(request.limit, PAGE_SIZE);
        assert_eq!(state.screen(), Screen::Loading);

        state.finish_fetch(FetchOutcome::Loaded(Vec::new()));
        assert!(!state.is_loading());
        assert_eq!(state.screen(), Screen::Empty);
    }

    #[test]
    fn test_seeded_view_never_shows_spinner() {
        let mut state = ListViewState::new(Some(Vec::new()));
        state.begin_fetch();
        assert!(state.is_loading());
        assert_eq!(state.screen(), Screen::Empty);
    }

    #[test]
    fn test_error_outcomes() {
        let mut state = ListViewState::new(None);
        state.begin_fetch();
        state.finish_fetch(FetchOutcome::Rejected("Failed to fetch influencers".into()));
        assert_eq!(state.screen(), Screen::Error("Failed to fetch influencers"));

        state.begin_fetch();
        assert_eq!(state.error(), None);
        state.finish_fetch(FetchOutcome::Rejected(String::new()));
        assert_eq!(state.error(), Some(FETCH_FAILED_MESSAGE));

        state.begin_fetch();
        state.finish_fetch(FetchOutcome::NetworkFailure);
        assert_eq!(state.error(), Some(NETWORK_ERROR_MESSAGE));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_request_carries_active_filters() {
        let mut state = ListViewState::new(Some(Vec::new()));
        state.set_search_term("asha");
        state.set_status_filter("suspended");
        let request = state.begin_fetch();
        assert_eq!(request.search.as_deref(), Some("asha"));
        assert_eq!(request.status.as_deref(), Some("suspended"));
    }

    #[test]
    fn test_error_envelope_maps_to_rejected() {
        let envelope = ApiResponse {
            status: ResponseStatus::Error,
            data: Vec::new(),
            count: None,
            message: "Failed to fetch influencers".to_string(),
        };
        assert_eq!(
            FetchOutcome::from_response(Ok(envelope)),
            FetchOutcome::Rejected("Failed to fetch influencers".to_string())
        );
    }

    #[tokio::test]
    async fn test_mount_fetches_once_and_status_change_does_not_refetch() {
        let source = ScriptedSource::new(Vec::new());
        let mut view = InfluencerListView::mount(&source, None).await;
        assert_eq!(source.requests().len(), 1);

        view.select_status("active");
        view.type_search("foo");
        view.key_press("a").await;
        assert_eq!(source.requests().len(), 1);

        view.key_press("Enter").await;
        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].search.as_deref(), Some("foo"));
        assert_eq!(requests[1].status.as_deref(), Some("active"));
    }

    #[tokio::test]
    async fn test_seeded_mount_does_not_fetch() {
        let source = ScriptedSource::new(Vec::new());
        let view = InfluencerListView::mount(&source, Some(Vec::new())).await;
        assert!(source.requests().is_empty());
        assert!(!view.state().is_loading());
    }
}
