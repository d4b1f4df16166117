use std::collections::HashMap;

use super::*;
use async_trait::async_trait;
use shared::{
    domain::{MovieDetail, MovieSummary, Query, SearchResult},
    error::CatalogError,
};
use tokio::sync::{mpsc, oneshot};

type SearchReply = Result<SearchResult, CatalogError>;
type DetailReply = Result<MovieDetail, CatalogError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Search(String, u32),
    Detail(MovieId),
}

/// Catalog whose responses are released by the test, in whatever order the
/// test chooses.
struct ScriptedApi {
    calls: mpsc::UnboundedSender<Call>,
    searches: Mutex<HashMap<(String, u32), oneshot::Receiver<SearchReply>>>,
    details: Mutex<HashMap<MovieId, oneshot::Receiver<DetailReply>>>,
}

impl ScriptedApi {
    fn new() -> (Self, mpsc::UnboundedReceiver<Call>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (
            Self {
                calls,
                searches: Mutex::new(HashMap::new()),
                details: Mutex::new(HashMap::new()),
            },
            rx,
        )
    }

    async fn expect_search(&self, query: &str, page: u32) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.searches
            .lock()
            .await
            .insert((query.to_string(), page), rx);
        tx
    }

    async fn expect_detail(&self, id: MovieId) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().await.insert(id, rx);
        tx
    }
}

#[async_trait]
impl CatalogApi for ScriptedApi {
    async fn search(&self, query: &Query, page: u32) -> Result<SearchResult, CatalogError> {
        let _ = self.calls.send(Call::Search(query.to_string(), page));
        let reply = self
            .searches
            .lock()
            .await
            .remove(&(query.to_string(), page));
        match reply {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(CatalogError::transport())),
            None => Err(CatalogError::transport()),
        }
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        let _ = self.calls.send(Call::Detail(id));
        let reply = self.details.lock().await.remove(&id);
        match reply {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(CatalogError::transport())),
            None => Err(CatalogError::transport()),
        }
    }
}

fn summary(id: i64, title: &str) -> MovieSummary {
    MovieSummary {
        id: MovieId(id),
        title: title.to_string(),
        poster: Some("/abc.jpg".to_string()),
        year: Some("2010".to_string()),
        rating: Some(8.4),
        overview: None,
    }
}

fn page_of(title: &str, page: u32, total_pages: u32) -> SearchResult {
    SearchResult {
        results: vec![summary(i64::from(page), title)],
        page,
        total_pages,
    }
}

fn detail(id: i64, title: &str) -> MovieDetail {
    MovieDetail {
        id: MovieId(id),
        title: title.to_string(),
        poster: None,
        year: None,
        rating: None,
        runtime: None,
        genres: Vec::new(),
        cast: Vec::new(),
        overview: None,
    }
}

#[tokio::test]
async fn inception_scenario_then_next_page_requests_page_two() {
    let (api, mut calls) = ScriptedApi::new();
    let first = api.expect_search("Inception", 1).await;
    let second = api.expect_search("Inception", 2).await;
    let api = Arc::new(api);
    let client = CatalogClient::new(api.clone(), "Inception");

    first
        .send(Ok(SearchResult {
            results: vec![summary(27205, "Inception")],
            page: 1,
            total_pages: 5,
        }))
        .expect("reply");
    assert_eq!(client.submit(1).await, Some(Resolution::Applied));
    assert_eq!(calls.recv().await, Some(Call::Search("Inception".into(), 1)));

    let session = client.search_session().await;
    assert_eq!(session.last_result.total_pages, 5);
    assert_eq!(session.page, 1);
    assert!(!session.loading);
    assert_eq!(session.error, None);
    let view = client.view().await;
    assert_eq!(view.results.len(), 1);
    assert_eq!(view.results[0].title, "Inception");

    second.send(Ok(page_of("Inception", 2, 5))).expect("reply");
    assert_eq!(client.go_to_page(1).await, Some(Resolution::Applied));
    assert_eq!(calls.recv().await, Some(Call::Search("Inception".into(), 2)));
    assert_eq!(client.search_session().await.page, 2);
}

#[tokio::test]
async fn blank_query_issues_no_request() {
    let (api, mut calls) = ScriptedApi::new();
    let client = CatalogClient::new(Arc::new(api), "   ");
    let before = client.search_session().await;

    assert_eq!(client.submit(1).await, None);
    assert_eq!(client.search_session().await, before);
    assert!(calls.try_recv().is_err());
}

#[tokio::test]
async fn later_search_wins_even_when_earlier_one_resolves_last() {
    let (api, mut calls) = ScriptedApi::new();
    let reply_a = api.expect_search("A", 1).await;
    let reply_b = api.expect_search("B", 1).await;
    let client = CatalogClient::new(Arc::new(api), "A");

    let task_a = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.submit(1).await }
    });
    assert_eq!(calls.recv().await, Some(Call::Search("A".into(), 1)));

    client.set_query("B").await;
    let task_b = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.submit(1).await }
    });
    assert_eq!(calls.recv().await, Some(Call::Search("B".into(), 1)));

    reply_b.send(Ok(page_of("B", 1, 2))).expect("reply b");
    assert_eq!(task_b.await.expect("join b"), Some(Resolution::Applied));

    reply_a.send(Ok(page_of("A", 1, 9))).expect("reply a");
    assert_eq!(task_a.await.expect("join a"), Some(Resolution::Discarded));

    let session = client.search_session().await;
    assert_eq!(session.last_result, page_of("B", 1, 2));
    assert!(!session.loading);
}

#[tokio::test]
async fn superseded_search_resolving_first_leaves_newer_one_loading() {
    let (api, mut calls) = ScriptedApi::new();
    let reply_a = api.expect_search("A", 1).await;
    let reply_b = api.expect_search("B", 1).await;
    let client = CatalogClient::new(Arc::new(api), "A");

    let task_a = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.submit(1).await }
    });
    calls.recv().await.expect("call a");
    client.set_query("B").await;
    let task_b = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.submit(1).await }
    });
    calls.recv().await.expect("call b");

    reply_a
        .send(Err(CatalogError::status(500)))
        .expect("reply a");
    assert_eq!(task_a.await.expect("join a"), Some(Resolution::Discarded));
    let session = client.search_session().await;
    assert!(session.loading);
    assert_eq!(session.error, None);

    reply_b.send(Ok(page_of("B", 1, 1))).expect("reply b");
    assert_eq!(task_b.await.expect("join b"), Some(Resolution::Applied));
    assert!(!client.search_session().await.loading);
}

#[tokio::test]
async fn failed_search_is_reported_then_cleared_by_recovery() {
    let (api, _calls) = ScriptedApi::new();
    let failing = api.expect_search("Inception", 1).await;
    let api = Arc::new(api);
    let client = CatalogClient::new(api.clone(), "Inception");

    failing.send(Err(CatalogError::status(503))).expect("reply");
    client.submit(1).await;
    let view = client.view().await;
    assert_eq!(view.banner_error.as_deref(), Some("Search failed: 503"));
    assert!(!view.searching);

    let recovering = api.expect_search("Inception", 1).await;
    recovering.send(Ok(page_of("Inception", 1, 1))).expect("reply");
    client.submit(1).await;
    let session = client.search_session().await;
    assert_eq!(session.error, None);
    assert_eq!(session.last_result, page_of("Inception", 1, 1));
}

#[tokio::test]
async fn pagination_clamps_without_requests() {
    let (api, mut calls) = ScriptedApi::new();
    let reply = api.expect_search("Inception", 1).await;
    let client = CatalogClient::new(Arc::new(api), "Inception");
    reply.send(Ok(page_of("Inception", 1, 1))).expect("reply");
    client.submit(1).await;
    calls.recv().await.expect("initial search");

    assert_eq!(client.go_to_page(-1).await, None);
    assert_eq!(client.go_to_page(1).await, None);
    assert!(calls.try_recv().is_err());
}

#[tokio::test]
async fn detail_for_abandoned_selection_never_populates_panel() {
    let (api, mut calls) = ScriptedApi::new();
    let reply_1 = api.expect_detail(MovieId(1)).await;
    let reply_2 = api.expect_detail(MovieId(2)).await;
    let client = CatalogClient::new(Arc::new(api), "Inception");

    let open_1 = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.open_detail(MovieId(1)).await }
    });
    assert_eq!(calls.recv().await, Some(Call::Detail(MovieId(1))));
    let open_2 = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.open_detail(MovieId(2)).await }
    });
    assert_eq!(calls.recv().await, Some(Call::Detail(MovieId(2))));

    let panel = client.view().await.detail_panel.expect("panel");
    assert_eq!(panel.movie_id, MovieId(2));
    assert!(panel.is_loading());

    reply_1.send(Ok(detail(1, "One"))).expect("reply 1");
    assert_eq!(open_1.await.expect("join 1"), Resolution::Discarded);
    assert_eq!(client.detail_session().await.detail, None);

    reply_2.send(Ok(detail(2, "Two"))).expect("reply 2");
    assert_eq!(open_2.await.expect("join 2"), Resolution::Applied);
    let session = client.detail_session().await;
    assert_eq!(session.selected_id, Some(MovieId(2)));
    assert_eq!(session.detail, Some(detail(2, "Two")));
}

#[tokio::test]
async fn closing_detail_drops_in_flight_response() {
    let (api, mut calls) = ScriptedApi::new();
    let reply = api.expect_detail(MovieId(5)).await;
    let client = CatalogClient::new(Arc::new(api), "Inception");

    let open = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.open_detail(MovieId(5)).await }
    });
    calls.recv().await.expect("detail call");
    client.close_detail().await;

    reply.send(Ok(detail(5, "Five"))).expect("reply");
    assert_eq!(open.await.expect("join"), Resolution::Discarded);
    assert_eq!(client.view().await.detail_panel, None);
}

#[tokio::test]
async fn detail_failure_stays_scoped_to_detail_session() {
    let (api, _calls) = ScriptedApi::new();
    let reply = api.expect_detail(MovieId(7)).await;
    let client = CatalogClient::new(Arc::new(api), "Inception");

    reply.send(Err(CatalogError::status(404))).expect("reply");
    client.open_detail(MovieId(7)).await;

    assert_eq!(
        client.detail_session().await.error.as_deref(),
        Some("Detail failed: 404")
    );
    assert_eq!(client.search_session().await.error, None);
    assert_eq!(client.view().await.banner_error, None);
}

#[tokio::test]
async fn every_state_change_publishes_a_view() {
    let (api, _calls) = ScriptedApi::new();
    let reply = api.expect_search("Inception", 1).await;
    let client = CatalogClient::new(Arc::new(api), "Inception");
    let mut events = client.subscribe_events();

    reply.send(Ok(page_of("Inception", 1, 3))).expect("reply");
    client.submit(1).await;

    let ClientEvent::ViewChanged(started) = events.recv().await.expect("started");
    assert!(started.searching);
    let ClientEvent::ViewChanged(finished) = events.recv().await.expect("finished");
    assert!(!finished.searching);
    assert_eq!(finished.total_pages, 3);
    assert!(finished.can_go_forward);
}
