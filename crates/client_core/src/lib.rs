use std::sync::Arc;

use shared::domain::MovieId;
use tokio::sync::{broadcast, Mutex, MutexGuard};

pub mod api;
pub mod detail;
pub mod search;
pub mod view;

pub use api::{CatalogApi, HttpCatalogApi};
pub use detail::{DetailController, DetailRequest, DetailSession};
pub use search::{SearchController, SearchRequest, SearchSession};
pub use view::{DetailPanel, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer request (or a different selection) superseded this one.
    Discarded,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    ViewChanged(ViewState),
}

struct ClientState {
    search: SearchController,
    detail: DetailController,
}

impl ClientState {
    fn view(&self) -> ViewState {
        ViewState::derive(self.search.session(), self.detail.session())
    }
}

pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    inner: Mutex<ClientState>,
    events: broadcast::Sender<ClientEvent>,
}

impl CatalogClient {
    pub fn new(api: Arc<dyn CatalogApi>, default_query: impl Into<String>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(ClientState {
                search: SearchController::new(default_query),
                detail: DetailController::new(),
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> ViewState {
        self.inner.lock().await.view()
    }

    pub async fn search_session(&self) -> SearchSession {
        self.inner.lock().await.search.session().clone()
    }

    pub async fn detail_session(&self) -> DetailSession {
        self.inner.lock().await.detail.session().clone()
    }

    pub async fn set_query(&self, text: impl Into<String>) {
        let mut guard = self.inner.lock().await;
        guard.search.set_query(text);
        self.publish(&guard);
    }

    pub async fn submit(&self, page: u32) -> Option<Resolution> {
        let request = {
            let mut guard = self.inner.lock().await;
            let request = guard.search.submit(page)?;
            self.publish(&guard);
            request
        };
        Some(self.run_search(request).await)
    }

    /// Returns `None` when the target page is out of range.
    pub async fn go_to_page(&self, delta: i64) -> Option<Resolution> {
        let request = {
            let mut guard = self.inner.lock().await;
            let request = guard.search.go_to_page(delta)?;
            self.publish(&guard);
            request
        };
        Some(self.run_search(request).await)
    }

    pub async fn open_detail(&self, id: MovieId) -> Resolution {
        let request = {
            let mut guard = self.inner.lock().await;
            let request = guard.detail.open(id);
            self.publish(&guard);
            request
        };

        let outcome = self.api.fetch_detail(request.id).await;
        let mut guard = self.inner.lock().await;
        let resolution = guard.detail.on_response(request, outcome);
        if resolution == Resolution::Applied {
            self.publish(&guard);
        }
        resolution
    }

    pub async fn close_detail(&self) {
        let mut guard = self.inner.lock().await;
        guard.detail.close();
        self.publish(&guard);
    }

    async fn run_search(&self, request: SearchRequest) -> Resolution {
        let outcome = self.api.search(&request.query, request.page).await;
        let mut guard = self.inner.lock().await;
        let resolution = guard.search.on_response(&request, outcome);
        if resolution == Resolution::Applied {
            self.publish(&guard);
        }
        resolution
    }

    fn publish(&self, guard: &MutexGuard<'_, ClientState>) {
        let _ = self.events.send(ClientEvent::ViewChanged(guard.view()));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
