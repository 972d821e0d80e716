//! Paginated visitor history.

use tokio::sync::RwLock;

use crate::api::VISITS_PAGE_SIZE;
use crate::errors::ClientError;
use crate::inflight::InFlight;
use crate::models::{Visit, VisitStatus};
use crate::AppContext;

const FETCH_KEY: &str = "fetch visits";

/// What the history screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitListState {
    /// Server order, pages appended as they arrive
    pub visits: Vec<Visit>,
    /// Last page fetched successfully, 0 before the first fetch
    pub current_page: u32,
    pub total_visits: usize,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_refreshing: bool,
    /// Single user-visible error message
    pub error: Option<String>,
    /// Page to request again on retry
    pub failed_page: Option<u32>,
}

impl Default for VisitListState {
    fn default() -> Self {
        Self {
            visits: Vec::new(),
            current_page: 0,
            total_visits: 0,
            has_more: true,
            is_loading: false,
            is_refreshing: false,
            error: None,
            failed_page: None,
        }
    }
}

pub struct VisitorList {
    ctx: AppContext,
    state: RwLock<VisitListState>,
    inflight: InFlight,
}

impl VisitorList {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: RwLock::new(VisitListState::default()),
            inflight: InFlight::new(),
        }
    }

    /// Fetch one page of the signed-in user's visits.
    ///
    /// Page 1 and refreshes replace the list; later pages append, skipping
    /// visits already present. More pages remain while the list is below the
    /// server total and the last page was full and added something. On failure the error message is recorded,
    /// pagination stops and the page is remembered for [`retry`](Self::retry).
    pub async fn fetch_page(&self, page: u32, is_refresh: bool) -> Result<(), ClientError> {
        let page = page.max(1);

        let user = match self.ctx.session.require_user().await {
            Ok(user) => user,
            Err(e) => {
                let mut state = self.state.write().await;
                state.error = Some(e.message());
                state.is_loading = false;
                return Err(e);
            }
        };

        let _guard = self.inflight.begin(FETCH_KEY)?;

        {
            let mut state = self.state.write().await;
            if is_refresh {
                state.is_refreshing = true;
            } else {
                state.is_loading = true;
            }
            if is_refresh || page == 1 {
                state.error = None;
            }
        }

        let result = self
            .ctx
            .api
            .list_visits(&user.access_token, &user.id, page, VISITS_PAGE_SIZE)
            .await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        state.is_refreshing = false;

        match result {
            Ok(resp) => {
                let received = resp.visits.len();
                let fetched = resp.visits.into_iter().map(Visit::from_remote);
                let added = if is_refresh || page == 1 {
                    state.visits = fetched.collect();
                    state.visits.len()
                } else {
                    let before = state.visits.len();
                    for visit in fetched {
                        if !state.visits.iter().any(|existing| existing.id == visit.id) {
                            state.visits.push(visit);
                        }
                    }
                    state.visits.len() - before
                };

                state.current_page = page;
                state.total_visits = resp.total_visits;
                // A short page or one with nothing new ends the history even
                // when the server total was never reached.
                state.has_more = state.visits.len() < resp.total_visits
                    && received >= VISITS_PAGE_SIZE as usize
                    && added > 0;
                state.error = None;
                state.failed_page = None;
                tracing::debug!(
                    "Loaded page {} ({} of {} visits)",
                    page,
                    state.visits.len(),
                    resp.total_visits
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error fetching visitors: {}", e);
                state.error = Some(e.message());
                state.failed_page = Some(page);
                state.has_more = false;
                Err(e)
            }
        }
    }

    /// Pull-to-refresh: page 1 again, replacing the list.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.fetch_page(1, true).await
    }

    /// Fetch the next page. Returns `Ok(false)` without a request when a fetch
    /// is already running or there is nothing more to load.
    pub async fn load_more(&self) -> Result<bool, ClientError> {
        if self.inflight.is_active(FETCH_KEY) {
            return Ok(false);
        }
        let next_page = {
            let state = self.state.read().await;
            if !state.has_more {
                return Ok(false);
            }
            state.current_page + 1
        };

        match self.fetch_page(next_page, false).await {
            Ok(()) => Ok(true),
            Err(ClientError::Busy(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Request the page that failed last, or page 1 if nothing failed.
    pub async fn retry(&self) -> Result<(), ClientError> {
        let page = self.state.read().await.failed_page.unwrap_or(1);
        self.fetch_page(page, false).await
    }

    pub async fn snapshot(&self) -> VisitListState {
        self.state.read().await.clone()
    }

    pub async fn visits(&self) -> Vec<Visit> {
        self.state.read().await.visits.clone()
    }

    /// Visits still waiting for a decision.
    pub async fn pending(&self) -> Vec<Visit> {
        self.state
            .read()
            .await
            .visits
            .iter()
            .filter(|visit| visit.is_pending())
            .cloned()
            .collect()
    }

    pub async fn find(&self, visit_id: &str) -> Option<Visit> {
        self.state
            .read()
            .await
            .visits
            .iter()
            .find(|visit| visit.id == visit_id)
            .cloned()
    }

    /// Record a server-confirmed decision. Only a pending visit changes;
    /// returns whether one did.
    pub async fn apply_decision(&self, visit_id: &str, status: VisitStatus) -> bool {
        if status == VisitStatus::Pending {
            return false;
        }
        let mut state = self.state.write().await;
        let Some(visit) = state
            .visits
            .iter_mut()
            .find(|visit| visit.id == visit_id && visit.is_pending())
        else {
            return false;
        };
        visit.status = status;
        state.error = None;
        true
    }

    pub async fn set_error(&self, message: impl Into<String>) {
        self.state.write().await.error = Some(message.into());
    }
}
