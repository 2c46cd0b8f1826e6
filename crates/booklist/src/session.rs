use booklist_core::generation::{SearchGeneration, Ticket};
use booklist_core::search::SearchOutcome;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::client::BooksClient;

/// A finished search, tagged with the ticket it was started under
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: Ticket,
    pub query: String,
    pub outcome: SearchOutcome,
}

/// Runs at most one search at a time
///
/// Submitting a new query aborts the in-flight request and advances the
/// generation, so a late completion from an earlier query is never accepted.
pub struct SearchSession {
    client: BooksClient,
    generation: Arc<SearchGeneration>,
    in_flight: Option<JoinHandle<()>>,
    completions: async_channel::Sender<Completion>,
}

impl SearchSession {
    pub fn new(client: BooksClient) -> (Self, async_channel::Receiver<Completion>) {
        let (tx, rx) = async_channel::unbounded();

        let session = Self {
            client,
            generation: Arc::new(SearchGeneration::new()),
            in_flight: None,
            completions: tx,
        };

        (session, rx)
    }

    /// Start a search for `query`, replacing any pending one
    pub fn submit(&mut self, query: impl Into<String>) -> Ticket {
        self.abort_in_flight();

        let query = query.into();
        let ticket = self.generation.begin();
        let client = self.client.clone();
        let generation = Arc::clone(&self.generation);
        let completions = self.completions.clone();

        log::debug!("Starting search #{} for {query:?}", ticket.value());

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = client.search(&query).await;

            if !generation.is_current(ticket) {
                log::debug!("Dropping stale search #{}", ticket.value());
                return;
            }

            let completion = Completion {
                ticket,
                query,
                outcome,
            };
            if completions.send(completion).await.is_err() {
                log::debug!("Search #{} finished after the session closed", ticket.value());
            }
        }));

        ticket
    }

    /// Pass a completion through only if it belongs to the latest search
    pub fn accept(&self, completion: Completion) -> Option<Completion> {
        if self.generation.is_current(completion.ticket) {
            Some(completion)
        } else {
            log::debug!("Discarding stale completion #{}", completion.ticket.value());
            None
        }
    }

    /// Abort the pending search, if any, and invalidate its ticket
    pub fn cancel(&mut self) {
        self.abort_in_flight();
        self.generation.begin();
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                log::info!("Cancelling pending search");
            }
            handle.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
