use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::api::{decode, CountryRecord, Endpoint, FetchError, GlobalSnapshot, HistoricalSeries, Scope, Source};

/// Identifies the selection a history request was issued for. Only the
/// response carrying the current tag may replace the history slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTag(u64);

impl RequestTag {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A request for one state slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Global,
    Countries,
    History { scope: Scope, tag: RequestTag },
}

/// Completion of a [`FetchRequest`], already decoded and normalized.
#[derive(Debug)]
pub enum FetchEvent {
    Global(Result<GlobalSnapshot, FetchError>),
    Countries(Result<Vec<CountryRecord>, FetchError>),
    History {
        scope: Scope,
        tag: RequestTag,
        result: Result<HistoricalSeries, FetchError>,
    },
}

/// Issues fetch requests on behalf of the dashboard controller.
pub trait Dispatch {
    fn dispatch(&mut self, request: FetchRequest);
}

/// Resolve a request against `source`. Never panics; failures are carried
/// in the returned event.
pub fn resolve<S: Source + ?Sized>(source: &S, request: FetchRequest) -> FetchEvent {
    match request {
        FetchRequest::Global => FetchEvent::Global(source.get(&Endpoint::Global).and_then(decode::global)),
        FetchRequest::Countries => FetchEvent::Countries(source.get(&Endpoint::Countries).and_then(decode::countries)),
        FetchRequest::History { scope, tag } => {
            let result = source
                .get(&Endpoint::History(scope.clone()))
                .and_then(|body| decode::history(&scope, body));
            FetchEvent::History { scope, tag, result }
        }
    }
}

/// Runs each request on its own worker thread and posts the completion back
/// over a channel drained by the UI loop, so state is only ever touched on
/// the UI thread.
pub struct Fetcher<S> {
    source: Arc<S>,
    events: Sender<FetchEvent>,
}

impl<S: Source> Fetcher<S> {
    pub fn new(source: S) -> (Self, Receiver<FetchEvent>) {
        let (events, receiver) = mpsc::channel();
        (
            Self {
                source: Arc::new(source),
                events,
            },
            receiver,
        )
    }
}

impl<S: Source> Dispatch for Fetcher<S> {
    fn dispatch(&mut self, request: FetchRequest) {
        debug!(?request, "Dispatching fetch");
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        let spawned = thread::Builder::new().name("fetch".into()).spawn(move || {
            let event = resolve(source.as_ref(), request);
            // The receiver is gone once the dashboard has shut down
            let _ = events.send(event);
        });
        if let Err(e) = spawned {
            warn!(error = %e, "Could not spawn fetch worker");
        }
    }
}
