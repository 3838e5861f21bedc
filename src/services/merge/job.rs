use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ports::content_provider::{ContentProvider, ContentRef};

use super::{MergeResult, MergeService, ProgressSink, ProgressUpdate};

/// Silence after which the event stream emits a ping instead of waiting further.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// One frame of the merge event stream, in its wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MergeEvent {
    Progress(ProgressUpdate),
    Complete {
        complete: bool,
        result: Box<MergeResult>,
    },
    Error {
        error: String,
    },
    Ping {
        ping: bool,
    },
}

impl MergeEvent {
    pub fn complete(result: MergeResult) -> Self {
        MergeEvent::Complete {
            complete: true,
            result: Box::new(result),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        MergeEvent::Error {
            error: message.into(),
        }
    }

    pub fn ping() -> Self {
        MergeEvent::Ping { ping: true }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MergeEvent::Complete { .. } | MergeEvent::Error { .. })
    }
}

/// Forwards progress into an unbounded channel so the merge never waits on the reader.
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<MergeEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::UnboundedSender<MergeEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn send(&self, update: ProgressUpdate) {
        // The reader may have gone away; the merge still runs to the end.
        let _ = self.tx.send(MergeEvent::Progress(update));
    }
}

/// A merge running on its own task, observed through an ordered event channel.
///
/// The worker pushes progress and exactly one terminal event. Readers drain the channel
/// first and await the worker afterwards, so the worker is always finished by the time the
/// stream ends.
pub struct MergeJob {
    events: mpsc::UnboundedReceiver<MergeEvent>,
    worker: JoinHandle<()>,
}

impl MergeJob {
    pub fn spawn<P>(
        service: Arc<MergeService<P>>,
        sources: Vec<ContentRef>,
        name: String,
        keep_it_tidy: bool,
    ) -> Self
    where
        P: ContentProvider + ?Sized + 'static,
    {
        let (tx, events) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            let sink = Arc::new(ChannelProgressSink::new(tx.clone()));
            let terminal = match service.merge(&sources, &name, keep_it_tidy, sink).await {
                Ok(result) => MergeEvent::complete(result),
                Err(e) => {
                    log::error!("Merge into '{}' failed: {}", name, e);
                    MergeEvent::error(e.to_string())
                }
            };
            let _ = tx.send(terminal);
        });

        Self { events, worker }
    }

    /// Turns the job into an event stream that ends after the terminal event.
    ///
    /// A ping is yielded whenever nothing arrives for `keepalive`. If the worker dies
    /// without reporting, an error event is synthesized so the stream still terminates
    /// with one.
    pub fn into_stream(self, keepalive: Duration) -> impl Stream<Item = MergeEvent> {
        let MergeJob { mut events, worker } = self;

        async_stream::stream! {
            let mut saw_terminal = false;
            loop {
                match tokio::time::timeout(keepalive, events.recv()).await {
                    Ok(Some(event)) => {
                        saw_terminal = event.is_terminal();
                        yield event;
                        if saw_terminal {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(_) => yield MergeEvent::ping(),
                }
            }

            if let Err(e) = worker.await {
                log::error!("Merge worker did not finish cleanly: {}", e);
            }
            if !saw_terminal {
                yield MergeEvent::error("Merge stopped unexpectedly");
            }
        }
    }
}
