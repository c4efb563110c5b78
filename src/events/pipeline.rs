//! # EventPipeline: ordered, fault-isolated delivery of facade callbacks.
//!
//! The facade pushes list-changed events from its own concurrency domain;
//! the pipeline turns that push stream into FIFO notifications on a single
//! dedicated consumer task, so producers are never blocked and a failing
//! listener never halts delivery.
//!
//! ## Architecture
//! ```text
//! facade callback ──► EventSink::push ──► [unbounded queue] ──► consumer task
//!   (any context)        (non-blocking,                            │
//!                         never fails)                             ├─► IdentityClassifier
//!                                                                  ├─► pull buffer (poll_next)
//!                                                                  └─► listeners for kind,
//!                                                                      registration order
//!                                                                        └─ panic caught, logged
//! ```
//!
//! ## Rules
//! - `EventSink::push` never blocks and never fails; enqueued envelopes are
//!   only lost after `shutdown` completes.
//! - Exactly one consumer drains the queue in FIFO order; listener
//!   notification for one envelope is sequential across listeners.
//! - `subscribe`/`unsubscribe` are safe concurrently with delivery; a
//!   listener removed mid-notification may still observe the in-flight
//!   envelope (best-effort).
//! - `poll_next` draws from the same ordered sequence as push delivery, so
//!   events are simultaneously pushed to listeners and retrievable by pull.
//! - `shutdown(grace)` is bounded: the consumer finishes its current
//!   envelope or is abandoned when the grace elapses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::SessionError;
use crate::events::envelope::{Delivery, EventEnvelope};
use crate::events::identity::{IdentityClassifier, Origin};
use crate::events::listener::Listen;
use crate::facade::StreamKind;

/// Handle identifying one registered listener, returned by
/// [`EventPipeline::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: u64,
    name: &'static str,
    listener: Arc<dyn Listen>,
}

/// State shared between the pipeline handle, its sinks, and the consumer.
struct Shared {
    /// Per-kind listener lists in registration order.
    subs: RwLock<[Vec<Registration>; 2]>,
    /// Pull-side buffer fed by the consumer.
    buffer: Mutex<VecDeque<EventEnvelope>>,
    identity: IdentityClassifier,
    /// Set by `shutdown`; sinks drop pushes afterwards.
    closed: AtomicBool,
}

/// Producer handle handed to the facade's push callback.
///
/// Cheap to clone; callable from any context.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<EventEnvelope>,
    shared: Arc<Shared>,
}

impl EventSink {
    /// Enqueues one envelope for delivery.
    ///
    /// Never blocks the producer and never fails. After the pipeline has
    /// shut down the envelope is silently dropped.
    pub fn push(&self, envelope: EventEnvelope) {
        if self.shared.closed.load(Ordering::Acquire) {
            tracing::trace!(kind = %envelope.kind, "pipeline closed; envelope dropped");
            return;
        }
        if self.tx.send(envelope).is_err() {
            // Consumer abandoned after a stalled shutdown; nothing to do.
            tracing::trace!("pipeline consumer gone; envelope dropped");
        }
    }
}

/// Single-consumer delivery pipeline for inbound facade events.
pub struct EventPipeline {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<EventEnvelope>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<EventEnvelope>>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    next_id: AtomicU64,
}

impl Default for EventPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPipeline {
    /// Creates an idle pipeline; call [`EventPipeline::start`] to launch the
    /// consumer.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                subs: RwLock::new([Vec::new(), Vec::new()]),
                buffer: Mutex::new(VecDeque::new()),
                identity: IdentityClassifier::new(),
                closed: AtomicBool::new(false),
            }),
            tx,
            rx: Mutex::new(Some(rx)),
            consumer: Mutex::new(None),
            cancel: CancellationToken::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns a producer handle for the facade's push callback.
    pub fn sink(&self) -> EventSink {
        EventSink {
            tx: self.tx.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Registers a listener for one stream kind.
    ///
    /// Listeners are notified in registration order. Many listeners per kind
    /// are allowed; registration is safe concurrently with delivery.
    pub fn subscribe(&self, kind: StreamKind, listener: Arc<dyn Listen>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = listener.name();
        let mut subs = self
            .shared
            .subs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs[kind.index()].push(Registration { id, name, listener });
        tracing::debug!(%kind, listener = name, "listener subscribed");
        SubscriptionId(id)
    }

    /// Removes a previously registered listener.
    ///
    /// Returns `false` if the id is unknown (already removed). A listener
    /// removed mid-notification may still observe the in-flight envelope.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self
            .shared
            .subs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for per_kind in subs.iter_mut() {
            if let Some(pos) = per_kind.iter().position(|r| r.id == id.0) {
                let removed = per_kind.remove(pos);
                tracing::debug!(listener = removed.name, "listener unsubscribed");
                return true;
            }
        }
        false
    }

    /// Launches the single consumer task.
    ///
    /// Subsequent calls are no-ops; exactly one consumer ever runs per
    /// pipeline, which is what keeps delivery FIFO and the identity
    /// classifier race-free.
    pub fn start(&self) {
        let mut slot = self
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            tracing::warn!("pipeline consumer already running");
            return;
        }
        let Some(rx) = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            tracing::warn!("pipeline was already shut down");
            return;
        };

        let shared = Arc::clone(&self.shared);
        let cancel = self.cancel.clone();
        *slot = Some(tokio::spawn(consume(rx, shared, cancel)));
    }

    /// Retrieves the next envelope from the pull-side buffer, if any.
    ///
    /// The buffer observes the same FIFO sequence that push listeners see.
    pub fn poll_next(&self) -> Option<EventEnvelope> {
        self.shared
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Number of envelopes currently waiting in the pull-side buffer.
    pub fn pending(&self) -> usize {
        self.shared
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Own station identity learned for a stream, or `None` before the
    /// first envelope arrived on it.
    pub fn own_station_id(&self, kind: StreamKind) -> Option<u32> {
        self.shared.identity.own_station_id(kind)
    }

    /// Stops the pipeline within a bounded grace period.
    ///
    /// New pushes are rejected immediately; the consumer finishes its
    /// current envelope and exits. If it does not exit within `grace`
    /// (a stuck listener), it is aborted rather than awaited further, any
    /// envelopes still queued are discarded, and
    /// [`SessionError::DeliveryStalled`] is returned.
    pub async fn shutdown(&self, grace: Duration) -> Result<(), SessionError> {
        self.shared.closed.store(true, Ordering::Release);
        self.cancel.cancel();

        let handle = self
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut handle) = handle else {
            return Ok(());
        };

        match time::timeout(grace, &mut handle).await {
            Ok(_) => {
                tracing::debug!("pipeline consumer stopped");
                Ok(())
            }
            Err(_) => {
                handle.abort();
                tracing::warn!(grace_ms = grace.as_millis() as u64, "pipeline consumer stuck; abandoned");
                Err(SessionError::DeliveryStalled { grace })
            }
        }
    }
}

/// Consumer loop: FIFO drain, classify, buffer, fan out.
async fn consume(
    mut rx: mpsc::UnboundedReceiver<EventEnvelope>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) {
    loop {
        let envelope = tokio::select! {
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(envelope) => envelope,
                None => break,
            },
        };
        deliver(&shared, envelope).await;
    }
    tracing::debug!("pipeline consumer exited");
}

/// Delivers one envelope: classification, pull buffer, then listeners in
/// registration order. Listener panics are caught and logged.
async fn deliver(shared: &Shared, envelope: EventEnvelope) {
    let origin = shared
        .identity
        .classify(envelope.kind, envelope.origin_station_id);
    let delivery = Delivery::classified(&envelope, origin == Origin::Own);

    shared
        .buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(envelope);

    // Snapshot under the read lock so unsubscribe never tears the walk.
    let targets: Vec<(&'static str, Arc<dyn Listen>)> = {
        let subs = shared.subs.read().unwrap_or_else(PoisonError::into_inner);
        subs[delivery.kind.index()]
            .iter()
            .map(|r| (r.name, Arc::clone(&r.listener)))
            .collect()
    };

    for (name, listener) in targets {
        let fut = listener.on_message(delivery.as_ref());
        if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            tracing::error!(
                listener = name,
                kind = %delivery.kind,
                panic = ?panic_err,
                "listener panicked; continuing delivery"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::envelope::{CamData, DenmData};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct Recorder {
        seen: StdMutex<Vec<u32>>,
    }

    impl Recorder {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<u32> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Listen for Recorder {
        async fn on_message(&self, delivery: &Delivery) {
            self.seen.lock().unwrap().push(delivery.origin_station_id);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    /// Panics on the given station id, records everything else.
    struct Grumpy {
        poison: u32,
        seen: StdMutex<Vec<u32>>,
    }

    #[async_trait]
    impl Listen for Grumpy {
        async fn on_message(&self, delivery: &Delivery) {
            if delivery.origin_station_id == self.poison {
                panic!("grumpy listener rejects {}", self.poison);
            }
            self.seen.lock().unwrap().push(delivery.origin_station_id);
        }

        fn name(&self) -> &'static str {
            "grumpy"
        }
    }

    /// Never finishes processing its first envelope.
    struct Stuck;

    #[async_trait]
    impl Listen for Stuck {
        async fn on_message(&self, _delivery: &Delivery) {
            futures::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }
    }

    fn cam(station: u32) -> EventEnvelope {
        EventEnvelope::cam(
            station,
            CamData {
                latitude: 48.866667,
                longitude: 2.333333,
                speed_kmh: 50.0,
            },
            station as u64,
        )
    }

    fn denm(station: u32) -> EventEnvelope {
        EventEnvelope::denm(
            station,
            DenmData {
                cause_code: 2,
                sub_cause_code: 1,
            },
            station as u64,
        )
    }

    async fn settle(pipeline: &EventPipeline, expected_pending: usize) {
        for _ in 0..200 {
            if pipeline.pending() >= expected_pending {
                return;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        panic!("pipeline did not settle");
    }

    #[tokio::test]
    async fn test_fifo_order_per_listener() {
        let pipeline = EventPipeline::new();
        let recorder = Recorder::arc();
        pipeline.subscribe(StreamKind::Cam, recorder.clone());
        pipeline.start();

        let sink = pipeline.sink();
        for station in [10, 20, 30, 40, 50] {
            sink.push(cam(station));
        }

        settle(&pipeline, 5).await;
        assert_eq!(recorder.seen(), vec![10, 20, 30, 40, 50]);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_producers_keep_per_producer_order() {
        let pipeline = EventPipeline::new();
        let recorder = Recorder::arc();
        pipeline.subscribe(StreamKind::Cam, recorder.clone());
        pipeline.start();

        // Two producers interleave arbitrarily; each producer's own pushes
        // must still come out in push order.
        let first = pipeline.sink();
        let second = pipeline.sink();
        let push_first = tokio::spawn(async move {
            for station in 1000..1050 {
                first.push(cam(station));
                tokio::task::yield_now().await;
            }
        });
        let push_second = tokio::spawn(async move {
            for station in 2000..2050 {
                second.push(cam(station));
                tokio::task::yield_now().await;
            }
        });
        push_first.await.unwrap();
        push_second.await.unwrap();

        settle(&pipeline, 100).await;
        let seen = recorder.seen();
        assert_eq!(seen.len(), 100);
        let from_first: Vec<u32> = seen.iter().copied().filter(|s| *s < 2000).collect();
        let from_second: Vec<u32> = seen.iter().copied().filter(|s| *s >= 2000).collect();
        assert_eq!(from_first, (1000..1050).collect::<Vec<u32>>());
        assert_eq!(from_second, (2000..2050).collect::<Vec<u32>>());
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_listeners_notified_in_registration_order() {
        let pipeline = EventPipeline::new();
        let order = Arc::new(StdMutex::new(Vec::new()));

        struct Tagged {
            tag: &'static str,
            order: Arc<StdMutex<Vec<&'static str>>>,
        }

        #[async_trait]
        impl Listen for Tagged {
            async fn on_message(&self, _delivery: &Delivery) {
                self.order.lock().unwrap().push(self.tag);
            }
            fn name(&self) -> &'static str {
                self.tag
            }
        }

        pipeline.subscribe(
            StreamKind::Denm,
            Arc::new(Tagged {
                tag: "first",
                order: order.clone(),
            }),
        );
        pipeline.subscribe(
            StreamKind::Denm,
            Arc::new(Tagged {
                tag: "second",
                order: order.clone(),
            }),
        );
        pipeline.start();

        pipeline.sink().push(denm(99));
        settle(&pipeline, 1).await;

        assert_eq!(order.lock().unwrap().clone(), vec!["first", "second"]);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_listener_is_isolated() {
        let pipeline = EventPipeline::new();
        let grumpy = Arc::new(Grumpy {
            poison: 20,
            seen: StdMutex::new(Vec::new()),
        });
        let recorder = Recorder::arc();
        pipeline.subscribe(StreamKind::Cam, grumpy.clone());
        pipeline.subscribe(StreamKind::Cam, recorder.clone());
        pipeline.start();

        let sink = pipeline.sink();
        sink.push(cam(10));
        sink.push(cam(20)); // grumpy panics here
        sink.push(cam(30));

        settle(&pipeline, 3).await;
        // Grumpy missed only the envelope it panicked on.
        assert_eq!(grumpy.seen.lock().unwrap().clone(), vec![10, 30]);
        // The second listener saw everything, including the poison envelope.
        assert_eq!(recorder.seen(), vec![10, 20, 30]);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_pull_buffer_sees_same_sequence_as_push() {
        let pipeline = EventPipeline::new();
        let recorder = Recorder::arc();
        pipeline.subscribe(StreamKind::Cam, recorder.clone());
        pipeline.start();

        let sink = pipeline.sink();
        sink.push(cam(1));
        sink.push(cam(2));
        settle(&pipeline, 2).await;

        assert_eq!(pipeline.pending(), 2);
        assert_eq!(pipeline.poll_next().map(|e| e.origin_station_id), Some(1));
        assert_eq!(pipeline.poll_next().map(|e| e.origin_station_id), Some(2));
        assert_eq!(pipeline.poll_next(), None);
        assert_eq!(recorder.seen(), vec![1, 2]);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_stops_receiving() {
        let pipeline = EventPipeline::new();
        let recorder = Recorder::arc();
        let id = pipeline.subscribe(StreamKind::Cam, recorder.clone());
        pipeline.start();

        let sink = pipeline.sink();
        sink.push(cam(1));
        settle(&pipeline, 1).await;

        assert!(pipeline.unsubscribe(id));
        assert!(!pipeline.unsubscribe(id));

        sink.push(cam(2));
        settle(&pipeline, 2).await;
        assert_eq!(recorder.seen(), vec![1]);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delivery_classifies_own_and_other() {
        let pipeline = EventPipeline::new();
        let own_flags = Arc::new(StdMutex::new(Vec::new()));

        struct Flags {
            own_flags: Arc<StdMutex<Vec<bool>>>,
        }

        #[async_trait]
        impl Listen for Flags {
            async fn on_message(&self, delivery: &Delivery) {
                self.own_flags.lock().unwrap().push(delivery.is_own);
            }
        }

        pipeline.subscribe(
            StreamKind::Cam,
            Arc::new(Flags {
                own_flags: own_flags.clone(),
            }),
        );
        pipeline.start();

        let sink = pipeline.sink();
        sink.push(cam(7001));
        sink.push(cam(4242));
        sink.push(cam(7001));
        settle(&pipeline, 3).await;

        assert_eq!(own_flags.lock().unwrap().clone(), vec![true, false, true]);
        assert_eq!(pipeline.own_station_id(StreamKind::Cam), Some(7001));
        assert_eq!(pipeline.own_station_id(StreamKind::Denm), None);
        pipeline.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_bounded_with_stuck_listener() {
        let pipeline = EventPipeline::new();
        pipeline.subscribe(StreamKind::Cam, Arc::new(Stuck));
        pipeline.start();

        let sink = pipeline.sink();
        sink.push(cam(1));
        // Queue depth behind the stuck envelope must not extend shutdown.
        for station in 2..100 {
            sink.push(cam(station));
        }
        time::sleep(Duration::from_millis(20)).await;

        let started = std::time::Instant::now();
        let err = pipeline.shutdown(Duration::from_millis(100)).await;
        assert!(matches!(err, Err(SessionError::DeliveryStalled { .. })));
        assert!(started.elapsed() < Duration::from_secs(2));

        // Sink pushes after shutdown are dropped silently.
        sink.push(cam(200));
    }

    #[tokio::test]
    async fn test_clean_shutdown_returns_ok() {
        let pipeline = EventPipeline::new();
        pipeline.start();
        pipeline.sink().push(cam(1));
        settle(&pipeline, 1).await;
        assert!(pipeline.shutdown(Duration::from_secs(1)).await.is_ok());
    }
}
