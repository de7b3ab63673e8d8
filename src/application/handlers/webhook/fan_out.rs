//! NotificationFanOut - supervised concurrent dispatch to every channel.
//!
//! A supervisor task owns a `JoinSet` with one task per notifier. Channel
//! errors and panics are caught per task and logged with the channel name;
//! they never reach sibling tasks or the webhook response. The returned
//! handle only yields the collected report, it is not needed for delivery.
//!
//! Supervisors are spawned on a `TaskTracker` so shutdown can wait for them
//! and name the channels still running when the grace period runs out.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::application::handlers::notification::OrderNotifier;
use crate::domain::notification::{Channel, FanOutReport, NotificationOutcome};
use crate::domain::order::Order;

type InFlight = Arc<Mutex<HashSet<(String, Channel)>>>;

/// Clones share the same tracker and in-flight set.
#[derive(Clone)]
pub struct NotificationFanOut {
    notifiers: Vec<Arc<dyn OrderNotifier>>,
    tracker: TaskTracker,
    in_flight: InFlight,
}

impl NotificationFanOut {
    pub fn new(notifiers: Vec<Arc<dyn OrderNotifier>>) -> Self {
        Self {
            notifiers,
            tracker: TaskTracker::new(),
            in_flight: Arc::default(),
        }
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.notifiers.iter().map(|n| n.channel()).collect()
    }

    /// Launches every notifier for `order` and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, order: Order) -> JoinHandle<FanOutReport> {
        let order = Arc::new(order);
        let notifiers = self.notifiers.clone();
        let in_flight = Arc::clone(&self.in_flight);
        for notifier in &notifiers {
            mark(&in_flight, &order.mrc_order_id, notifier.channel(), true);
        }

        self.tracker.spawn(async move {
            let mut tasks = JoinSet::new();
            let mut dispatched = Vec::with_capacity(notifiers.len());

            for notifier in notifiers {
                let channel = notifier.channel();
                dispatched.push(channel);
                let order = Arc::clone(&order);
                let in_flight = Arc::clone(&in_flight);

                tasks.spawn(async move {
                    let result = notifier.notify(&order).await;
                    mark(&in_flight, &order.mrc_order_id, channel, false);
                    match &result {
                        Ok(receipt) => info!(
                            channel = %channel,
                            mrc_order_id = %order.mrc_order_id,
                            reference = receipt.reference.as_deref().unwrap_or("-"),
                            "Notification delivered"
                        ),
                        Err(e) => warn!(
                            channel = %channel,
                            mrc_order_id = %order.mrc_order_id,
                            error = %e,
                            "Notification failed"
                        ),
                    }
                    NotificationOutcome::from_result(channel, &result)
                });
            }

            let mut report = FanOutReport::default();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(outcome) => report.push(outcome),
                    Err(e) => error!(
                        mrc_order_id = %order.mrc_order_id,
                        error = %e,
                        "Notification task aborted"
                    ),
                }
            }

            // A panicked task leaves no outcome; record it against its channel.
            for channel in dispatched {
                if report.outcome(channel).is_none() {
                    mark(&in_flight, &order.mrc_order_id, channel, false);
                    report.push(NotificationOutcome::failed(channel, "notification task aborted"));
                }
            }

            info!(
                mrc_order_id = %order.mrc_order_id,
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Notification fan-out finished"
            );
            report
        })
    }

    /// Waits up to `grace` for every dispatched fan-out to finish.
    ///
    /// Returns the `(mrc_order_id, channel)` pairs still running when the
    /// wait elapsed; each is logged at error level since a replayed webhook
    /// will not dispatch it again.
    pub async fn drain(&self, grace: Duration) -> Vec<(String, Channel)> {
        self.tracker.close();
        if tokio::time::timeout(grace, self.tracker.wait()).await.is_ok() {
            info!("Notification fan-outs drained");
            return Vec::new();
        }

        let mut abandoned: Vec<(String, Channel)> = match self.in_flight.lock() {
            Ok(set) => set.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        };
        abandoned.sort_by(|a, b| a.0.cmp(&b.0));
        for (mrc_order_id, channel) in &abandoned {
            error!(
                mrc_order_id = %mrc_order_id,
                channel = %channel,
                "Notification abandoned at shutdown"
            );
        }
        abandoned
    }
}

fn mark(in_flight: &InFlight, mrc_order_id: &str, channel: Channel, running: bool) {
    let mut set = match in_flight.lock() {
        Ok(set) => set,
        Err(poisoned) => poisoned.into_inner(),
    };
    if running {
        set.insert((mrc_order_id.to_string(), channel));
    } else {
        set.remove(&(mrc_order_id.to_string(), channel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{NotificationError, Receipt};
    use crate::domain::order::fixtures::pending_order;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Succeed,
        Fail,
        Panic,
        Slow(Duration),
    }

    struct StubNotifier {
        channel: Channel,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl StubNotifier {
        fn new(channel: Channel, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                channel,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl OrderNotifier for StubNotifier {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn notify(&self, _order: &Order) -> Result<Receipt, NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Succeed => Ok(Receipt::default()),
                Behaviour::Fail => Err(NotificationError::unavailable("connection refused")),
                Behaviour::Panic => panic!("notifier bug"),
                Behaviour::Slow(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(Receipt::default())
                }
            }
        }
    }

    #[tokio::test]
    async fn every_channel_runs_once() {
        let stubs: Vec<Arc<StubNotifier>> = Channel::ALL
            .iter()
            .map(|c| StubNotifier::new(*c, Behaviour::Succeed))
            .collect();
        let fan_out = NotificationFanOut::new(
            stubs.iter().map(|s| s.clone() as Arc<dyn OrderNotifier>).collect(),
        );

        let report = fan_out.dispatch(pending_order("ORDER_1")).await.unwrap();

        assert_eq!(report.succeeded(), 5);
        for stub in &stubs {
            assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn failing_channel_does_not_affect_siblings() {
        let messaging = StubNotifier::new(Channel::Messaging, Behaviour::Fail);
        let invoice = StubNotifier::new(Channel::Invoice, Behaviour::Succeed);
        let fan_out = NotificationFanOut::new(vec![
            messaging.clone() as Arc<dyn OrderNotifier>,
            invoice.clone() as Arc<dyn OrderNotifier>,
        ]);

        let report = fan_out.dispatch(pending_order("ORDER_1")).await.unwrap();

        assert!(!report.outcome(Channel::Messaging).unwrap().success);
        assert!(report.outcome(Channel::Invoice).unwrap().success);
    }

    #[tokio::test]
    async fn panicking_channel_is_recorded_and_isolated() {
        let ticketing = StubNotifier::new(Channel::Ticketing, Behaviour::Panic);
        let email = StubNotifier::new(Channel::CustomerEmail, Behaviour::Succeed);
        let fan_out = NotificationFanOut::new(vec![
            ticketing as Arc<dyn OrderNotifier>,
            email.clone() as Arc<dyn OrderNotifier>,
        ]);

        let report = fan_out.dispatch(pending_order("ORDER_1")).await.unwrap();

        let outcome = report.outcome(Channel::Ticketing).unwrap();
        assert!(!outcome.success);
        assert!(report.outcome(Channel::CustomerEmail).unwrap().success);
        assert_eq!(email.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_returns_before_slow_channels_finish() {
        let slow = StubNotifier::new(Channel::Invoice, Behaviour::Slow(Duration::from_millis(200)));
        let fan_out = NotificationFanOut::new(vec![slow as Arc<dyn OrderNotifier>]);

        let handle = fan_out.dispatch(pending_order("ORDER_1"));

        assert!(!handle.is_finished());
        let report = handle.await.unwrap();
        assert_eq!(report.succeeded(), 1);
    }

    #[tokio::test]
    async fn drain_waits_for_running_channels() {
        let slow = StubNotifier::new(Channel::Invoice, Behaviour::Slow(Duration::from_millis(50)));
        let fan_out = NotificationFanOut::new(vec![slow.clone() as Arc<dyn OrderNotifier>]);

        let handle = fan_out.dispatch(pending_order("ORDER_1"));
        let abandoned = fan_out.drain(Duration::from_secs(5)).await;

        assert!(abandoned.is_empty());
        assert_eq!(handle.await.unwrap().succeeded(), 1);
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drain_names_channels_still_running_after_grace() {
        let slow = StubNotifier::new(Channel::Ticketing, Behaviour::Slow(Duration::from_secs(30)));
        let quick = StubNotifier::new(Channel::CustomerEmail, Behaviour::Succeed);
        let fan_out = NotificationFanOut::new(vec![
            slow as Arc<dyn OrderNotifier>,
            quick as Arc<dyn OrderNotifier>,
        ]);

        let _handle = fan_out.dispatch(pending_order("ORDER_1"));
        let abandoned = fan_out.drain(Duration::from_millis(50)).await;

        assert_eq!(abandoned, vec![("ORDER_1".to_string(), Channel::Ticketing)]);
    }

    #[tokio::test]
    async fn cloned_fan_out_drains_dispatches_from_the_original() {
        let slow = StubNotifier::new(Channel::Messaging, Behaviour::Slow(Duration::from_millis(30)));
        let fan_out = NotificationFanOut::new(vec![slow.clone() as Arc<dyn OrderNotifier>]);
        let shared = fan_out.clone();

        fan_out.dispatch(pending_order("ORDER_1"));

        assert!(shared.drain(Duration::from_secs(5)).await.is_empty());
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }
}
