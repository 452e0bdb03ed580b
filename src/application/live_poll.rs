// Live polling - Refresh an accessor while its data is still streaming in
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::accessor::{Accessor, Resource};
use super::resources::EventDetailsResource;
use crate::domain::event::EventDetails;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Background refresh loop. Stops on its own once `keep_polling` turns
/// false for the cached value, and on `stop` or drop otherwise.
pub struct LivePoll {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LivePoll {
    pub fn start<R: Resource>(
        accessor: Arc<Accessor<R>>,
        interval: Duration,
        keep_polling: fn(&R::Value) -> bool,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(accessor, interval, keep_polling, cancel.clone()));

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Poll event details until the server reports the event complete
    pub fn streaming(accessor: Arc<Accessor<EventDetailsResource>>, interval: Duration) -> Self {
        Self::start(accessor, interval, is_streaming)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Cancel and wait for the loop to exit
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Live poll task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for LivePoll {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn is_streaming(details: &EventDetails) -> bool {
    details.is_streaming
}

async fn poll_loop<R: Resource>(
    accessor: Arc<Accessor<R>>,
    interval: Duration,
    keep_polling: fn(&R::Value) -> bool,
    cancel: CancellationToken,
) {
    let mut updates = accessor.subscribe();
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!("Live poll for {} every {:?}", R::NAME, interval);

    loop {
        if !accessor.with_value(keep_polling) {
            tracing::debug!("Live poll for {} finished", R::NAME);
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Live poll for {} cancelled", R::NAME);
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                // A response arriving after cancellation is dropped with the future
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("Live poll for {} cancelled mid-request", R::NAME);
                        break;
                    }
                    _ = accessor.refresh() => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resources::EventParams;
    use crate::infrastructure::endpoints::ApiEndpoints;
    use crate::infrastructure::http_client::{HttpResponse, MockHttpClient};
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const STREAMING: &str = r#"{"isStreaming": true, "torqueData": [1, 2], "recordLengths": [2]}"#;
    const COMPLETE: &str =
        r#"{"isStreaming": false, "torqueData": [1, 2, 3, 4], "recordLengths": [2, 2]}"#;

    /// Mock answering `streaming_responses` times with a streaming event,
    /// then with the completed one
    fn streaming_client(streaming_responses: usize) -> (MockHttpClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let body = if n < streaming_responses { STREAMING } else { COMPLETE };
            Box::pin(async move {
                Ok(HttpResponse {
                    status: 200,
                    body: Bytes::from_static(body.as_bytes()),
                })
            })
        });
        (mock, calls)
    }

    async fn mounted(mock: MockHttpClient) -> Arc<Accessor<EventDetailsResource>> {
        let params = EventParams {
            sensor_id: "1".to_string(),
            event_id: "3".to_string(),
            hidden: true,
        };
        let endpoints = ApiEndpoints::from_parts("localhost", 5000, "api_v1");
        Arc::new(Accessor::mount(Arc::new(mock), endpoints, params).await)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_streaming_ends() {
        let (mock, calls) = streaming_client(2);
        let accessor = mounted(mock).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let poll = LivePoll::streaming(accessor.clone(), DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(accessor.value().is_streaming);

        tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!accessor.value().is_streaming);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(poll.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_streaming_never_polls() {
        let (mock, calls) = streaming_client(0);
        let accessor = mounted(mock).await;

        let poll = LivePoll::streaming(accessor, DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(poll.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let (mock, calls) = streaming_client(usize::MAX);
        let accessor = mounted(mock).await;

        let poll = LivePoll::streaming(accessor, DEFAULT_POLL_INTERVAL);
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poll.stop().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (mock, calls) = streaming_client(usize::MAX);
        let accessor = mounted(mock).await;

        let poll = LivePoll::streaming(accessor, DEFAULT_POLL_INTERVAL);
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        drop(poll);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_refresh_ending_stream_stops_poll() {
        let (mock, calls) = streaming_client(1);
        let accessor = mounted(mock).await;

        let poll = LivePoll::streaming(accessor.clone(), DEFAULT_POLL_INTERVAL);

        // Manual refresh flips isStreaming before the first tick
        tokio::time::sleep(Duration::from_secs(1)).await;
        accessor.refresh().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(poll.is_finished());
    }
}
