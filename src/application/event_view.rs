// Event details view - Owns the details accessor and its live poll
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::accessor::Accessor;
use super::live_poll::LivePoll;
use super::resources::{EventDetailsAccessor, EventParams};
use crate::domain::event::EventDetails;
use crate::domain::packet::{Packet, SegmentationError};
use crate::infrastructure::endpoints::ApiEndpoints;
use crate::infrastructure::http_client::HttpClient;

pub struct EventDetailsView {
    details: Arc<EventDetailsAccessor>,
    poll: Option<LivePoll>,
    interval: Duration,
}

impl EventDetailsView {
    pub async fn mount(
        http: Arc<dyn HttpClient>,
        endpoints: ApiEndpoints,
        params: EventParams,
        interval: Duration,
    ) -> Self {
        let details = Arc::new(Accessor::mount(http, endpoints, params).await);
        let mut view = Self {
            details,
            poll: None,
            interval,
        };
        view.sync_polling();
        view
    }

    pub fn details(&self) -> EventDetails {
        self.details.value()
    }

    pub fn subscribe(&self) -> watch::Receiver<EventDetails> {
        self.details.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|poll| !poll.is_finished())
    }

    /// Start a live poll while the event is streaming, release it once done
    pub fn sync_polling(&mut self) {
        let streaming = self.details.with_value(|d| d.is_streaming);

        if streaming && !self.is_polling() {
            tracing::debug!("Event {:?} is streaming, starting live poll", self.details.params());
            self.poll = Some(LivePoll::streaming(self.details.clone(), self.interval));
        } else if !streaming && self.poll.is_some() {
            // Dropping cancels the timer
            self.poll = None;
        }
    }

    pub async fn refresh(&mut self) {
        self.details.refresh().await;
        self.sync_polling();
    }

    /// Switch between deduplicated and full data
    pub async fn set_hidden(&mut self, hidden: bool) {
        let mut params = self.details.params();
        params.hidden = hidden;
        self.details.set_params(params).await;
        self.sync_polling();
    }

    pub fn packets(&self) -> Option<Result<Vec<Packet>, SegmentationError>> {
        self.details.with_value(|d| d.packets())
    }

    /// Stop polling and wait for the timer task to exit
    pub async fn teardown(mut self) {
        if let Some(poll) = self.poll.take() {
            poll.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::{HttpResponse, MockHttpClient};
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn params(hidden: bool) -> EventParams {
        EventParams {
            sensor_id: "2".to_string(),
            event_id: "8".to_string(),
            hidden,
        }
    }

    fn endpoints() -> ApiEndpoints {
        ApiEndpoints::from_parts("localhost", 5000, "api_v1")
    }

    fn respond(body: &'static str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_streaming_event_polls_then_settles() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(if n == 0 {
                    respond(r#"{"isStreaming": true, "torqueData": [4], "recordLengths": [1]}"#)
                } else {
                    respond(r#"{"isStreaming": false, "torqueData": [4, 5], "recordLengths": [1, 1]}"#)
                })
            })
        });

        let mut view =
            EventDetailsView::mount(Arc::new(mock), endpoints(), params(true), Duration::from_secs(5))
                .await;
        assert!(view.is_polling());
        assert_eq!(view.packets().unwrap().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        view.sync_polling();
        assert!(!view.is_polling());
        assert_eq!(view.packets().unwrap().unwrap().len(), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(respond(r#"{"isStreaming": true}"#)) })
        });

        let view =
            EventDetailsView::mount(Arc::new(mock), endpoints(), params(true), Duration::from_secs(5))
                .await;
        assert!(view.is_polling());

        view.teardown().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_toggle_hidden_changes_only_suffix() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let seen = urls.clone();
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(move |url| {
            seen.lock().unwrap().push(url.to_string());
            Box::pin(async { Ok(respond(r#"{"isStreaming": false}"#)) })
        });

        let mut view =
            EventDetailsView::mount(Arc::new(mock), endpoints(), params(true), Duration::from_secs(5))
                .await;
        view.set_hidden(false).await;
        view.set_hidden(false).await;

        let urls = urls.lock().unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], format!("{}/hidden", urls[1]));
        assert!(!view.is_polling());
    }

    #[tokio::test]
    async fn test_bad_record_lengths_surface_as_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_| {
            Box::pin(async {
                Ok(respond(
                    r#"{"isStreaming": false, "torqueData": [1, 2, 3], "recordLengths": [2, 3]}"#,
                ))
            })
        });

        let view =
            EventDetailsView::mount(Arc::new(mock), endpoints(), params(false), Duration::from_secs(5))
                .await;

        assert!(matches!(
            view.packets(),
            Some(Err(SegmentationError::InvalidPacketLength { .. }))
        ));
    }
}
