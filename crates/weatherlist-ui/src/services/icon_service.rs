//! Icon backend: async icon downloads for list cells.
//! All network work runs off the owning thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use weatherlist_weather::{
    HttpIconSource, IconCache, IconError, IconImage, IconOutcome, IconSource, RowSlots, RowToken,
};

/// Error type for icon service setup
#[derive(Debug)]
pub enum IconServiceError {
    Client(IconError),
}

impl std::fmt::Display for IconServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconServiceError::Client(e) => write!(f, "Icon client error: {}", e),
        }
    }
}

impl std::error::Error for IconServiceError {}

/// Messages sent from icon downloads back to the owning thread
#[derive(Debug)]
pub enum IconServiceMessage {
    /// Icon for the request identified by `token` is ready to show
    IconReady {
        token: RowToken,
        image: Arc<IconImage>,
    },
}

/// Build the HTTP icon source
pub fn create_source(timeout: Duration) -> Result<HttpIconSource, IconServiceError> {
    HttpIconSource::new(timeout).map_err(IconServiceError::Client)
}

/// Fetch the icon for `token` in the background.
/// Sends `IconReady` only if the requesting row still shows this request;
/// stale and failed downloads send nothing.
pub fn request_icon<S: IconSource>(
    tx: &Sender<IconServiceMessage>,
    runtime: &Handle,
    cache: Arc<IconCache>,
    source: Arc<S>,
    slots: Arc<RowSlots>,
    token: RowToken,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let outcome = cache.fetch_and_store(source.as_ref(), &slots, &token).await;
        match outcome {
            IconOutcome::Cached(image) | IconOutcome::Apply(image) => {
                let _ = tx.send(IconServiceMessage::IconReady { token, image });
            }
            IconOutcome::Stale | IconOutcome::Failed => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// Source that must never be reached
    struct Unreachable;

    impl IconSource for Unreachable {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconError> {
            Err(IconError::InvalidUrl(url.to_string()))
        }
    }

    fn icon() -> Arc<IconImage> {
        Arc::new(IconImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cached_icon_is_forwarded_to_current_row() {
        let (tx, rx) = mpsc::channel();
        let cache = Arc::new(IconCache::new());
        let slots = Arc::new(RowSlots::new());
        let image = icon();
        cache.store("http://icons/10d@2x.png", image.clone());

        let token = slots.bind(0, "http://icons/10d@2x.png");
        request_icon(
            &tx,
            &Handle::current(),
            cache,
            Arc::new(Unreachable),
            slots,
            token.clone(),
        );

        let message = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(2)))
            .await
            .unwrap()
            .unwrap();
        match message {
            IconServiceMessage::IconReady { token: got, image: got_image } => {
                assert_eq!(got, token);
                assert!(Arc::ptr_eq(&got_image, &image));
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_fetch_sends_nothing() {
        let (tx, rx) = mpsc::channel();
        let slots = Arc::new(RowSlots::new());
        let token = slots.bind(0, "not a url");
        request_icon(
            &tx,
            &Handle::current(),
            Arc::new(IconCache::new()),
            Arc::new(Unreachable),
            slots,
            token,
        );

        let received =
            tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_millis(200)))
                .await
                .unwrap();
        assert!(received.is_err());
    }

    #[test]
    fn icon_service_error_display() {
        let err = IconServiceError::Client(IconError::Status(502));
        assert!(format!("{}", err).contains("502"));
    }

    #[test]
    fn create_source_with_timeout() {
        assert!(create_source(Duration::from_secs(3)).is_ok());
    }
}
