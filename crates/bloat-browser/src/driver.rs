use crate::{ChromeFinder, Error, NetworkRecorder, Result};
use async_trait::async_trait;
use bloat_core::config::{ArtifactPaths, normalize_url};
use bloat_core::trace::TraceWriter;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventDataReceived, EventLoadingFailed, EventLoadingFinished,
    EventRequestWillBeSent, EventResponseReceived,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How pages are loaded and captured
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub navigation_timeout: Duration,
    /// Extra time after the load event for late requests
    pub settle_delay: Duration,
    /// Browser window size in pixels; the above-the-fold screenshot covers this area
    pub window_size: (u32, u32),
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(2000),
            window_size: (1366, 768),
        }
    }
}

/// What a capture produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    pub url: String,
    pub events: usize,
}

/// Loads a page and leaves its trace and screenshots at the given paths
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn capture(&self, url: &str, paths: &ArtifactPaths) -> Result<CaptureSummary>;
}

/// Page driver backed by a Chrome instance over the DevTools Protocol
pub struct CdpPageDriver {
    browser: Browser,
    handler_task: JoinHandle<()>,
    options: CaptureOptions,
}

impl CdpPageDriver {
    /// Launch Chrome; the instance is shared by every capture until `close`
    pub async fn launch(options: CaptureOptions) -> Result<Self> {
        let chrome = ChromeFinder::new(options.chrome_path.clone()).find()?;
        tracing::info!("Launching Chrome from {}", chrome.display());

        let (width, height) = options.window_size;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome)
            .window_size(width, height)
            .request_timeout(options.navigation_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler must be polled for any browser command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
            options,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler_task.abort();
        tracing::info!("Chrome closed");
        Ok(())
    }

    async fn load(&self, page: &Page, url: &str) -> Result<()> {
        let timeout = self.options.navigation_timeout;
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(Error::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    }

    /// Record the page's network traffic through load, then save screenshots and the trace
    ///
    /// Returns the number of recorded events. The page is left open for the caller to close.
    async fn record_and_save(&self, page: &Page, url: &str, paths: &ArtifactPaths) -> Result<usize> {
        page.execute(EnableParams::default()).await?;
        let (shutdown_tx, recorder_rx) = record_network(page).await?;

        // Dropping the sender on an early return also stops the recorder
        tracing::info!("Loading {}", url);
        self.load(page, url).await?;

        tokio::time::sleep(self.options.settle_delay).await;
        let _ = shutdown_tx.send(());
        let recorder = recorder_rx
            .await
            .map_err(|e| Error::Cdp(format!("Network recorder stopped early: {}", e)))?;

        page.save_screenshot(
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build(),
            &paths.aft_screenshot,
        )
        .await?;
        page.save_screenshot(
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build(),
            &paths.full_screenshot,
        )
        .await?;
        tracing::debug!("Saved screenshots under {}", paths.dir.display());

        let events = recorder.into_events();
        TraceWriter::to_file(&events, &paths.trace)?;
        Ok(events.len())
    }
}

#[async_trait]
impl PageDriver for CdpPageDriver {
    async fn capture(&self, url: &str, paths: &ArtifactPaths) -> Result<CaptureSummary> {
        let target = normalize_url(url);
        tokio::fs::create_dir_all(&paths.dir).await?;

        let page = self.browser.new_page("about:blank").await?;
        let captured = self.record_and_save(&page, &target, paths).await;
        let events = close_after(captured, page.close(), &target).await?;

        Ok(CaptureSummary {
            url: url.to_string(),
            events,
        })
    }
}

/// Close a page whether or not the work on it succeeded
///
/// A close failure is logged; the work's own result is returned.
async fn close_after<T, E, F>(result: Result<T>, close: F, url: &str) -> Result<T>
where
    F: Future<Output = std::result::Result<(), E>>,
    E: std::fmt::Display,
{
    if let Err(e) = close.await {
        tracing::debug!("Failed to close page for {}: {}", url, e);
    }
    result
}

/// Record Network domain events for `page` until the returned sender fires or drops
async fn record_network(
    page: &Page,
) -> Result<(oneshot::Sender<()>, oneshot::Receiver<NetworkRecorder>)> {
    let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
    let mut responses = page.event_listener::<EventResponseReceived>().await?;
    let mut data = page.event_listener::<EventDataReceived>().await?;
    let mut finished = page.event_listener::<EventLoadingFinished>().await?;
    let mut failed = page.event_listener::<EventLoadingFailed>().await?;

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let (result_tx, result_rx) = oneshot::channel::<NetworkRecorder>();

    tokio::spawn(async move {
        let mut recorder = NetworkRecorder::new();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                Some(event) = requests.next() => {
                    tracing::debug!("Request: {}", event.request.url);
                    recorder.request_sent(event.request_id.inner(), &event.request.url);
                }
                Some(event) = responses.next() => {
                    recorder.response_received(
                        event.request_id.inner(),
                        &event.response.url,
                        &event.response.mime_type,
                        event.response.status,
                    );
                }
                Some(event) = data.next() => {
                    recorder.data_received(event.request_id.inner(), event.data_length);
                }
                Some(event) = finished.next() => {
                    recorder.loading_finished(event.request_id.inner(), event.encoded_data_length);
                }
                Some(event) = failed.next() => {
                    tracing::debug!("Loading failed: {} ({})", event.request_id.inner(), event.error_text);
                    recorder.loading_failed(event.request_id.inner(), &event.error_text);
                }
            }
        }

        tracing::debug!("Recorded {} network events", recorder.count());
        let _ = result_tx.send(recorder);
    });

    Ok((shutdown_tx, result_rx))
}
