//! Async driver for the dashboard.
//!
//! Runs gateway requests and applies their results to `DashboardState`.
//! Requests are tied to the dashboard's lifetime through a
//! `CancellationToken`: once torn down (or dropped), in-flight results are
//! discarded and notification timers stop.

use super::{
    api::GatewayApi,
    notifications::NotificationId,
    state::{DashboardState, UploadFailure, ViewEffect, ViewMode},
    view::DashboardView,
};
use crate::models::object::UploadFile;
use parking_lot::Mutex;
use std::{
    future::Future,
    sync::{Arc, Weak},
    time::Duration,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long a notification stays up unless dismissed.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// How a dashboard operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// Not started: already mounted, upload in flight, unknown or busy key.
    Skipped,
    /// Torn down before the request completed; state left untouched.
    Cancelled,
}

impl Outcome {
    fn from_ok(ok: bool) -> Self {
        if ok { Outcome::Succeeded } else { Outcome::Failed }
    }
}

pub struct Dashboard<G> {
    gateway: G,
    state: Arc<Mutex<DashboardState>>,
    cancel: CancellationToken,
    notification_ttl: Duration,
}

impl<G: GatewayApi> Dashboard<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(DashboardState::new())),
            cancel: CancellationToken::new(),
            notification_ttl: NOTIFICATION_TTL,
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Initial listing. Runs once per dashboard; later calls are skipped.
    pub async fn mount(&self) -> Outcome {
        if !self.state.lock().begin_mount() {
            return Outcome::Skipped;
        }

        let Some(result) = self.cancellable(self.gateway.list_images()).await else {
            return Outcome::Cancelled;
        };
        if let Err(err) = &result {
            warn!("Failed to fetch images: {}", err);
        }

        let ok = result.is_ok();
        let id = self.state.lock().finish_fetch(result);
        self.schedule_expiry(id);
        Outcome::from_ok(ok)
    }

    /// Upload `file`, then re-fetch the full listing so the new object
    /// appears with its server-assigned key.
    pub async fn upload(&self, file: UploadFile) -> Outcome {
        if !self.state.lock().begin_upload() {
            debug!("upload of {} ignored: another upload in flight", file.file_name);
            return Outcome::Skipped;
        }

        let round_trip = async {
            let stored = self
                .gateway
                .upload_image(&file)
                .await
                .map_err(UploadFailure::Upload)?;
            debug!("uploaded {} as {}", file.file_name, stored.name);
            self.gateway
                .list_images()
                .await
                .map_err(UploadFailure::Refresh)
        };

        let Some(result) = self.cancellable(round_trip).await else {
            return Outcome::Cancelled;
        };
        match &result {
            Err(UploadFailure::Upload(err)) => warn!("Error uploading {}: {}", file.file_name, err),
            Err(UploadFailure::Refresh(err)) => {
                warn!("Uploaded {} but refresh failed: {}", file.file_name, err)
            }
            Ok(_) => {}
        }

        let ok = result.is_ok();
        let id = self.state.lock().finish_upload(&file.file_name, result);
        self.schedule_expiry(id);
        Outcome::from_ok(ok)
    }

    /// Delete `key`; on success the item is removed locally, no re-fetch.
    pub async fn delete(&self, key: &str) -> Outcome {
        if !self.state.lock().begin_delete(key) {
            return Outcome::Skipped;
        }

        let Some(result) = self.cancellable(self.gateway.delete_image(key)).await else {
            return Outcome::Cancelled;
        };
        if let Err(err) = &result {
            warn!("Error deleting {}: {}", key, err);
        }

        let ok = result.is_ok();
        let id = self.state.lock().finish_delete(key, result.map(|_| ()));
        self.schedule_expiry(id);
        Outcome::from_ok(ok)
    }

    pub fn set_page(&self, page: usize) -> Option<ViewEffect> {
        self.state.lock().set_page(page)
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.state.lock().set_view_mode(mode);
    }

    pub fn mark_image_loaded(&self, key: &str) {
        self.state.lock().mark_image_loaded(key);
    }

    pub fn dismiss_notification(&self, id: NotificationId) -> bool {
        self.state.lock().dismiss_notification(id)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> DashboardView {
        DashboardView::from_state(&self.state.lock())
    }

    /// Read the raw state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Stop all in-flight work; later results are dropped.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    async fn cancellable<F: Future>(&self, fut: F) -> Option<F::Output> {
        let output = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            out = fut => Some(out),
        };
        output.filter(|_| self.is_active())
    }

    /// Remove `id` after the TTL unless the dashboard goes away first.
    /// Each notification has its own timer.
    fn schedule_expiry(&self, id: NotificationId) {
        let state: Weak<Mutex<DashboardState>> = Arc::downgrade(&self.state);
        let cancel = self.cancel.clone();
        let ttl = self.notification_ttl;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(ttl) => {
                    if let Some(state) = state.upgrade() {
                        state.lock().dismiss_notification(id);
                    }
                }
            }
        });
    }
}

impl<G> Drop for Dashboard<G> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
