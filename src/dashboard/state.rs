//! Dashboard view state and its transitions.
//!
//! Everything here is synchronous; `Dashboard` performs the requests and
//! feeds their results back through the `finish_*` methods.

use super::{
    api::ClientError,
    notifications::{NotificationCenter, NotificationId},
    pagination::Pagination,
};
use crate::models::image::ImageEntry;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Side effect the renderer should perform after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    ScrollToTop,
}

/// One image as the dashboard tracks it. `id` is the storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pub id: String,
    pub name: String,
    pub size: i64,
    pub url: String,
    pub last_modified: DateTime<Utc>,
}

impl From<ImageEntry> for DisplayImage {
    fn from(entry: ImageEntry) -> Self {
        Self {
            id: entry.name.clone(),
            name: entry.name,
            size: entry.size,
            url: entry.url,
            last_modified: entry.last_modified,
        }
    }
}

/// Why an upload round-trip failed.
#[derive(Debug)]
pub enum UploadFailure {
    /// The gateway did not store the file.
    Upload(ClientError),
    /// The file was stored but the follow-up listing failed.
    Refresh(ClientError),
}

#[derive(Debug)]
pub struct DashboardState {
    mounted: bool,
    load: LoadState,
    upload: UploadState,
    images: Vec<DisplayImage>,
    deleting: HashSet<String>,
    loaded_images: HashSet<String>,
    pagination: Pagination,
    view_mode: ViewMode,
    notifications: NotificationCenter,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            mounted: false,
            load: LoadState::Loading,
            upload: UploadState::Idle,
            images: Vec::new(),
            deleting: HashSet::new(),
            loaded_images: HashSet::new(),
            pagination: Pagination::default(),
            view_mode: ViewMode::default(),
            notifications: NotificationCenter::new(),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the one initial fetch. Later calls return false.
    pub fn begin_mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.load = LoadState::Loading;
        true
    }

    /// Apply the result of a listing. The view is `Loaded` either way.
    pub fn finish_fetch(&mut self, result: Result<Vec<ImageEntry>, ClientError>) -> NotificationId {
        self.load = LoadState::Loaded;
        match result {
            Ok(entries) => {
                self.replace_images(entries);
                self.notifications.success("Images fetched successfully")
            }
            Err(_) => self.notifications.error("Failed to load images"),
        }
    }

    /// Enter `Uploading`. False while another upload is in flight.
    pub fn begin_upload(&mut self) -> bool {
        if self.upload == UploadState::Uploading {
            return false;
        }
        self.upload = UploadState::Uploading;
        true
    }

    /// Leave `Uploading`. On success the listing fetched after the upload
    /// replaces the local set.
    pub fn finish_upload(
        &mut self,
        file_name: &str,
        result: Result<Vec<ImageEntry>, UploadFailure>,
    ) -> NotificationId {
        self.upload = UploadState::Idle;
        match result {
            Ok(entries) => {
                self.replace_images(entries);
                self.notifications
                    .success(format!("Successfully uploaded {}", file_name))
            }
            Err(UploadFailure::Upload(_)) => self.notifications.error("Failed to upload image"),
            Err(UploadFailure::Refresh(_)) => self
                .notifications
                .error(format!("Uploaded {} but failed to refresh images", file_name)),
        }
    }

    /// Flag `key` as deleting. False for unknown keys or a delete already
    /// in flight for the same key.
    pub fn begin_delete(&mut self, key: &str) -> bool {
        if !self.images.iter().any(|img| img.id == key) {
            return false;
        }
        self.deleting.insert(key.to_string())
    }

    /// Clear the deleting flag; on success drop the item locally without
    /// re-fetching.
    pub fn finish_delete(&mut self, key: &str, result: Result<(), ClientError>) -> NotificationId {
        self.deleting.remove(key);
        match result {
            Ok(()) => {
                self.images.retain(|img| img.id != key);
                self.loaded_images.remove(key);
                self.pagination.clamp(self.images.len());
                self.notifications
                    .success(format!("Successfully deleted {}", key))
            }
            Err(_) => self.notifications.error("Failed to delete image"),
        }
    }

    /// Switch page. Only existing pages are accepted.
    pub fn set_page(&mut self, page: usize) -> Option<ViewEffect> {
        self.pagination
            .go_to(page, self.images.len())
            .then_some(ViewEffect::ScrollToTop)
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Record that the thumbnail for `key` finished loading.
    pub fn mark_image_loaded(&mut self, key: &str) {
        if self.images.iter().any(|img| img.id == key) {
            self.loaded_images.insert(key.to_string());
        }
    }

    pub fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        self.notifications.dismiss(id)
    }

    fn replace_images(&mut self, entries: Vec<ImageEntry>) {
        self.images = entries.into_iter().map(DisplayImage::from).collect();
        let present: HashSet<&str> = self.images.iter().map(|img| img.id.as_str()).collect();
        self.loaded_images.retain(|key| present.contains(key.as_str()));
        self.pagination.clamp(self.images.len());
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    pub fn is_uploading(&self) -> bool {
        self.upload == UploadState::Uploading
    }

    pub fn is_deleting(&self, key: &str) -> bool {
        self.deleting.contains(key)
    }

    pub fn is_image_loaded(&self, key: &str) -> bool {
        self.loaded_images.contains(key)
    }

    pub fn images(&self) -> &[DisplayImage] {
        &self.images
    }

    /// Images on the current page.
    pub fn page_images(&self) -> &[DisplayImage] {
        &self.images[self.pagination.range(self.images.len())]
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::notifications::Severity;
    use chrono::TimeZone;

    fn entry(key: &str) -> ImageEntry {
        ImageEntry {
            id: key.to_string(),
            name: key.to_string(),
            size: 1500,
            url: format!("https://b.s3.r.amazonaws.com/{}", key),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn entries(n: usize) -> Vec<ImageEntry> {
        (0..n).map(|i| entry(&format!("img-{:02}.png", i))).collect()
    }

    fn failure() -> ClientError {
        ClientError::Status {
            status: 500,
            message: "File upload failed".into(),
        }
    }

    fn last_severity(state: &DashboardState) -> Severity {
        state.notifications().items().last().unwrap().severity
    }

    #[test]
    fn mount_only_once() {
        let mut state = DashboardState::new();
        assert_eq!(state.load_state(), LoadState::Loading);
        assert!(state.begin_mount());
        assert!(!state.begin_mount());
    }

    #[test]
    fn fetch_success_loads_images() {
        let mut state = DashboardState::new();
        state.begin_mount();
        state.finish_fetch(Ok(entries(3)));

        assert_eq!(state.load_state(), LoadState::Loaded);
        assert_eq!(state.images().len(), 3);
        assert_eq!(state.notifications().len(), 1);
        assert_eq!(last_severity(&state), Severity::Success);
    }

    #[test]
    fn fetch_failure_still_finishes_loading() {
        let mut state = DashboardState::new();
        state.begin_mount();
        state.finish_fetch(Err(failure()));

        assert_eq!(state.load_state(), LoadState::Loaded);
        assert!(state.images().is_empty());
        assert_eq!(last_severity(&state), Severity::Error);
    }

    #[test]
    fn upload_is_exclusive() {
        let mut state = DashboardState::new();
        assert!(state.begin_upload());
        assert!(!state.begin_upload());
        state.finish_upload("cat.png", Err(UploadFailure::Upload(failure())));
        assert_eq!(state.upload_state(), UploadState::Idle);
        assert!(state.begin_upload());
    }

    #[test]
    fn upload_failure_keeps_data() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(2)));
        state.begin_upload();
        state.finish_upload("cat.png", Err(UploadFailure::Upload(failure())));

        assert_eq!(state.images().len(), 2);
        let last = state.notifications().items().last().unwrap();
        assert_eq!(last.message, "Failed to upload image");
    }

    #[test]
    fn upload_success_replaces_set() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(2)));
        state.begin_upload();
        state.finish_upload("cat.png", Ok(entries(3)));

        assert_eq!(state.images().len(), 3);
        let last = state.notifications().items().last().unwrap();
        assert_eq!(last.message, "Successfully uploaded cat.png");
    }

    #[test]
    fn upload_refresh_failure_reports_once() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(1)));
        let before = state.notifications().len();
        state.begin_upload();
        state.finish_upload("cat.png", Err(UploadFailure::Refresh(failure())));

        assert_eq!(state.notifications().len(), before + 1);
        assert_eq!(last_severity(&state), Severity::Error);
        assert_eq!(state.images().len(), 1);
    }

    #[test]
    fn delete_success_removes_locally() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(3)));

        assert!(state.begin_delete("img-01.png"));
        assert!(state.is_deleting("img-01.png"));
        assert!(!state.begin_delete("img-01.png"));

        state.finish_delete("img-01.png", Ok(()));
        assert!(!state.is_deleting("img-01.png"));
        let ids: Vec<_> = state.images().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img-00.png", "img-02.png"]);
    }

    #[test]
    fn delete_failure_reverts_flag() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(2)));

        state.begin_delete("img-00.png");
        state.finish_delete("img-00.png", Err(failure()));

        assert!(!state.is_deleting("img-00.png"));
        assert_eq!(state.images().len(), 2);
        assert_eq!(last_severity(&state), Severity::Error);
    }

    #[test]
    fn delete_unknown_key_is_skipped() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(1)));
        assert!(!state.begin_delete("nope.png"));
    }

    #[test]
    fn deleting_last_item_of_last_page_clamps() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(13)));
        assert_eq!(state.set_page(2), Some(ViewEffect::ScrollToTop));
        assert_eq!(state.page_images().len(), 1);

        state.begin_delete("img-12.png");
        state.finish_delete("img-12.png", Ok(()));

        assert_eq!(state.pagination().current(), 1);
        assert_eq!(state.page_images().len(), 12);
    }

    #[test]
    fn pages_of_twenty_five() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(25)));

        assert_eq!(state.pagination().total_pages(state.images().len()), 3);
        assert_eq!(state.page_images().len(), 12);
        state.set_page(2);
        assert_eq!(state.page_images().len(), 12);
        state.set_page(3);
        assert_eq!(state.page_images().len(), 1);
        assert_eq!(state.set_page(4), None);
    }

    #[test]
    fn image_loaded_flags_follow_set() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(2)));
        state.mark_image_loaded("img-00.png");
        state.mark_image_loaded("ghost.png");
        assert!(state.is_image_loaded("img-00.png"));
        assert!(!state.is_image_loaded("ghost.png"));

        state.finish_fetch(Ok(vec![entry("img-01.png")]));
        assert!(!state.is_image_loaded("img-00.png"));
    }

    #[test]
    fn every_completion_notifies_once() {
        let mut state = DashboardState::new();
        state.finish_fetch(Ok(entries(2)));
        state.begin_upload();
        state.finish_upload("a.png", Ok(entries(3)));
        state.begin_delete("img-00.png");
        state.finish_delete("img-00.png", Err(failure()));
        assert_eq!(state.notifications().len(), 3);

        let ids: HashSet<_> = state.notifications().items().iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 3);
    }
}
