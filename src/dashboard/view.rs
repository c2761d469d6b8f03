//! Render-ready snapshot of the dashboard.

use super::{
    notifications::Notification,
    state::{DashboardState, DisplayImage, LoadState, ViewMode},
};
use serde::Serialize;

/// Placeholder cards shown while the first listing is in flight.
pub const SKELETON_CARDS: usize = 12;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub view_mode: ViewMode,
    pub loading: bool,
    pub skeletons: usize,
    pub upload: UploadControl,
    pub cards: Vec<ImageCard>,
    pub pager: Pager,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadControl {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageCard {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size_label: String,
    pub modified_label: String,
    pub deleting: bool,
    /// False until the thumbnail reports loaded; render a skeleton until then.
    pub loaded: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Pager {
    pub current: usize,
    pub total_pages: usize,
    pub pages: Vec<usize>,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub summary: String,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let loading = state.load_state() == LoadState::Loading;
        let uploading = state.is_uploading();

        let cards = if loading {
            Vec::new()
        } else {
            state
                .page_images()
                .iter()
                .map(|img| ImageCard::new(img, state))
                .collect()
        };

        Self {
            view_mode: state.view_mode(),
            loading,
            skeletons: if loading { SKELETON_CARDS } else { 0 },
            upload: UploadControl {
                label: if uploading { "Uploading..." } else { "Upload Image" },
                disabled: uploading,
            },
            cards,
            pager: Pager::from_state(state),
            notifications: state.notifications().items().to_vec(),
        }
    }
}

impl ImageCard {
    fn new(img: &DisplayImage, state: &DashboardState) -> Self {
        Self {
            id: img.id.clone(),
            name: img.name.clone(),
            url: img.url.clone(),
            size_label: size_label(img.size),
            modified_label: img.last_modified.format("%Y-%m-%d").to_string(),
            deleting: state.is_deleting(&img.id),
            loaded: state.is_image_loaded(&img.id),
        }
    }
}

impl Pager {
    fn from_state(state: &DashboardState) -> Self {
        let total = state.images().len();
        let pagination = state.pagination();
        let total_pages = pagination.total_pages(total);
        let range = pagination.range(total);

        let summary = if total == 0 {
            "Showing 0 of 0 images".to_string()
        } else {
            format!("Showing {}-{} of {} images", range.start + 1, range.end, total)
        };

        Self {
            current: pagination.current(),
            total_pages,
            pages: (1..=total_pages).collect(),
            previous_disabled: !pagination.has_previous(),
            next_disabled: !pagination.has_next(total),
            summary,
        }
    }
}

/// Size in kilobytes (1000-based) with one decimal.
fn size_label(bytes: i64) -> String {
    format!("{:.1} KB", bytes as f64 / 1000.0)
}
