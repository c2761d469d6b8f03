//! Client-side dashboard: state machine, pagination, notifications and the
//! async driver that talks to the gateway.

pub mod api;
pub mod controller;
pub mod notifications;
pub mod pagination;
pub mod state;
pub mod view;

pub use api::{ClientError, GatewayApi, HttpGateway};
pub use controller::{Dashboard, NOTIFICATION_TTL, Outcome};
pub use state::{DashboardState, ViewEffect, ViewMode};
pub use view::DashboardView;
