//! Core data models for the image dashboard.
//!
//! `object` describes what lives in the bucket; `image` holds the JSON bodies
//! the gateway sends and the dashboard client reads back.

pub mod image;
pub mod object;
