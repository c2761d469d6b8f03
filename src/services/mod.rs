//! Storage side of the gateway: the `ObjectStore` seam, its backends, and the
//! `StorageService` that implements the image operations on top of it.

pub mod memory_store;
pub mod object_store;
pub mod s3_store;
pub mod storage_service;
