pub mod client;
pub mod listing;

pub use client::{ApiError, GalleryClient};
