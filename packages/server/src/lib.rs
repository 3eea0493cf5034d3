// Local SEO Pages - API Core
//
// Backend for generating, scoring and publishing AI-written local service pages.
// Domain logic lives in domains/local_pages; infrastructure seams in kernel.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
