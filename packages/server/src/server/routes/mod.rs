// HTTP routes
pub mod health;
pub mod local_pages;

pub use health::*;
pub use local_pages::*;
