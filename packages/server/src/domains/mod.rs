// Business domains
pub mod local_pages;
