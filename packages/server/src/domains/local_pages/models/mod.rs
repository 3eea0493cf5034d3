pub mod city_context;
pub mod generation_log;
pub mod local_page;

pub use city_context::LocalCityContext;
pub use generation_log::LocalPageGenerationLog;
pub use local_page::{LocalPage, NewLocalPage};
