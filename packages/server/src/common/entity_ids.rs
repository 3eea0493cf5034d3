//! Typed ID definitions for the entities this crate persists.

pub use super::id::Id;

/// Marker type for generated local SEO pages.
pub struct LocalPage;

/// Marker type for generation audit log rows.
pub struct GenerationLog;

/// Marker type for hand-curated city/zip context rows.
pub struct CityContext;

pub type LocalPageId = Id<LocalPage>;
pub type GenerationLogId = Id<GenerationLog>;
pub type CityContextId = Id<CityContext>;
