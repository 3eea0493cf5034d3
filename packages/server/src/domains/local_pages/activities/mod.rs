pub mod bulk;
pub mod generate_draft;
pub mod publish;
pub mod queries;

pub use bulk::{parse_bulk_csv, run_bulk_generation, BulkOptions, BulkRow, BulkRowOutcome, BulkRowResult};
pub use generate_draft::{generate_draft, validate_request, SIMILARITY_SAMPLE_SIZE, UNIQUENESS_THRESHOLD};
pub use publish::{publish_local_page, unpublish_local_page};
pub use queries::{check_slugs, delete_local_page, generation_logs, list_local_pages, SlugAvailability};
