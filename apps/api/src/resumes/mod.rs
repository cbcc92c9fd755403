// Resume ingestion and tailoring.
// Both flows fail fast: the first failing step ends the request, and nothing
// is written before every check has passed.

pub mod handlers;
pub mod ingest;
pub mod tailor;
