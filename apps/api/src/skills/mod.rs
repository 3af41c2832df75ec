// Skill intake: taxonomy matching over resume text and assessment management.

pub mod handlers;
pub mod ingest;
pub mod taxonomy;
