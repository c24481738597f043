// Recruitment agent: multi-file upload into the session collection, per-record
// rendering, and batch bundles.

pub mod handlers;
pub mod pipeline;
