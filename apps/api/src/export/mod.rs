// Batch export: ZIP bundles of rendered resumes and the consolidated CSV.

pub mod handlers;
pub mod packager;
pub mod table;
