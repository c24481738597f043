// Admin page actions: session-scoped users and bearer tokens.

pub mod handlers;
