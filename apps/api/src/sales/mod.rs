// Sales agent: one uploaded profile in, a one-slide presentation out.

pub mod handlers;
pub mod pptx;
pub mod prompts;
pub mod slide;
