// Tailoring recommendations generated from a resume/job comparison.

pub mod generator;
pub mod handlers;
pub mod prompts;
