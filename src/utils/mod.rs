pub mod fs;
pub mod paths;

pub use paths::{expand_tilde, resolve_against};
