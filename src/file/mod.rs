pub mod operations;
pub mod payload;
pub mod region;

pub use operations::{rewrite_file, ReplacementOutcome, RewriteRequest, WriteMode};
pub use payload::PayloadSource;
pub use region::{
    locate_region, locate_region_with, replace_region, replace_region_with, Region, StartAnchor,
};
