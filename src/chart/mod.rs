pub mod storage;
pub mod types;

pub use storage::{expand_patterns, find_chart, load_document, load_documents};
pub use types::{Chart, Dimension, ScoreMap, SubDimension, Vendor, Workspace};
