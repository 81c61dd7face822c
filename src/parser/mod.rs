pub mod parser;

pub use parser::{leaf_label, parse, MAX_DEPTH};
