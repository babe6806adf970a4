pub mod element;
pub mod element_tree;
pub mod parser;
pub mod stats;
