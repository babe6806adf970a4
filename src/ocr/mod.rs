pub mod block;
pub mod consolidate;
pub mod matcher;
pub mod recognizer;
pub mod similarity;
