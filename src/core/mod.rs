pub mod analyzer;
pub mod events;
pub mod extractor;
pub mod hierarchy;
pub mod progress;
pub mod scanner;
