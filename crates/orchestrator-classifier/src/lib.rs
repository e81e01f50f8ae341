//! Rule-based SKIP/PASSIVE/ACTIVE intent tagger and its content fingerprint
//! cache — spec §4.8.

pub mod cache;
pub mod classifier;
pub mod config;
pub mod signals;

pub use cache::ClassificationCache;
pub use classifier::Classifier;
pub use config::{AgentClassifyConfig, ProcessingMode};
