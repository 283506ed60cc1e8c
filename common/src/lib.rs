//! AI Scraper Common Library
//!
//! CLIとテストで共有される型・正規化・エクスポート処理

pub mod types;
pub mod alias;
pub mod error;
pub mod form;
pub mod normalizer;
pub mod progress;
pub mod export;

pub use types::{
    BatchData, BatchMetadata, BatchOptions, BatchRequest, BatchResponse, BatchResult, ErrorInfo,
    ProductRecord, SavedBatch,
};
pub use error::{Error, Result};
pub use form::FormState;
pub use normalizer::{normalize_batch, outcome_message, DisplayRow, NormalizedBatch};
pub use progress::ProgressEstimator;
pub use export::ExportKind;
