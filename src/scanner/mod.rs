pub mod core;
pub mod score;
pub mod types;

// Re-export main types for easier access
pub use self::core::{Scanner, scan};
pub use score::{LineScorer, score};
pub use types::{ScanOptions, ScanResult, ScanStats, ScoredLine, Warning, WarningCategory};
