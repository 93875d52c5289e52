//! Domain types: long-form observations, wide-form items and the number
//! categories they are scored against.

pub mod item;
pub mod number;
pub mod observation;

pub use item::{Item, ItemKey};
pub use number::{ArticleNumber, GrammaticalNumber};
pub use observation::Observation;

/// Tokenization type marking hand-built artificial segmentations
pub const ARTIFICIAL_TOKENIZATION: &str = "artificial";
