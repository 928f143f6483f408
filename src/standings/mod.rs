// Standings processing: table selection and presentation normalization.

pub mod normalize;
pub mod select;

pub use normalize::{normalize, DisplayRow, FormOutcome, NormalizeError, Tier};
pub use select::select_table;
