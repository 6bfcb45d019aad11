pub mod json;
pub mod path;
pub mod query;
pub mod validated;

/// Gives access to the value an extractor wraps.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
