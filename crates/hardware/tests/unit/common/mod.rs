
/// Lane mask operations.
pub mod lanes;
