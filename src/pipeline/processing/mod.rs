// Pipeline processing: row dedup, per-row normalization, and classification

pub mod classify;
pub mod dedup;
pub mod normalize;
