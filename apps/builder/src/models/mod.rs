pub mod envelope;
pub mod job;
pub mod resume;
pub mod shape;
