pub mod collector;
pub mod populator;
pub mod sample;
pub mod schema;
pub mod sections;
pub mod state;
