pub mod sample_data;

pub use sample_data::{SamplePlan, SeedReport, seed_sample_data};
