pub mod audio;
pub mod config;
pub mod digits;
pub mod error;
pub mod generator;
pub mod interactive;
pub mod triplet;

pub use config::Config;
pub use error::{Result, TripletError};
pub use generator::{generate, print_summary, GenerationReport, GeneratorConfig, RunContext};
pub use triplet::{RandomSampler, SequenceSampler, Triplet, TripletSampler};
