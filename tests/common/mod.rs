#![allow(dead_code)]

pub mod builders;
pub mod mocks;

pub use builders::signal::TestSignalBuilder;
pub use mocks::camera::SyntheticCamera;
pub use mocks::sink::SharedLog;
pub use mocks::source::{ScriptedSource, SourceCounters};
