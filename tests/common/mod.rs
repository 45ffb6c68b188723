#![allow(dead_code)]

pub use encounterdag_test_utils::builders;
pub use encounterdag_test_utils::init_tracing;
pub use encounterdag_test_utils::probe;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
