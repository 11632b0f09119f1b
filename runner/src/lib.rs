pub mod batch;
pub mod pilots;
pub mod runner;
pub mod util;
