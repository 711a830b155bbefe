pub mod emitters;
pub mod generator;

pub use emitters::supporting::SupportingFile;
pub use generator::{ExpressServerGenerator, GENERATOR_NAME, POST_PROCESS_ENV};
