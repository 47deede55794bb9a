mod build;
mod deploy;

pub use build::build;
pub use deploy::deploy;
