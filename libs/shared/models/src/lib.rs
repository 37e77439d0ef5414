pub mod descriptors;
pub mod error;

pub use descriptors::*;
pub use error::AppError;
