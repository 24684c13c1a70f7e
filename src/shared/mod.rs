pub mod errors;
pub mod paths;
