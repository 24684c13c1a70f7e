pub mod assist;
pub mod board;
pub mod sync;
