pub mod core;
pub mod plugins;
pub mod server;
pub mod shared;
pub mod storage;

pub use server::run;
