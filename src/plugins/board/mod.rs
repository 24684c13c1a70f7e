pub mod controller;
pub mod dnd;
pub mod forms;
pub mod helpers;
pub mod seed;
pub mod state;
pub mod types;
pub mod view;

pub use controller::BoardController;
pub use state::{BoardError, BoardState, Changes, PendingDeletion};
