//! Player aggregate: stats, job ladder, equipment slots, inventory and saves.

pub mod equipment;
pub mod inventory;
pub mod save;
pub mod types;

pub use equipment::*;
pub use inventory::*;
pub use save::*;
pub use types::*;
