mod persistence;
pub mod providers;
mod store;

pub use persistence::{load_snapshot, save_snapshot};
pub use providers::{DishProvider, MenuProvider, ResidentProvider};
pub use store::{Snapshot, SnapshotStore};
