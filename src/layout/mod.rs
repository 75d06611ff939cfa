//! Control layout records and their persistence

pub mod entry;
pub mod persistence;
pub mod store;

pub use entry::{format_px, ControlLayoutEntry};
pub use persistence::{LayoutRepository, DEFAULT_STORAGE_KEY};
pub use store::{
    open_layout_store, FileLayoutStore, LayoutStore, LayoutStoreError, MemoryLayoutStore,
    SledLayoutStore,
};
