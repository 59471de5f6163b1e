// Adapters layer: concrete implementations for external systems (files, datasets, renderers).

pub mod readers;
pub mod storage;

pub use storage::LocalStorage;
