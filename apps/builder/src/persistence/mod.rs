pub mod autosave;
pub mod debounce;
pub mod reconciler;
pub mod store;
