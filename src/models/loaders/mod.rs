pub mod toml_loader;

pub use toml_loader::{load_all_draft_sets, load_draft_set};
