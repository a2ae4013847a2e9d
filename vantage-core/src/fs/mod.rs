//! Filesystem services: listing, tree reads, mutation, conflict
//! resolution, and directory watching.

pub mod conflict;
pub mod list;
pub mod mutate;
pub mod watch;

pub use list::{DEFAULT_TREE_DEPTH, file_info, list_directory, list_tree};
pub use mutate::{copy_items, create_folder, delete, move_item, rename};
pub use watch::{DirectoryWatcher, WatchConfig};
