/*!
 * Files Module
 * Sandboxed filesystem browsing: root registry, resolver, lister, reader
 */

pub mod list;
pub mod read;
pub mod registry;
pub mod resolve;

pub use list::{DirectoryEntry, DirectoryListing, EntryKind};
pub use read::{DownloadTarget, FilePreview};
pub use registry::{FileRoot, RootRegistry};
pub use resolve::ResolveOptions;
