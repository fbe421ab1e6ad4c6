pub mod io;

pub use io::{AssetReader, FileAssetReader, MemoryAssetReader, read_text};
