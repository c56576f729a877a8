pub mod loader;
pub mod metainfo;

pub use loader::load_torrents;
pub use metainfo::TorrentFile;
