mod put_block_blob;

pub use put_block_blob::*;
