mod read;
pub use {read::ConnectionReader, read::Error as ReadError};

mod write;
pub use {write::ConnectionWriter, write::Error as WriteError};
