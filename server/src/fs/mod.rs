mod file;
mod mem_file;

pub use file::File;
pub use mem_file::MemFile;
