mod process;

pub use process::Process;
