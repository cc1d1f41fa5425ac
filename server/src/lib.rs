//! 进程服务器的内存管理子系统
//!
//! 以页为单位按需建立进程地址空间: 缺页时分配堆页或从可执行文件读入代码/数据页,
//! 并提供跨地址空间的数据拷贝以及 fork 时的地址空间复制.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[macro_use]
pub mod console;

pub mod consts;
pub mod elf;
pub mod error;
pub mod fs;
pub mod logging;
pub mod mm;
pub mod task;

pub use abi::PageFaultFlags;
pub use error::{MmError, Result};
pub use task::Process;
