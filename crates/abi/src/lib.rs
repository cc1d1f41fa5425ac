//! 与微内核约定的数据结构: 缺页标志与错误码

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate bitflags;

pub mod errno;
pub mod fault;

pub use errno::*;
pub use fault::*;
