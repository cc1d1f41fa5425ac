//! 错误码, 与 Linux 的 [`errno`] 取值保持一致
//!
//! [`errno`]: <https://man7.org/linux/man-pages/man3/errno.3.html>

/// Operation not permitted
pub const EPERM: isize = 1;
/// Exec format error
pub const ENOEXEC: isize = 8;
/// Out of memory
pub const ENOMEM: isize = 12;
/// Bad address
pub const EFAULT: isize = 14;
/// Invalid argument
pub const EINVAL: isize = 22;
