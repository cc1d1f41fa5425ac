//! 内存管理产生的错误

use abi::{EFAULT, EINVAL, ENOEXEC, ENOMEM, EPERM};
use thiserror::Error;

use crate::mm::VirtAddr;

pub type Result<T> = core::result::Result<T, MmError>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// 访问了已经映射的页但没有权限, 例如写只读页
    #[error("invalid memory access at {0:?} (perhaps segfault?)")]
    ProtectionViolation(VirtAddr),

    /// 地址既不在堆里也不在任何程序段中
    #[error("reach va: {0:?}, which is outside of every mapping")]
    InvalidAccess(VirtAddr),

    /// 跨地址空间拷贝时缺页无法解决
    #[error("copy touched {0:?}, which could not be mapped")]
    NotPermitted(VirtAddr),

    /// 物理页帧管理器无法提供这么多连续的页
    #[error("no more memory for {0} page(s)")]
    OutOfMemory(usize),

    #[error("brk {0:?} is below the heap base")]
    InvalidBreak(VirtAddr),

    #[error("malformed executable: {0}")]
    InvalidElf(&'static str),
}

impl MmError {
    /// 交给 IPC 调用者的错误码 (取负)
    pub fn error_code(&self) -> isize {
        let errno = match self {
            MmError::ProtectionViolation(_) => EFAULT,
            MmError::InvalidAccess(_) => EFAULT,
            MmError::NotPermitted(_) => EPERM,
            MmError::OutOfMemory(_) => ENOMEM,
            MmError::InvalidBreak(_) => EINVAL,
            MmError::InvalidElf(_) => ENOEXEC,
        };
        -errno
    }

    /// 缺页无法解决, 调用者应当终止该进程
    pub fn is_fatal_fault(&self) -> bool {
        matches!(
            self,
            MmError::ProtectionViolation(_) | MmError::InvalidAccess(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn error_codes_follow_errno() {
        assert_eq!(MmError::NotPermitted(VirtAddr(0x1000)).error_code(), -1);
        assert_eq!(MmError::OutOfMemory(1).error_code(), -12);
        assert_eq!(MmError::ProtectionViolation(VirtAddr(0)).error_code(), -14);
        assert_eq!(MmError::InvalidAccess(VirtAddr(0)).error_code(), -14);
    }

    #[test]
    fn only_unresolvable_faults_are_fatal() {
        assert!(MmError::InvalidAccess(VirtAddr(0x10)).is_fatal_fault());
        assert!(MmError::ProtectionViolation(VirtAddr(0x10)).is_fatal_fault());
        assert!(!MmError::OutOfMemory(1).is_fatal_fault());
        assert!(!MmError::NotPermitted(VirtAddr(0x10)).is_fatal_fault());
    }

    #[test]
    fn display_mentions_the_address() {
        let msg = MmError::InvalidAccess(VirtAddr(0xdead_0000)).to_string();
        assert!(msg.contains("0xdead0000"), "{}", msg);
    }
}
