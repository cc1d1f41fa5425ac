//! 虚实地址抽象

use crate::consts::PAGE_SIZE;
use core::fmt::{self, Debug, Formatter};
use core::ops::Add;

/// 页内偏移：12bit
pub const IN_PAGE_OFFSET: usize = 0xc;

macro_rules! derive_wrap {
    ($($type_def:item)*) => {
        $(
            #[repr(C)]
            #[derive(Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
            $type_def
        )*
    };
}

derive_wrap! {
    pub struct PhysAddr(pub usize);
    pub struct VirtAddr(pub usize);
    pub struct PhysPageNum(pub usize);
}

macro_rules! gen_debug {
    ($($addr_type:ident, $tag:literal)*) => {
        $(
            impl Debug for $addr_type {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    f.write_fmt(format_args!(concat!($tag, ":{:#x}"), self.0))
                }
            }
        )*
    };
}

gen_debug! {
    PhysAddr,    "PA"
    VirtAddr,    "VA"
    PhysPageNum, "PPN"
}

macro_rules! gen_offset_add {
    ($($addr_type:ident)*) => {
        $(
            impl Add<usize> for $addr_type {
                type Output = Self;

                fn add(self, rhs: usize) -> Self {
                    Self(self.0 + rhs)
                }
            }
        )*
    };
}

gen_offset_add! {
    PhysAddr
    VirtAddr
}

impl From<PhysPageNum> for PhysAddr {
    fn from(value: PhysPageNum) -> Self {
        Self(value.0 << IN_PAGE_OFFSET)
    }
}

impl From<PhysAddr> for PhysPageNum {
    fn from(value: PhysAddr) -> Self {
        assert!(value.is_aligned(), "{:?} is not page aligned", value);
        value.floor()
    }
}

impl VirtAddr {
    /// 向下对齐到页边界
    pub fn align_down(&self) -> VirtAddr {
        VirtAddr(self.0 & !(PAGE_SIZE - 1))
    }
    /// 从虚拟地址获取页内偏移（低12位）
    pub fn page_offset(&self) -> usize {
        self.0 & (PAGE_SIZE - 1)
    }
    /// 判断虚拟地址是否与页面大小对齐
    pub fn is_aligned(&self) -> bool {
        self.page_offset() == 0
    }
    /// 到下一个页边界之前还剩多少字节
    pub fn remaining_in_page(&self) -> usize {
        PAGE_SIZE - self.page_offset()
    }
    /// 超出地址空间时返回 None
    pub fn checked_add(&self, len: usize) -> Option<VirtAddr> {
        self.0.checked_add(len).map(VirtAddr)
    }
}

impl PhysAddr {
    /// 从物理地址计算物理页号（下取整）
    pub fn floor(&self) -> PhysPageNum {
        PhysPageNum(self.0 / PAGE_SIZE)
    }

    /// 从物理地址计算物理页号（上取整）
    pub fn ceil(&self) -> PhysPageNum {
        PhysPageNum((self.0 + PAGE_SIZE - 1) / PAGE_SIZE)
    }

    pub fn page_offset(&self) -> usize {
        self.0 & (PAGE_SIZE - 1)
    }

    pub fn is_aligned(&self) -> bool {
        self.page_offset() == 0
    }
}
