pub const PAGE_SIZE: usize = 0x1000;

/// 用户堆的起始虚拟地址, brk 从这里向上增长
pub const HEAP_BASE: usize = 0x1000_0000;

/// 用户地址空间的上界 (不含), program break 不能超过这里
pub const USER_SPACE_END: usize = 0x40_0000_0000;

/// 物理页帧管理器默认管理的物理内存范围
pub const PHYS_BASE: usize = 0x8000_0000;
pub const PHYS_END: usize = 0x8800_0000; // 128M

/// ELF64 文件头大小, 第一次读取只需要这么多字节
pub const ELF_HEADER_SIZE: usize = 64;
