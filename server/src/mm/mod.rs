mod address;
mod address_space;
mod chunk;
mod fork;
mod frame_allocator;
mod page_fault;
mod user_copy;
pub use address::*;
pub use address_space::*;
pub use chunk::*;
pub use fork::*;
pub use frame_allocator::*;
pub use page_fault::*;
pub use user_copy::*;

use crate::consts::{PHYS_BASE, PHYS_END};

/// 用 [PHYS_BASE, PHYS_END) 范围内的物理页建立页帧管理器
pub fn init_frame_allocator() -> FrameAllocatorRef {
    BuddyFrameAllocator::with_range(PhysAddr(PHYS_BASE), PhysAddr(PHYS_END)).shared()
}
