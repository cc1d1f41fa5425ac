use super::{FrameTracker, PhysAddr, VirtAddr};

/// 地址空间中一段连续映射的内存
///
/// 虚拟地址从 `vaddr` 开始, 背后是一段连续的物理页, 进程服务器通过本地别名直接读写其内容.
#[derive(Debug)]
pub struct Chunk {
    vaddr: VirtAddr,
    frames: FrameTracker,
}

impl Chunk {
    pub(super) fn new(vaddr: VirtAddr, frames: FrameTracker) -> Self {
        Self { vaddr, frames }
    }

    pub fn vaddr(&self) -> VirtAddr {
        self.vaddr
    }

    pub fn paddr(&self) -> PhysAddr {
        self.frames.paddr()
    }

    pub fn len(&self) -> usize {
        self.frames.as_bytes().len()
    }

    /// 末尾 (不含), 建块时已经保证不会越过地址空间的上界
    pub fn end(&self) -> VirtAddr {
        self.vaddr + self.len()
    }

    pub fn contains(&self, vaddr: VirtAddr) -> bool {
        self.vaddr <= vaddr && vaddr.0 - self.vaddr.0 < self.len()
    }

    pub fn overlaps(&self, start: VirtAddr, end: VirtAddr) -> bool {
        start < self.end() && self.vaddr < end
    }

    /// `vaddr` 在块内的偏移
    pub fn offset_of(&self, vaddr: VirtAddr) -> usize {
        debug_assert!(self.contains(vaddr));
        vaddr.0 - self.vaddr.0
    }

    /// `vaddr` 所在页的物理地址
    pub fn translate(&self, vaddr: VirtAddr) -> PhysAddr {
        self.paddr() + self.offset_of(vaddr.align_down())
    }

    pub fn page_count(&self) -> usize {
        self.frames.page_count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.frames.as_bytes()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.frames.as_bytes_mut()
    }
}
