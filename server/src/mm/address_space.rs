use alloc::vec::Vec;
use core::slice::Iter;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::{Chunk, FrameAllocatorRef, FrameTracker, VirtAddr};
use crate::consts::PAGE_SIZE;
use crate::error::{MmError, Result};

/// 进程的地址空间, 按插入顺序保存已映射的 [`Chunk`]
///
/// 每个进程的块不多, 查找时直接线性扫描. 块不会被单独释放,
/// 地址空间析构时所有物理页一并归还给页帧管理器.
pub struct AddressSpace {
    chunks: Vec<Chunk>,
    frames: FrameAllocatorRef,
    lookups: AtomicUsize,
}

impl AddressSpace {
    pub fn new(frames: FrameAllocatorRef) -> Self {
        Self {
            chunks: Vec::new(),
            frames,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn frame_allocator(&self) -> &FrameAllocatorRef {
        &self.frames
    }

    /// 包含 `vaddr` 的块的下标
    pub(super) fn find(&self, vaddr: VirtAddr) -> Option<usize> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.chunks.iter().position(|chunk| chunk.contains(vaddr))
    }

    pub(super) fn chunk_mut(&mut self, idx: usize) -> &mut Chunk {
        &mut self.chunks[idx]
    }

    /// 找到包含 `vaddr` 的块, 还没有映射时返回 None
    pub fn resolve(&self, vaddr: VirtAddr) -> Option<&Chunk> {
        self.find(vaddr).map(|idx| &self.chunks[idx])
    }

    pub fn resolve_mut(&mut self, vaddr: VirtAddr) -> Option<&mut Chunk> {
        self.find(vaddr).map(|idx| &mut self.chunks[idx])
    }

    /// 到目前为止按地址查找块的次数
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// 在 `vaddr` 处新建一个长度为 `len` 的块并追加到地址空间末尾
    ///
    /// `vaddr` 必须页对齐, `len` 必须是页大小的正整数倍, 新块不能与已有的块重叠.
    /// 块的末尾超出地址空间时返回 [`MmError::InvalidAccess`],
    /// 物理内存不足时返回 [`MmError::OutOfMemory`].
    pub fn alloc_chunk(&mut self, vaddr: VirtAddr, len: usize) -> Result<&mut Chunk> {
        assert!(vaddr.is_aligned(), "chunk start {:?} is not page aligned", vaddr);
        assert!(
            len > 0 && len % PAGE_SIZE == 0,
            "chunk length {:#x} is not a multiple of the page size",
            len
        );
        let end = vaddr.checked_add(len).ok_or(MmError::InvalidAccess(vaddr))?;
        assert!(
            !self.chunks.iter().any(|chunk| chunk.overlaps(vaddr, end)),
            "chunk {:?}..{:?} overlaps an existing mapping",
            vaddr,
            end
        );

        let pages = len / PAGE_SIZE;
        let frames = FrameTracker::alloc(&self.frames, pages).ok_or(MmError::OutOfMemory(pages))?;
        trace!("alloc chunk {:?}..{:?} -> {:?}", vaddr, end, frames);

        self.chunks.push(Chunk::new(vaddr, frames));
        let idx = self.chunks.len() - 1;
        Ok(&mut self.chunks[idx])
    }

    /// 丢弃所有块, 物理页随之归还
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// 已经驻留在物理内存中的页数
    pub fn resident_pages(&self) -> usize {
        self.chunks.iter().map(Chunk::page_count).sum()
    }
}

impl<'a> IntoIterator for &'a AddressSpace {
    type Item = &'a Chunk;
    type IntoIter = Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
