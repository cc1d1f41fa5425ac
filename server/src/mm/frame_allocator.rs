use super::address::{PhysAddr, PhysPageNum};
use crate::consts::PAGE_SIZE;
use alloc::{boxed::Box, sync::Arc};
use buddy_system_allocator::FrameAllocator as BuddyAllocator;
use core::fmt::{self, Debug, Formatter};
use spin::Mutex;

/// 物理页帧管理器
///
/// 每次分配一段连续的物理页, 同时给出进程服务器自己可以直接读写这段内存的本地别名.
pub trait FrameAllocator: Send {
    /// 分配 `count` 个连续的物理页, 返回起始物理页号与本地别名
    fn alloc(&mut self, count: usize) -> Option<(PhysPageNum, Box<[u8]>)>;
    /// 回收从 `ppn` 开始的 `count` 个物理页
    fn dealloc(&mut self, ppn: PhysPageNum, count: usize);
    /// (已分配页数, 总页数)
    fn usage(&self) -> (usize, usize);
}

/// 多个进程共享的物理页帧管理器句柄
pub type FrameAllocatorRef = Arc<Mutex<dyn FrameAllocator>>;

/// 伙伴系统物理页帧管理器
pub struct BuddyFrameAllocator {
    inner: BuddyAllocator<32>,
    /// 管理的总页数
    total: usize,
    /// 已分配出去的页数
    in_use: usize,
}

impl BuddyFrameAllocator {
    pub fn new() -> Self {
        Self {
            inner: BuddyAllocator::new(),
            total: 0,
            in_use: 0,
        }
    }

    /// 把 [l, r) 范围内的物理页交给管理器
    pub fn init(&mut self, l: PhysPageNum, r: PhysPageNum) {
        assert!(l <= r, "frame range {:?}..{:?} is reversed", l, r);
        self.inner.add_frame(l.0, r.0);
        self.total += r.0 - l.0;
    }

    /// 起始地址上取整, 结束地址下取整
    pub fn with_range(start: PhysAddr, end: PhysAddr) -> Self {
        let mut allocator = Self::new();
        allocator.init(start.ceil(), end.floor());
        allocator
    }

    pub fn shared(self) -> FrameAllocatorRef {
        Arc::new(Mutex::new(self))
    }
}

impl Default for BuddyFrameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAllocator for BuddyFrameAllocator {
    fn alloc(&mut self, count: usize) -> Option<(PhysPageNum, Box<[u8]>)> {
        let ppn = self.inner.alloc(count)?;
        self.in_use += count;
        Some((PhysPageNum(ppn), vec![0u8; count * PAGE_SIZE].into_boxed_slice()))
    }

    fn dealloc(&mut self, ppn: PhysPageNum, count: usize) {
        assert!(
            self.in_use >= count,
            "[BuddyFrameAllocator::dealloc] {:?} x{} was never allocated",
            ppn,
            count
        );
        self.inner.dealloc(ppn.0, count);
        self.in_use -= count;
    }

    fn usage(&self) -> (usize, usize) {
        (self.in_use, self.total)
    }
}

/// 一段已分配的连续物理页, 析构时归还给分配它的管理器
pub struct FrameTracker {
    pub ppn: PhysPageNum,
    count: usize,
    buf: Box<[u8]>,
    allocator: FrameAllocatorRef,
}

impl FrameTracker {
    /// 管理器分配失败时返回 None
    pub fn alloc(allocator: &FrameAllocatorRef, count: usize) -> Option<Self> {
        let (ppn, buf) = allocator.lock().alloc(count)?;
        assert_eq!(
            buf.len(),
            count * PAGE_SIZE,
            "frame allocator returned a short local alias"
        );
        Some(Self {
            ppn,
            count,
            buf,
            allocator: Arc::clone(allocator),
        })
    }

    pub fn paddr(&self) -> PhysAddr {
        self.ppn.into()
    }

    pub fn page_count(&self) -> usize {
        self.count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Debug for FrameTracker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "FrameTracker:PPN={:#x} x{}",
            self.ppn.0, self.count
        ))
    }
}

impl Drop for FrameTracker {
    fn drop(&mut self) {
        self.allocator.lock().dealloc(self.ppn, self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PHYS_BASE;

    fn small_allocator(pages: usize) -> FrameAllocatorRef {
        BuddyFrameAllocator::with_range(
            PhysAddr(PHYS_BASE),
            PhysAddr(PHYS_BASE + pages * PAGE_SIZE),
        )
        .shared()
    }

    #[test]
    fn tracker_returns_frames_on_drop() {
        let frames = small_allocator(8);
        let tracker = FrameTracker::alloc(&frames, 2).unwrap();
        assert_eq!(tracker.as_bytes().len(), 2 * PAGE_SIZE);
        assert!(tracker.paddr().is_aligned());
        assert!(tracker.paddr().0 >= PHYS_BASE);
        assert_eq!(frames.lock().usage(), (2, 8));
        drop(tracker);
        assert_eq!(frames.lock().usage(), (0, 8));
    }

    #[test]
    fn default_range_covers_all_of_physical_memory() {
        let frames = crate::mm::init_frame_allocator();
        let total = (crate::consts::PHYS_END - PHYS_BASE) / PAGE_SIZE;
        assert_eq!(frames.lock().usage(), (0, total));
        let tracker = FrameTracker::alloc(&frames, 4).unwrap();
        assert!(tracker.paddr().0 >= PHYS_BASE && tracker.paddr().0 < crate::consts::PHYS_END);
    }

    #[test]
    fn exhaustion_is_reported_not_panicked() {
        let frames = small_allocator(2);
        let a = FrameTracker::alloc(&frames, 1).unwrap();
        let b = FrameTracker::alloc(&frames, 1).unwrap();
        assert_ne!(a.ppn, b.ppn);
        assert!(FrameTracker::alloc(&frames, 1).is_none());
        drop(a);
        assert!(FrameTracker::alloc(&frames, 1).is_some());
    }
}
