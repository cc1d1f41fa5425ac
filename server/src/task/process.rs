use alloc::{string::String, sync::Arc, vec::Vec};

use crate::consts::{HEAP_BASE, USER_SPACE_END};
use crate::elf::{load_program_headers, ProgramHeader};
use crate::error::{MmError, Result};
use crate::fs::File;
use crate::mm::{fork, AddressSpace, FrameAllocatorRef, VirtAddr};

/// 进程服务器眼中的一个进程
///
/// 这里只保存内存管理需要的部分: 堆的范围, 可执行文件与其程序段头, 以及地址空间.
pub struct Process {
    pub pid: usize,
    pub name: String,
    /// 堆的起始地址, 创建后不再变化
    pub heap_base: VirtAddr,
    /// 当前的 program break, [heap_base, current_brk) 内的页在第一次访问时分配
    pub current_brk: VirtAddr,
    /// 缺页时从这里读入代码和数据
    pub exec: Option<Arc<dyn File>>,
    pub phdrs: Vec<ProgramHeader>,
    pub mm: AddressSpace,
}

impl Process {
    /// 地址空间为空, 没有可执行文件, 堆大小为 0
    pub fn new(pid: usize, name: &str, frames: FrameAllocatorRef) -> Self {
        Self {
            pid,
            name: String::from(name),
            heap_base: VirtAddr(HEAP_BASE),
            current_brk: VirtAddr(HEAP_BASE),
            exec: None,
            phdrs: Vec::new(),
            mm: AddressSpace::new(frames),
        }
    }

    /// 以 `exec` 为可执行文件创建进程, 代码和数据都等到缺页时再读入
    pub fn from_elf(
        pid: usize,
        name: &str,
        exec: Arc<dyn File>,
        frames: FrameAllocatorRef,
    ) -> Result<Self> {
        let phdrs = load_program_headers(exec.as_ref())?;
        let mut proc = Self::new(pid, name, frames);
        proc.exec = Some(exec);
        proc.phdrs = phdrs;
        Ok(proc)
    }

    /// 调整 program break, 传入 0 时只查询
    ///
    /// 只移动边界, 不分配也不回收物理页. 缩小之后已经分配的堆页仍然留在地址空间里.
    /// 新的边界必须落在 [heap_base, USER_SPACE_END] 内.
    pub fn brk(&mut self, new_brk: VirtAddr) -> Result<VirtAddr> {
        if new_brk.0 == 0 {
            return Ok(self.current_brk);
        }
        if new_brk < self.heap_base || new_brk.0 > USER_SPACE_END {
            return Err(MmError::InvalidBreak(new_brk));
        }
        debug!("{}: brk {:?} -> {:?}", self.name, self.current_brk, new_brk);
        self.current_brk = new_brk;
        Ok(new_brk)
    }

    /// 复制出一个子进程, 子进程的地址空间是父进程的完整拷贝
    pub fn fork(&self, pid: usize) -> Result<Process> {
        let mut child = Process::new(pid, &self.name, self.mm.frame_allocator().clone());
        child.heap_base = self.heap_base;
        child.current_brk = self.current_brk;
        child.exec = self.exec.clone();
        child.phdrs = self.phdrs.clone();
        fork(Some(self), &mut child)?;
        Ok(child)
    }
}
