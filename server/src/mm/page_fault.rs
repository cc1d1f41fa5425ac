//! 缺页处理
//!
//! 进程的页只在第一次被访问时才分配: 堆页以 0 填充, 代码/数据页从可执行文件中读入.

use abi::PageFaultFlags;

use super::{PhysAddr, VirtAddr};
use crate::consts::PAGE_SIZE;
use crate::elf::ProgramHeader;
use crate::error::{MmError, Result};
use crate::task::Process;

/// 解决 `proc` 在 `vaddr` 处的缺页, 返回该页对应的物理地址
///
/// 失败时调用者应当终止该进程 (物理内存不足除外).
pub fn handle_page_fault(
    proc: &mut Process,
    vaddr: VirtAddr,
    fault: PageFaultFlags,
) -> Result<PhysAddr> {
    let aligned_vaddr = vaddr.align_down();

    if fault.is_protection_violation() {
        // 例如写只读页
        warn!(
            "{}: invalid memory access at {:?} (perhaps segfault?)",
            proc.name, vaddr
        );
        return Err(MmError::ProtectionViolation(vaddr));
    }

    if let Some(chunk) = proc.mm.resolve(vaddr) {
        return Ok(chunk.translate(vaddr));
    }

    // 堆: 一次只分配一页
    if proc.heap_base <= vaddr && vaddr < proc.current_brk {
        let chunk = proc.mm.alloc_chunk(aligned_vaddr, PAGE_SIZE)?;
        chunk.as_bytes_mut().fill(0);
        debug!("{}: allocated heap at {:?}", proc.name, aligned_vaddr);
        return Ok(chunk.paddr());
    }

    let phdr = match proc
        .phdrs
        .iter()
        .find(|phdr| phdr.is_loadable() && phdr.contains(vaddr))
    {
        Some(phdr) => *phdr,
        None => {
            warn!(
                "invalid memory access (addr={:?}), killing {}...",
                vaddr, proc.name
            );
            return Err(MmError::InvalidAccess(vaddr));
        }
    };
    let exec = match proc.exec.clone() {
        Some(exec) => exec,
        None => {
            warn!("{}: {:?} belongs to a segment but no image is attached", proc.name, vaddr);
            return Err(MmError::InvalidAccess(vaddr));
        }
    };

    let chunk = proc.mm.alloc_chunk(aligned_vaddr, PAGE_SIZE)?;
    let page = chunk.as_bytes_mut();
    page.fill(0);

    let (offset_in_file, offset_in_page, copy_len) = file_window(&phdr, aligned_vaddr);
    if copy_len > 0 {
        let read_len = exec.pread(
            &mut page[offset_in_page..offset_in_page + copy_len],
            offset_in_file,
        );
        if read_len < copy_len {
            warn!(
                "{}: short read of {} at {:#x} ({} of {} bytes)",
                proc.name,
                exec.name(),
                offset_in_file,
                read_len,
                copy_len
            );
        }
    }
    debug!(
        "{}: loaded {:?} from file offset {:#x} ({} bytes)",
        proc.name, aligned_vaddr, offset_in_file, copy_len
    );

    Ok(chunk.paddr())
}

/// 计算页 `aligned_vaddr` 需要从文件中读入的部分: (文件偏移, 页内偏移, 长度)
///
/// 长度为 0 说明整页都落在 .bss 中, 保持全 0 即可.
fn file_window(phdr: &ProgramHeader, aligned_vaddr: VirtAddr) -> (usize, usize, usize) {
    if aligned_vaddr < phdr.vaddr {
        // 段的第一页, 段不是从页边界开始的
        let offset_in_page = phdr.vaddr.page_offset();
        let copy_len = (PAGE_SIZE - offset_in_page).min(phdr.file_size);
        (phdr.offset, offset_in_page, copy_len)
    } else {
        let offset_in_segment = aligned_vaddr.0 - phdr.vaddr.0;
        if offset_in_segment >= phdr.file_size {
            (0, 0, 0)
        } else {
            let copy_len = (phdr.file_size - offset_in_segment).min(PAGE_SIZE);
            (phdr.offset + offset_in_segment, 0, copy_len)
        }
    }
}
