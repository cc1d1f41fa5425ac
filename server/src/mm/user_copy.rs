//! 进程服务器与用户进程地址空间之间的数据拷贝
//!
//! 拷贝按页切分, 每一段都不跨页. 目标页还没有映射时先按缺页处理,
//! 与进程自己访问这一页时的效果相同.

use abi::PageFaultFlags;
use alloc::{string::String, vec::Vec};

use super::{handle_page_fault, Chunk, VirtAddr};
use crate::error::{MmError, Result};
use crate::task::Process;

/// 找到 `vaddr` 所在的块, 必要时先解决缺页
fn user_chunk(proc: &mut Process, vaddr: VirtAddr) -> Result<&mut Chunk> {
    let idx = match proc.mm.find(vaddr) {
        Some(idx) => idx,
        None => {
            handle_page_fault(proc, vaddr, PageFaultFlags::USER).map_err(|err| match err {
                MmError::OutOfMemory(_) => err,
                _ => MmError::NotPermitted(vaddr),
            })?;
            proc.mm
                .find(vaddr)
                .expect("page is still unmapped after a successful fault")
        }
    };
    Ok(proc.mm.chunk_mut(idx))
}

/// 依次对 [start, start + len) 中不跨页的每一段调用 `f(块, 块内偏移, 已处理长度, 本段长度)`
///
/// 范围越过地址空间上界时什么也不做, 直接返回 [`MmError::NotPermitted`].
fn for_each_user_page<F>(proc: &mut Process, start: VirtAddr, len: usize, mut f: F) -> Result<()>
where
    F: FnMut(&mut Chunk, usize, usize, usize),
{
    if start.checked_add(len).is_none() {
        return Err(MmError::NotPermitted(start));
    }
    let mut vaddr = start;
    let mut done = 0;
    while done < len {
        let copy_len = (len - done).min(vaddr.remaining_in_page());
        let chunk = user_chunk(proc, vaddr)?;
        let offset = chunk.offset_of(vaddr);
        f(chunk, offset, done, copy_len);
        vaddr = vaddr + copy_len;
        done += copy_len;
    }
    Ok(())
}

/// 从 `proc` 的 `src` 处读取 `dst.len()` 字节
///
/// 中途失败时已经拷贝的部分不会回滚.
pub fn copy_from_user(proc: &mut Process, dst: &mut [u8], src: VirtAddr) -> Result<()> {
    for_each_user_page(proc, src, dst.len(), |chunk, offset, done, len| {
        dst[done..done + len].copy_from_slice(&chunk.as_bytes()[offset..offset + len]);
    })
}

/// 把 `src` 写到 `proc` 的 `dst` 处
pub fn copy_to_user(proc: &mut Process, dst: VirtAddr, src: &[u8]) -> Result<()> {
    for_each_user_page(proc, dst, src.len(), |chunk, offset, done, len| {
        chunk.as_bytes_mut()[offset..offset + len].copy_from_slice(&src[done..done + len]);
    })
}

/// 把 `proc` 中 [dst, dst + len) 清零
pub fn zero_user(proc: &mut Process, dst: VirtAddr, len: usize) -> Result<()> {
    for_each_user_page(proc, dst, len, |chunk, offset, _, n| {
        chunk.as_bytes_mut()[offset..offset + n].fill(0);
    })
}

/// 从 `src` 逐字节读取以 `\0` 结尾的字符串, 最多读 `max_len` 字节 (不超过 `dst` 的长度)
///
/// 返回不含 `\0` 的字符串长度. 读到 `\0` 时它也会被写入 `dst`.
pub fn strncpy_from_user(
    proc: &mut Process,
    dst: &mut [u8],
    src: VirtAddr,
    max_len: usize,
) -> Result<usize> {
    let max_len = max_len.min(dst.len());
    let mut read_len = 0;
    while read_len < max_len {
        let mut ch = [0u8; 1];
        let vaddr = src
            .checked_add(read_len)
            .ok_or(MmError::NotPermitted(src))?;
        copy_from_user(proc, &mut ch, vaddr)?;
        dst[read_len] = ch[0];
        if ch[0] == 0 {
            break;
        }
        read_len += 1;
    }
    Ok(read_len)
}

/// 读取用户进程中的字符串, 非法 UTF-8 以替换字符代替
pub fn read_cstr(proc: &mut Process, src: VirtAddr, max_len: usize) -> Result<String> {
    let mut buf: Vec<u8> = vec![0; max_len];
    let len = strncpy_from_user(proc, &mut buf, src, max_len)?;
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}
