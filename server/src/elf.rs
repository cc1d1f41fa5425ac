//! 从可执行文件中取出程序段头
//!
//! 真正的装载是缺页时按页完成的, 这里只负责把程序段头表读出来交给缺页处理.

use alloc::vec::Vec;
use core::mem::size_of;
use xmas_elf::header::HeaderPt2;
use xmas_elf::{program, ElfFile};

use crate::consts::ELF_HEADER_SIZE;
use crate::error::{MmError, Result};
use crate::fs::File;
use crate::mm::VirtAddr;

/// 程序段头
///
/// - `vaddr`: 段在进程地址空间中的起始地址, 不一定页对齐
/// - `mem_size`: 段在内存中的长度, 超出 `file_size` 的部分 (.bss) 以 0 填充
/// - `file_size`: 段在文件中的长度
/// - `offset`: 段在文件中的偏移
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramHeader {
    pub vaddr: VirtAddr,
    pub mem_size: usize,
    pub file_size: usize,
    pub offset: usize,
}

impl ProgramHeader {
    pub fn new(vaddr: usize, offset: usize, file_size: usize, mem_size: usize) -> Self {
        Self {
            vaddr: VirtAddr(vaddr),
            mem_size,
            file_size,
            offset,
        }
    }

    /// 虚拟地址为 0 的段 (如 GNU_STACK) 不参与装载
    pub fn is_loadable(&self) -> bool {
        self.vaddr.0 != 0
    }

    pub fn contains(&self, vaddr: VirtAddr) -> bool {
        self.vaddr <= vaddr && vaddr.0 - self.vaddr.0 < self.mem_size
    }
}

fn read_head(file: &dyn File, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    if file.pread(&mut buf, 0) != len {
        return Err(MmError::InvalidElf("file is shorter than its headers"));
    }
    Ok(buf)
}

/// 读取 `file` 的全部 LOAD 段头
pub fn load_program_headers(file: &dyn File) -> Result<Vec<ProgramHeader>> {
    // 第一次读取前64字节确定程序表的位置与大小
    let elf_head_data = read_head(file, ELF_HEADER_SIZE)?;
    let elf = ElfFile::new(elf_head_data.as_slice()).map_err(MmError::InvalidElf)?;

    let ph_entry_size = elf.header.pt2.ph_entry_size() as usize;
    let ph_offset = elf.header.pt2.ph_offset() as usize;
    let ph_count = elf.header.pt2.ph_count();

    let expected_entry_size = match elf.header.pt2 {
        HeaderPt2::Header32(_) => size_of::<program::ProgramHeader32>(),
        HeaderPt2::Header64(_) => size_of::<program::ProgramHeader64>(),
    };
    if ph_entry_size != expected_entry_size {
        return Err(MmError::InvalidElf("unexpected program header entry size"));
    }
    let ph_end = (ph_count as usize)
        .checked_mul(ph_entry_size)
        .and_then(|table_size| table_size.checked_add(ph_offset))
        .ok_or(MmError::InvalidElf("program header table is out of range"))?;
    if ph_end > file.file_size() {
        return Err(MmError::InvalidElf("file is shorter than its headers"));
    }

    // 进行第二次读取, 这样的elf对象才能正确解析程序段头的信息
    let elf_head_data = read_head(file, ph_end)?;
    let elf = ElfFile::new(elf_head_data.as_slice()).map_err(MmError::InvalidElf)?;

    let mut phdrs = Vec::new();
    for i in 0..ph_count {
        let ph = elf.program_header(i).map_err(MmError::InvalidElf)?;
        match ph.get_type().map_err(MmError::InvalidElf)? {
            program::Type::Load => {}
            _ => continue,
        }
        let phdr = ProgramHeader::new(
            ph.virtual_addr() as usize,
            ph.offset() as usize,
            ph.file_size() as usize,
            ph.mem_size() as usize,
        );
        // 缺页时按这两个范围计算地址与文件偏移
        if phdr.vaddr.checked_add(phdr.mem_size).is_none()
            || phdr.offset.checked_add(phdr.file_size).is_none()
        {
            return Err(MmError::InvalidElf("segment exceeds the address space"));
        }
        phdrs.push(phdr);
    }
    debug!("{}: {} loadable segment(s)", file.name(), phdrs.len());
    Ok(phdrs)
}
