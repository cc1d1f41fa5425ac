#![allow(dead_code)]

use std::sync::Arc;

use procsrv::consts::{PAGE_SIZE, PHYS_BASE};
use procsrv::fs::{File, MemFile};
use procsrv::mm::{BuddyFrameAllocator, FrameAllocatorRef, PhysAddr};
use procsrv::Process;

pub fn frames(pages: usize) -> FrameAllocatorRef {
    BuddyFrameAllocator::with_range(
        PhysAddr(PHYS_BASE),
        PhysAddr(PHYS_BASE + pages * PAGE_SIZE),
    )
    .shared()
}

/// 一个只有堆的进程
pub fn heap_process(heap_pages: usize) -> Process {
    let mut proc = Process::new(1, "heap", frames(64));
    let brk = proc.heap_base + heap_pages * PAGE_SIZE;
    proc.brk(brk).unwrap();
    proc
}

/// 一个以内存文件为可执行文件的进程, 程序段头直接给出
pub fn image_process(
    data: Vec<u8>,
    phdrs: Vec<procsrv::elf::ProgramHeader>,
) -> (Process, Arc<MemFile>) {
    let file = Arc::new(MemFile::new("image", data));
    let mut proc = Process::new(2, "image", frames(64));
    proc.exec = Some(file.clone() as Arc<dyn File>);
    proc.phdrs = phdrs;
    (proc, file)
}

/// 文件内容为 `len` 字节的递增序列, 便于核对偏移
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 + 1).collect()
}

/// (p_type, p_flags, p_offset, p_vaddr, p_filesz, p_memsz)
pub type RawPhdr = (u32, u32, u64, u64, u64, u64);

pub const PT_LOAD: u32 = 1;
pub const PT_GNU_STACK: u32 = 0x6474_e551;

/// 构造一个最小的 ELF64 小端可执行文件, 程序段头表紧跟在文件头之后
pub fn build_elf(phdrs: &[RawPhdr], total_len: usize) -> Vec<u8> {
    let mut elf = vec![0u8; total_len.max(64 + 56 * phdrs.len())];
    elf[0..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
    elf[4] = 2; // ELFCLASS64
    elf[5] = 1; // little endian
    elf[6] = 1; // EV_CURRENT
    elf[16..18].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    elf[18..20].copy_from_slice(&0xf3u16.to_le_bytes()); // RISC-V
    elf[20..24].copy_from_slice(&1u32.to_le_bytes());
    elf[24..32].copy_from_slice(&0x1_0000u64.to_le_bytes()); // entry
    elf[32..40].copy_from_slice(&64u64.to_le_bytes()); // phoff
    elf[52..54].copy_from_slice(&64u16.to_le_bytes()); // ehsize
    elf[54..56].copy_from_slice(&56u16.to_le_bytes()); // phentsize
    elf[56..58].copy_from_slice(&(phdrs.len() as u16).to_le_bytes());
    elf[58..60].copy_from_slice(&64u16.to_le_bytes()); // shentsize

    for (i, &(p_type, p_flags, offset, vaddr, filesz, memsz)) in phdrs.iter().enumerate() {
        let ph = &mut elf[64 + 56 * i..64 + 56 * (i + 1)];
        ph[0..4].copy_from_slice(&p_type.to_le_bytes());
        ph[4..8].copy_from_slice(&p_flags.to_le_bytes());
        ph[8..16].copy_from_slice(&offset.to_le_bytes());
        ph[16..24].copy_from_slice(&vaddr.to_le_bytes());
        ph[24..32].copy_from_slice(&vaddr.to_le_bytes());
        ph[32..40].copy_from_slice(&filesz.to_le_bytes());
        ph[40..48].copy_from_slice(&memsz.to_le_bytes());
        ph[48..56].copy_from_slice(&0x1000u64.to_le_bytes());
    }
    elf
}
