use alloc::{string::String, vec::Vec};
use core::sync::atomic::{AtomicUsize, Ordering};

use super::File;

/// 内容完全放在内存里的文件, 例如启动时随镜像一起加载的程序
pub struct MemFile {
    name: String,
    data: Vec<u8>,
    /// pread 被调用的次数
    reads: AtomicUsize,
}

impl MemFile {
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: String::from(name),
            data,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl File for MemFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn pread(&self, buf: &mut [u8], offset: usize) -> usize {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if offset >= self.data.len() {
            return 0;
        }
        let len = buf.len().min(self.data.len() - offset);
        buf[..len].copy_from_slice(&self.data[offset..offset + len]);
        len
    }

    fn file_size(&self) -> usize {
        self.data.len()
    }
}
