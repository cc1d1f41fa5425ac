/// 可执行文件的读取端
///
/// 进程服务器只需要按偏移读取, 具体由文件系统服务实现.
pub trait File: Send + Sync {
    fn name(&self) -> &str;
    /// 从 `offset` 开始读取数据放到 `buf` 中, 最多将缓冲区填满, 返回实际读取的字节数
    fn pread(&self, buf: &mut [u8], offset: usize) -> usize;
    fn file_size(&self) -> usize;
}
