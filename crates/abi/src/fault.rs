bitflags! {
    /// 内核转发给进程服务器的缺页原因
    ///
    /// - KERNEL: 缺页发生在内核态
    /// - USER: 缺页发生在用户态
    /// - WRITE: 写访问引起的缺页
    /// - PRESENT: 该页已经映射, 说明是权限错误而不是缺页
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PageFaultFlags: usize {
        const KERNEL = 1 << 0;
        const USER = 1 << 1;
        const WRITE = 1 << 2;
        const PRESENT = 1 << 3;
    }
}

impl PageFaultFlags {
    /// 该页已经有映射, 只能是访问权限不足
    pub fn is_protection_violation(&self) -> bool {
        self.contains(Self::PRESENT)
    }
}
