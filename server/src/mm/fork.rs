use super::AddressSpace;
use crate::error::Result;
use crate::task::Process;

/// 为 `child` 建立地址空间
///
/// 没有父进程时 (第一个进程) 得到空的地址空间; 否则逐块复制父进程的全部内存,
/// 父子之间不共享任何物理页.
pub fn fork(parent: Option<&Process>, child: &mut Process) -> Result<()> {
    child.mm.clear();
    if let Some(parent) = parent {
        clone_chunks(&parent.mm, &mut child.mm)?;
        debug!(
            "fork {} -> {}: copied {} chunk(s)",
            parent.pid,
            child.pid,
            child.mm.len()
        );
    }
    Ok(())
}

fn clone_chunks(src: &AddressSpace, dst: &mut AddressSpace) -> Result<()> {
    for chunk in src {
        let new_chunk = dst.alloc_chunk(chunk.vaddr(), chunk.len())?;
        new_chunk.as_bytes_mut().copy_from_slice(chunk.as_bytes());
    }
    Ok(())
}
