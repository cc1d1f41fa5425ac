//! 控制台输出
//!
//! 进程服务器自己不持有串口, 由启动代码注册一个 [`Console`] 作为输出端.

use core::fmt::{self, Write};
use spin::Mutex;

pub trait Console: Sync {
    fn write_str(&self, s: &str);
}

lazy_static! {
    static ref CONSOLE: Mutex<Option<&'static dyn Console>> = Mutex::new(None);
}

/// 注册输出端, 重复注册时后者覆盖前者
pub fn set_console(console: &'static dyn Console) {
    *CONSOLE.lock() = Some(console);
}

struct Stdout;

impl Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let console = *CONSOLE.lock();
        if let Some(console) = console {
            console.write_str(s);
        }
        Ok(())
    }
}

pub fn print(args: fmt::Arguments<'_>) {
    // 没有注册输出端时静默丢弃
    let _ = Stdout.write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! println {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!(concat!($fmt, "\n") $(, $($arg)+)?));
    }
}
