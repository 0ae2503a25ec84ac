use anyhow::Result;

use xlsearch::linker::{builtin_linkers, DEFAULT_LINKER};

/// Print the built-in cross-linkers
pub fn run() -> Result<()> {
    println!("Built-in cross-linkers");
    println!("======================");
    for linker in builtin_linkers() {
        let marker = if linker.name() == DEFAULT_LINKER { " (default)" } else { "" };
        println!("{linker}{marker}");
    }
    Ok(())
}
