//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskpad_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use taskpad_core::{MemoryStorage, Task, TaskStore};

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("taskpad_core ping={}", taskpad_core::ping());
    println!("taskpad_core version={}", taskpad_core::core_version());

    // One in-memory save/read cycle through the real store.
    let mut store = TaskStore::new(MemoryStorage::new());
    match smoke_cycle(&mut store) {
        Ok(()) => println!("taskpad_core store=ok count={}", store.count()),
        Err(err) => {
            eprintln!("taskpad_core store=error error={err}");
            std::process::exit(1);
        }
    }
}

fn smoke_cycle(
    store: &mut TaskStore<MemoryStorage>,
) -> Result<(), taskpad_core::StoreError> {
    store.load()?;
    store.save(Task::new("smoke task", 1_700_000_000_000))?;
    Ok(())
}
