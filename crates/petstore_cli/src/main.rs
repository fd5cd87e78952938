//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `petstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use petstore_core::db::{migrations, open_db_in_memory};

fn main() {
    println!("petstore_core version={}", petstore_core::core_version());

    match open_db_in_memory() {
        Ok(_) => println!(
            "petstore_core schema_version={}",
            migrations::latest_version()
        ),
        Err(err) => {
            eprintln!("petstore_core db bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
