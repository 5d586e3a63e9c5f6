use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=memory.x");

    // Host builds (tests) never link against memory.x
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();

    // Tell the linker where to find memory.x
    println!("cargo:rustc-link-search={}", out.display());
}
