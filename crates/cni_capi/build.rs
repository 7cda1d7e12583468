use std::env;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    let bindings = cbindgen::generate(crate_dir).expect("Unable to generate CNI bindings.");
    bindings.write_to_file("include/cni/cni.h");
}
