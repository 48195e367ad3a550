// SPDX-License-Identifier: MIT
//
// Author: Richard Wiedenhöft <richard@wiedenhoeft.xyz>
// Author: Johannes Leupolz <dev@leupolz.eu>
//
// Generates the libfuse3 bindings mousekd needs: the low-level request/reply
// calls of fuse and the session entry point of cuse.

extern crate bindgen;
extern crate pkg_config;

use std::env;
use std::iter;
use std::path::PathBuf;

const FUSE_USE_VERSION: u32 = 314; //fuse version of ubuntu 24.04

struct Header {
    name: &'static str,
    filter: fn(bindgen::Builder) -> bindgen::Builder,
}

const HEADERS: [Header; 2] = [
    Header {
        name: "fuse_lowlevel.h",
        filter: fuse_binding_filter,
    },
    Header {
        name: "cuse_lowlevel.h",
        filter: cuse_binding_filter,
    },
];

fn fuse_binding_filter(builder: bindgen::Builder) -> bindgen::Builder {
    // Types are needed in full because cuse_lowlevel_ops refers to them.
    // Of the functions only the request accessors and the replies are used.
    builder
        .allowlist_recursively(false)
        .allowlist_type("(?i)^fuse.*")
        .allowlist_function("^fuse_req_(userdata|ctx)$")
        .allowlist_function("^fuse_reply_(err|none|open|write|buf)$")
        .allowlist_var("(?i)^fuse.*")
        .blocklist_type("fuse_log_func_t")
}

fn cuse_binding_filter(builder: bindgen::Builder) -> bindgen::Builder {
    builder
        .allowlist_recursively(false)
        .allowlist_type("(?i)^cuse.*")
        .allowlist_function("^cuse_lowlevel_main$")
        .allowlist_var("(?i)^cuse.*")
}

fn find_header(header: &str, fuse_lib: &pkg_config::Library) -> String {
    let header_path = fuse_lib
        .include_paths
        .iter()
        .map(|include_path| include_path.join(header))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| panic!("Cannot find {}", header));

    header_path
        .to_str()
        .unwrap_or_else(|| panic!("Path to {} contains invalid unicode characters", header))
        .to_string()
}

fn generate_bindings(header: &Header, fuse_lib: &pkg_config::Library, out_dir: &PathBuf) {
    let header_path = find_header(header.name, fuse_lib);

    let defines = fuse_lib.defines.iter().map(|(key, val)| match val {
        Some(val) => format!("-D{}={}", key, val),
        None => format!("-D{}", key),
    });
    let includes = fuse_lib
        .include_paths
        .iter()
        .map(|dir| format!("-I{}", dir.display()));
    let api_define = iter::once(format!("-DFUSE_USE_VERSION={}", FUSE_USE_VERSION));
    let compile_flags = defines.chain(includes).chain(api_define);

    let builder = bindgen::builder()
        .clang_args(compile_flags)
        .derive_default(true)
        .derive_copy(true)
        .derive_debug(true)
        // rerun build.rs on header changes
        .parse_callbacks(Box::new(bindgen::CargoCallbacks));

    let bindings = (header.filter)(builder)
        .header(header_path)
        .generate()
        .unwrap_or_else(|_| panic!("Failed to generate {} bindings", header.name));

    let bindings_path = out_dir.join(header.name.replace(".h", ".rs"));
    bindings
        .write_to_file(&bindings_path)
        .unwrap_or_else(|_| panic!("Failed to write {}", bindings_path.display()));
}

fn main() {
    let fuse3_lib = pkg_config::Config::new()
        .cargo_metadata(true)
        .probe("fuse3")
        .expect("Failed to find pkg-config module fuse3");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    for header in HEADERS.iter() {
        generate_bindings(header, &fuse3_lib, &out_dir);
    }
}
