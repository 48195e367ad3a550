// SPDX-License-Identifier: MIT
//
// Author: Richard Wiedenhöft <richard@wiedenhoeft.xyz>
// Author: Johannes Leupolz <dev@leupolz.eu>
//
// Raw libfuse3 bindings: the fuse request/reply calls and the cuse session
// entry point. Everything else in libfuse is filtered out in build.rs.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(clippy::useless_transmute)]
#![allow(clippy::missing_safety_doc)]

use libc::*;

pub mod fuse_lowlevel {
    use super::*;
    include!(concat!(env!("OUT_DIR"), "/fuse_lowlevel.rs"));
}

pub mod cuse_lowlevel {
    use super::*;

    use fuse_lowlevel::{fuse_conn_info, fuse_file_info, fuse_pollhandle, fuse_req_t};

    include!(concat!(env!("OUT_DIR"), "/cuse_lowlevel.rs"));
}
