// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use ::cuse_lowlevel::*;
use libc::{off_t, size_t};

use crate::cuse_device::service_from_req;

// The device is write-only; every read ends immediately with 0 bytes.
pub unsafe extern "C" fn mousek_read(
    _req: fuse_lowlevel::fuse_req_t,
    _size: size_t,
    _off: off_t,
    _fi: *mut fuse_lowlevel::fuse_file_info,
) {
    let read = match service_from_req(_req) {
        Some(service) => service.read(&mut []),
        None => 0,
    };
    fuse_lowlevel::fuse_reply_buf(_req, std::ptr::null(), read);
}
