// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use ::cuse_lowlevel::*;
use libc::{c_char, off_t, size_t, ENODEV};
use log::{error, trace, warn};

use crate::cuse_device::{errno_for, service_from_req};
use crate::device::DeviceError;

pub unsafe extern "C" fn mousek_write(
    _req: fuse_lowlevel::fuse_req_t,
    _buf: *const c_char,
    _size: size_t,
    _off: off_t,
    _fi: *mut fuse_lowlevel::fuse_file_info,
) {
    let Some(service) = service_from_req(_req) else {
        error!("write without a service attached to the session");
        fuse_lowlevel::fuse_reply_err(_req, ENODEV);
        return;
    };

    let slice: &[u8] = if _buf.is_null() || _size == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(_buf as *const u8, _size)
    };
    trace!("write of {} bytes at offset {}", _size, _off);

    match service.write(slice) {
        Ok(written) => {
            fuse_lowlevel::fuse_reply_write(_req, written);
        }
        Err(e) => {
            match &e {
                DeviceError::Sink(source) => error!("{}: {}", e, source),
                _ => warn!("rejecting write: {}", e),
            }
            fuse_lowlevel::fuse_reply_err(_req, errno_for(&e));
        }
    }
}
