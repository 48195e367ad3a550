// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use ::cuse_lowlevel::*;
use libc::ENODEV;
use log::{debug, error, warn};

use crate::cuse_device::{errno_for, service_from_req};

pub unsafe extern "C" fn mousek_open(
    _req: fuse_lowlevel::fuse_req_t,
    _fi: *mut fuse_lowlevel::fuse_file_info,
) {
    if let Some(ctx) = fuse_lowlevel::fuse_req_ctx(_req).as_ref() {
        debug!("opened by process id {} (host view)", ctx.pid);
    }

    let Some(service) = service_from_req(_req) else {
        error!("open without a service attached to the session");
        fuse_lowlevel::fuse_reply_err(_req, ENODEV);
        return;
    };

    match service.open() {
        Ok(()) => {
            fuse_lowlevel::fuse_reply_open(_req, _fi);
        }
        Err(e) => {
            warn!("refusing open: {}", e);
            fuse_lowlevel::fuse_reply_err(_req, errno_for(&e));
        }
    }
}
