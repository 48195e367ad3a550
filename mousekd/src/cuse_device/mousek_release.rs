// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use ::cuse_lowlevel::*;
use log::{error, warn};

use crate::cuse_device::service_from_req;
use crate::device::DeviceError;

pub unsafe extern "C" fn mousek_release(
    _req: fuse_lowlevel::fuse_req_t,
    _fi: *mut fuse_lowlevel::fuse_file_info,
) {
    match service_from_req(_req).map(|service| service.release()) {
        Some(Ok(())) => {}
        Some(Err(e @ DeviceError::Unregistration(_))) => {
            error!("{:#}", anyhow::Error::from(e));
        }
        Some(Err(e)) => warn!("release: {}", e),
        None => error!("release without a service attached to the session"),
    }

    // Note: For CUSE, the kernel always issues RELEASE via fuse_sync_release(),
    // which forces a *synchronous* request. Calling fuse_reply_none() would
    // leave the kernel waiting forever, so a real reply is always sent.
    fuse_lowlevel::fuse_reply_err(_req, 0);
}
