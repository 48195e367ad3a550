// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod mousek_open;
pub mod mousek_read;
pub mod mousek_release;
pub mod mousek_write;

use ::cuse_lowlevel::*;
use libc::{c_int, c_void, EBADF, EBUSY, EIO, ENODEV};
use log::{error, info};

use crate::device::{DeviceError, MousekService};
use crate::event_sink::UinputSink;

pub type UinputService = MousekService<UinputSink>;

// Instance of cuse_lowlevel_ops. Setting an entry to None leads to e.g.
// "write error: Function not implemented" for the client.
pub fn mousek_make_cuse_ops() -> cuse_lowlevel::cuse_lowlevel_ops {
    cuse_lowlevel::cuse_lowlevel_ops {
        init: None,
        init_done: Some(mousek_init_done),
        destroy: Some(mousek_destroy),
        open: Some(mousek_open::mousek_open),
        read: Some(mousek_read::mousek_read),
        write: Some(mousek_write::mousek_write),
        flush: None,
        release: Some(mousek_release::mousek_release),
        fsync: None,
        ioctl: None,
        poll: None,
    }
}

/// The service handed to `cuse_lowlevel_main` as userdata.
///
/// Safety: `req` must be a live request of the session started in main,
/// whose userdata outlives the session.
pub(crate) unsafe fn service_from_req<'a>(
    req: fuse_lowlevel::fuse_req_t,
) -> Option<&'a UinputService> {
    let userdata = fuse_lowlevel::fuse_req_userdata(req) as *const UinputService;
    userdata.as_ref()
}

pub fn errno_for(err: &DeviceError) -> c_int {
    match err {
        DeviceError::AlreadyOpen => EBUSY,
        DeviceError::Unavailable(_) => ENODEV,
        DeviceError::NotOpen(_) => EBADF,
        DeviceError::Registration(_)
        | DeviceError::AlreadyStarted(_)
        | DeviceError::Sink(_)
        | DeviceError::Unregistration(_) => EIO,
    }
}

unsafe extern "C" fn mousek_init_done(_userdata: *mut c_void) {
    info!("character device is ready");
}

// Called once when the session ends. main stops the service again after
// cuse_lowlevel_main returns, which is a no-op by then.
unsafe extern "C" fn mousek_destroy(userdata: *mut c_void) {
    let Some(service) = (userdata as *const UinputService).as_ref() else {
        return;
    };
    if let Err(e) = service.stop() {
        error!("failed to stop the service: {:#}", anyhow::Error::from(e));
    }
}
