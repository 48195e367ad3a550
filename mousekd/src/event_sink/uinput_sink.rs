// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use libc::{c_char, input_event, uinput_setup, O_CLOEXEC};
use log::{debug, trace, warn};
use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use uinput_ioctls::codes::*;
use uinput_ioctls::*;

use super::EventSink;

pub const SYS_INPUT_DIR: &str = "/sys/devices/virtual/input/";

/// Keys the virtual pointer announces. The arrow keys are what the device
/// always advertised; the marker key of every instruction is `KEY_UP`.
const KEYS: [u16; 6] = [KEY_UP, KEY_LEFT, KEY_RIGHT, KEY_DOWN, BTN_LEFT, BTN_RIGHT];
const RELS: [u16; 3] = [REL_X, REL_Y, REL_WHEEL];

/// Identity of the virtual input device created through uinput.
#[derive(Debug, Clone)]
pub struct UinputSetup {
    pub uinput_path: PathBuf,
    pub name: String,
    pub vendor: u16,
    pub product: u16,
}

/// Virtual pointer registered with the kernel through `/dev/uinput`.
#[derive(Debug)]
pub struct UinputSink {
    file: File,
    syspath: Option<String>,
}

impl UinputSink {
    /// Opens uinput, declares the pointer capabilities and creates the device.
    pub fn register(setup: &UinputSetup) -> io::Result<UinputSink> {
        if setup.name.len() >= UINPUT_MAX_NAME_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "device name must be shorter than {} bytes",
                    UINPUT_MAX_NAME_SIZE
                ),
            ));
        }

        let file = OpenOptions::new()
            .write(true)
            .custom_flags(O_CLOEXEC)
            .open(&setup.uinput_path)
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("couldn't open {}: {}", setup.uinput_path.display(), e),
                )
            })?;
        let fd = file.as_raw_fd();

        let mut version: libc::c_uint = 0;
        match unsafe { ui_get_version(fd, &mut version) } {
            Ok(_) => debug!("uinput version {:#x}", version),
            Err(e) => debug!("UI_GET_VERSION not supported: {}", e),
        }

        unsafe {
            ui_set_evbit(fd, EV_KEY.into())?;
            for key in KEYS {
                ui_set_keybit(fd, key.into())?;
            }
            ui_set_evbit(fd, EV_REL.into())?;
            for rel in RELS {
                ui_set_relbit(fd, rel.into())?;
            }
        }

        let mut usetup: uinput_setup = unsafe { std::mem::zeroed() };
        usetup.id.bustype = BUS_USB;
        usetup.id.vendor = setup.vendor;
        usetup.id.product = setup.product;
        usetup.id.version = 1;
        for (dst, src) in usetup.name.iter_mut().zip(setup.name.bytes()) {
            *dst = src as c_char;
        }

        unsafe {
            ui_dev_setup(fd, &usetup)?;
            ui_dev_create(fd)?;
        }

        let mut resultbuf: [c_char; 64] = [0; 64];
        let syspath = match unsafe { ui_get_sysname(fd, &mut resultbuf) } {
            Ok(_) => {
                let sysname = unsafe { CStr::from_ptr(resultbuf.as_ptr()) }.to_string_lossy();
                Some(format!("{}{}", SYS_INPUT_DIR, sysname))
            }
            Err(e) => {
                warn!("couldn't query the sysname of the created device: {}", e);
                None
            }
        };
        debug!("uinput device created, syspath: {:?}", syspath);

        Ok(UinputSink { file, syspath })
    }
}

impl EventSink for UinputSink {
    fn emit(&mut self, type_: u16, code: u16, value: i32) -> io::Result<()> {
        // time is filled in by the kernel for synthetic events
        let mut ie: input_event = unsafe { std::mem::zeroed() };
        ie.type_ = type_;
        ie.code = code;
        ie.value = value;

        let bytes = unsafe {
            std::slice::from_raw_parts(
                (&ie as *const input_event) as *const u8,
                std::mem::size_of::<input_event>(),
            )
        };
        trace!("emit type {} code {} value {}", type_, code, value);
        self.file.write_all(bytes)
    }

    fn unregister(self) -> io::Result<()> {
        unsafe { ui_dev_destroy(self.file.as_raw_fd())? };
        debug!("uinput device {:?} destroyed", self.syspath);
        Ok(())
        // the file is closed here
    }
}
