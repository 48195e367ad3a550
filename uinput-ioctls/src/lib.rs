// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! uinput ioctl wrappers and the subset of the Linux input event codes used to
//! drive a virtual pointer through `/dev/uinput`.

use libc::{c_char, c_uint, uinput_setup};

use nix::{ioctl_none, ioctl_read, ioctl_read_buf, ioctl_write_int, ioctl_write_ptr};

pub mod codes;

pub const UINPUT_MAX_NAME_SIZE: usize = 80;

ioctl_none!(ui_dev_create, b'U', 1);
ioctl_none!(ui_dev_destroy, b'U', 2);
ioctl_write_ptr!(ui_dev_setup, b'U', 3, uinput_setup);

ioctl_read_buf!(ui_get_sysname, b'U', 44, c_char);
ioctl_read!(ui_get_version, b'U', 45, c_uint);

ioctl_write_int!(ui_set_evbit, b'U', 100);
ioctl_write_int!(ui_set_keybit, b'U', 101);
ioctl_write_int!(ui_set_relbit, b'U', 102);
