// SPDX-License-Identifier: MIT
// mousekd: virtual pointer driven through a character device
//
// - Exposes /dev/mousek (via CUSE). Writing "i_qQ" to it clicks the left button.
// - Forwards the resulting pointer events to a virtual device on /dev/uinput.
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use ::cuse_lowlevel::*;
use anyhow::Context;
use log::{error, info};
use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::path::PathBuf;

pub mod command;
pub mod cuse_device;
pub mod device;
pub mod event_sink;
pub mod translator;

use crate::cuse_device::{mousek_make_cuse_ops, UinputService};
use crate::device::MousekService;
use crate::event_sink::{UinputSetup, UinputSink};

use clap::Parser;

const DEV_PREFIX: &str = "/dev/";
const DEVNAME_MAX_LEN: usize = 128 - DEV_PREFIX.len();

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Major device number
    #[arg(long)]
    major: Option<u32>,

    /// Minor device number
    #[arg(long)]
    minor: Option<u32>,

    /// Device name (without /dev/)
    #[arg(long, default_value = "mousek")]
    devname: String,

    /// uinput device used to create the virtual pointer
    #[arg(long, value_name = "PATH", default_value = "/dev/uinput")]
    uinput_path: PathBuf,

    /// Name the virtual pointer reports to the input subsystem
    #[arg(long, default_value = "mousek")]
    device_name: String,

    /// USB vendor id of the virtual pointer
    #[arg(long, value_parser = parse_id, default_value = "0x1209")]
    vendor: u16,

    /// USB product id of the virtual pointer
    #[arg(long, value_parser = parse_id, default_value = "0x0001")]
    product: u16,
}

fn parse_id(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid id {s:?}: {e}"))
}

fn validate_args(args: &Args) -> Result<(), String> {
    // major/minor must appear together
    match (&args.major, &args.minor) {
        (Some(_), Some(_)) | (None, None) => {}
        _ => {
            return Err("--major and --minor must be specified together or not at all".into());
        }
    }

    if args.devname.is_empty() || args.devname.contains('/') {
        return Err("--devname must be a non-empty name without '/'".into());
    }
    if args.devname.len() >= DEVNAME_MAX_LEN {
        return Err(format!(
            "--devname must be shorter than {} bytes",
            DEVNAME_MAX_LEN
        ));
    }

    if args.device_name.len() >= uinput_ioctls::UINPUT_MAX_NAME_SIZE {
        return Err(format!(
            "--device-name must be shorter than {} bytes",
            uinput_ioctls::UINPUT_MAX_NAME_SIZE
        ));
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let args = Args::parse();
    let argv0 = std::env::args_os()
        .next()
        .context("couldn't retrieve program name")?;

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let setup = UinputSetup {
        uinput_path: args.uinput_path.clone(),
        name: args.device_name.clone(),
        vendor: args.vendor,
        product: args.product,
    };

    let service: UinputService = MousekService::new();
    service
        .start(|| UinputSink::register(&setup))
        .with_context(|| {
            format!(
                "failed to create the virtual pointer through {}",
                setup.uinput_path.display()
            )
        })?;

    info!("Starting mousekd");
    info!(
        "To interact with the device, write to {}{}, e.g. echo -n 'i_qQ' > {}{}",
        DEV_PREFIX, args.devname, DEV_PREFIX, args.devname
    );

    let cuse_ops = mousek_make_cuse_ops();

    let devname = CString::new(format!("DEVNAME={}", args.devname))
        .context("--devname must not contain NUL bytes")?;
    let mut dev_info_argv: Vec<*const c_char> = vec![
        devname.as_ptr(),
        std::ptr::null(), // null terminator, often required by C APIs
    ];

    // setting dev_major and dev_minor to 0 leads to a dynamic assignment of the major and minor
    let (major, minor) = match (args.major, args.minor) {
        (Some(major), Some(minor)) => (major, minor),
        _ => (0, 0),
    };
    let ci = cuse_lowlevel::cuse_info {
        dev_major: major,
        dev_minor: minor,
        dev_info_argc: 1,
        dev_info_argv: dev_info_argv.as_mut_ptr(),
        flags: 0,
    };

    // foreground, single threaded
    let session_args = [
        CString::new(argv0.as_encoded_bytes()).context("program name contains NUL bytes")?,
        CString::new("-f")?,
        CString::new("-s")?,
    ];
    let mut session_argv: Vec<*mut c_char> = session_args
        .iter()
        .map(|arg| arg.as_ptr() as *mut c_char)
        .chain(std::iter::once(std::ptr::null_mut()))
        .collect();

    let ret = unsafe {
        cuse_lowlevel::cuse_lowlevel_main(
            session_args.len() as i32,
            session_argv.as_mut_ptr(),
            &ci,
            &cuse_ops,
            &service as *const UinputService as *mut c_void,
        )
    };

    info!("Stopping mousekd");
    if let Err(e) = service.stop() {
        error!("{:#}", anyhow::Error::from(e));
    }

    if ret != 0 {
        anyhow::bail!("the cuse session ended with status {}", ret);
    }
    Ok(())
}
