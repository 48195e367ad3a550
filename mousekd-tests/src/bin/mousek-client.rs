// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Opens a mousek device once, writes the given commands and prints what
//! happened as JSON on stdout.

use clap::Parser;
use libc::{input_event, O_NONBLOCK};
use mousekd_tests::client_log::{ClientLog, LoggedInputEvent, LoggedWrite};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::mem;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

const SYS_CLASS_INPUT: &str = "/sys/class/input/";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Device node of mousekd
    #[arg(long)]
    device: PathBuf,

    /// Commands to write, one write each
    commands: Vec<String>,

    /// Read from the device after writing
    #[arg(long)]
    read: bool,

    /// Try to open the device a second time while it is open
    #[arg(long)]
    second_open: bool,

    /// Capture the events of the input device with this name
    #[arg(long, value_name = "NAME")]
    capture: Option<String>,
}

fn errno(e: &io::Error) -> i32 {
    e.raw_os_error().unwrap_or(-1)
}

/// Finds /dev/input/eventN of the input device called `name`.
fn find_event_node(name: &str) -> io::Result<PathBuf> {
    for entry in fs::read_dir(SYS_CLASS_INPUT)? {
        let entry = entry?;
        let node = entry.file_name();
        let Some(node) = node.to_str() else { continue };
        if !node.starts_with("event") {
            continue;
        }
        let device_name = fs::read_to_string(entry.path().join("device/name"))?;
        if device_name.trim_end() == name {
            return Ok(PathBuf::from("/dev/input").join(node));
        }
    }
    Err(io::Error::new(
        ErrorKind::NotFound,
        format!("no input device named {}", name),
    ))
}

fn drain_events(event_device: &mut File) -> io::Result<Vec<LoggedInputEvent>> {
    let mut events = Vec::new();
    let mut buf = vec![0u8; mem::size_of::<input_event>()];
    loop {
        match event_device.read(&mut buf) {
            Ok(n) if n == buf.len() => {
                let ev: input_event = unsafe { std::ptr::read_unaligned(buf.as_ptr().cast()) };
                events.push(LoggedInputEvent {
                    type_: ev.type_,
                    code: ev.code,
                    value: ev.value,
                });
            }
            Ok(n) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("short read of {} bytes", n),
                ))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(events),
            Err(e) => return Err(e),
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut log = ClientLog::default();

    let mut event_device = match &args.capture {
        Some(name) => {
            let node = find_event_node(name)?;
            eprintln!("capturing {}", node.display());
            Some(
                OpenOptions::new()
                    .read(true)
                    .custom_flags(O_NONBLOCK)
                    .open(&node)?,
            )
        }
        None => None,
    };

    match OpenOptions::new().read(true).write(true).open(&args.device) {
        Err(e) => {
            eprintln!("couldn't open {}: {}", args.device.display(), e);
            log.open_error = Some(errno(&e));
        }
        Ok(mut device) => {
            if args.second_open {
                log.second_open_error = OpenOptions::new()
                    .write(true)
                    .open(&args.device)
                    .err()
                    .map(|e| errno(&e));
            }

            for command in &args.commands {
                let result = device.write(command.as_bytes()).map_err(|e| errno(&e));
                log.writes.push(LoggedWrite {
                    command: command.clone(),
                    requested: command.len(),
                    result,
                });
            }

            if args.read {
                let mut buf = [0u8; 64];
                log.read = Some(device.read(&mut buf).map_err(|e| errno(&e)));
            }

            // Must happen before the close: releasing destroys the input
            // device and evdev refuses reads from then on.
            if let Some(event_device) = event_device.as_mut() {
                sleep(Duration::from_millis(100));
                log.events = drain_events(event_device)?;
            }
        }
    }

    let serialized = serde_json::to_string(&log)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
    println!("{}", serialized);
    Ok(())
}
