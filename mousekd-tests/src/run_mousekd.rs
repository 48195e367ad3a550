// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::{
    path::{Path, PathBuf},
    process::{Child, Command},
    thread,
    time::{Duration, Instant},
};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// A mousekd instance that is stopped when the guard is dropped.
///
/// Every guard gets its own device node, because a released device is never
/// handed out again and tests must not share one.
pub struct MousekdGuard {
    child: Child,
    devnode: PathBuf,
    device_name: String,
}

impl MousekdGuard {
    pub fn start(devname: &str) -> Self {
        let device_name = format!("{}-pointer", devname);
        println!("Executing mousekd located via cargo run");
        let child = Command::new("cargo")
            .args([
                "run",
                "-p",
                "mousekd",
                "--",
                "--devname",
                devname,
                "--device-name",
                &device_name,
            ])
            .spawn()
            .expect("failed to start mousekd");

        let guard = Self {
            child,
            devnode: Path::new("/dev").join(devname),
            device_name,
        };
        guard.wait_for_devnode(Duration::from_secs(60));
        guard
    }

    // cargo may still be compiling, so poll instead of sleeping a fixed time
    fn wait_for_devnode(&self, timeout: Duration) {
        let started = Instant::now();
        while !self.devnode.exists() {
            if started.elapsed() > timeout {
                panic!("{} did not appear within {:?}", self.devnode.display(), timeout);
            }
            thread::sleep(Duration::from_millis(100));
        }
        // udev needs a moment for the evdev node of the virtual pointer
        thread::sleep(Duration::from_millis(300));
    }

    pub fn devnode(&self) -> &Path {
        &self.devnode
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Drop for MousekdGuard {
    fn drop(&mut self) {
        let pid = Pid::from_raw(self.child.id() as i32);

        // First: SIGTERM
        let _ = signal::kill(pid, Signal::SIGTERM);

        // Wait a bit
        for _ in 0..10 {
            if let Ok(Some(_)) = self.child.try_wait() {
                return;
            }
            thread::sleep(Duration::from_millis(100));
        }

        // Still alive: SIGKILL
        let _ = signal::kill(pid, Signal::SIGKILL);
        let _ = self.child.wait();
    }
}
