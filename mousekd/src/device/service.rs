// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use log::{debug, info, trace};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::command::parse;
use crate::device::state::{LifecycleState, VirtualPointerDevice};
use crate::event_sink::EventSink;
use crate::translator::translate;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to register the virtual pointer")]
    Registration(#[source] io::Error),

    #[error("the service has already been started (state: {0})")]
    AlreadyStarted(LifecycleState),

    #[error("the device is already open")]
    AlreadyOpen,

    #[error("there is no device to open (state: {0})")]
    Unavailable(LifecycleState),

    #[error("the device is not open (state: {0})")]
    NotOpen(LifecycleState),

    #[error("failed to forward events to the input subsystem")]
    Sink(#[source] io::Error),

    #[error("failed to unregister the virtual pointer")]
    Unregistration(#[source] io::Error),
}

#[derive(Debug)]
struct ServiceState<S: EventSink> {
    lifecycle: LifecycleState,
    device: Option<VirtualPointerDevice<S>>,
}

/// Owns the virtual pointer and serializes every operation on it.
///
/// The device exists from [`MousekService::start`] until it is released or
/// the service is stopped. There is no way back from `Closed`; the service
/// has to be restarted to create a new device.
#[derive(Debug)]
pub struct MousekService<S: EventSink> {
    state: Mutex<ServiceState<S>>,
}

impl<S: EventSink> Default for MousekService<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> MousekService<S> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServiceState {
                lifecycle: LifecycleState::Uninitialized,
                device: None,
            }),
        }
    }

    // A panic in another request must not take the device down with it.
    fn lock(&self) -> MutexGuard<'_, ServiceState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lock().lifecycle
    }

    /// Registers the sink returned by `register` and creates the device.
    pub fn start<F>(&self, register: F) -> Result<(), DeviceError>
    where
        F: FnOnce() -> io::Result<S>,
    {
        let mut state = self.lock();
        if state.lifecycle != LifecycleState::Uninitialized {
            return Err(DeviceError::AlreadyStarted(state.lifecycle));
        }

        let sink = register().map_err(DeviceError::Registration)?;
        state.device = Some(VirtualPointerDevice::new(sink));
        state.lifecycle = LifecycleState::Registered;
        debug!("virtual pointer registered");
        Ok(())
    }

    pub fn open(&self) -> Result<(), DeviceError> {
        let mut state = self.lock();
        match state.lifecycle {
            LifecycleState::Registered => {
                state.lifecycle = LifecycleState::Open;
                info!("faking a USB mouse via the character device");
                Ok(())
            }
            LifecycleState::Open => Err(DeviceError::AlreadyOpen),
            other => Err(DeviceError::Unavailable(other)),
        }
    }

    /// Runs the command in `buf` against the device. Always reports the
    /// whole buffer as written, even the part that was not interpreted.
    pub fn write(&self, buf: &[u8]) -> Result<usize, DeviceError> {
        let mut state = self.lock();
        let lifecycle = state.lifecycle;
        let device = match (lifecycle, state.device.as_mut()) {
            (LifecycleState::Open, Some(device)) => device,
            _ => return Err(DeviceError::NotOpen(lifecycle)),
        };

        let translated = translate(
            &mut device.sink,
            &mut device.pending_event,
            parse(buf),
        )
        .map_err(DeviceError::Sink)?;
        trace!(
            "write of {} bytes translated into {} instructions",
            buf.len(),
            translated
        );
        Ok(buf.len())
    }

    /// Reading is not supported. Returns 0 in every state.
    pub fn read(&self, _buf: &mut [u8]) -> usize {
        info!("read is not supported by this device");
        0
    }

    /// Ends the client session and destroys the device.
    pub fn release(&self) -> Result<(), DeviceError> {
        let mut state = self.lock();
        if state.lifecycle != LifecycleState::Open {
            return Err(DeviceError::NotOpen(state.lifecycle));
        }

        state.lifecycle = LifecycleState::Closed;
        let device = state.device.take();
        info!("closing the character device");
        match device {
            Some(device) => {
                debug!("releasing pointer at {:?}", device.position);
                device.sink.unregister().map_err(DeviceError::Unregistration)
            }
            None => Ok(()),
        }
    }

    /// Tears the service down. Safe to call in any state and more than once.
    pub fn stop(&self) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let previous = state.lifecycle;
        state.lifecycle = LifecycleState::Destroyed;

        match state.device.take() {
            Some(device) => {
                let position = device.position;
                device
                    .sink
                    .unregister()
                    .map_err(DeviceError::Unregistration)?;
                info!(
                    "virtual pointer uninstalled (was {}, position {:?})",
                    previous, position
                );
            }
            None => debug!("nothing to tear down (was {})", previous),
        }
        Ok(())
    }
}
