//! Command inbox between the wireless transport and the control loop.
//!
//! The transport's write callback runs on its own task; the control loop
//! is synchronous.  A bounded `embassy-sync` channel bridges the two
//! without heap allocation.
//!
//! ```text
//! ┌──────────────┐  AppCommand  ┌──────────────┐
//! │  Transport   │────────────▶│ Control Loop │
//! │  (callback)  │             │  (1 Hz tick) │
//! └──────────────┘             └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::commands::AppCommand;

/// Channel depth for inbound commands.
const INBOX_DEPTH: usize = 4;

static INBOX: Channel<CriticalSectionRawMutex, AppCommand, INBOX_DEPTH> = Channel::new();

/// Queue a command for the next tick.  Never blocks.
/// Returns `false` if the inbox is full (command dropped).
pub fn submit(cmd: AppCommand) -> bool {
    match INBOX.try_send(cmd) {
        Ok(()) => true,
        Err(_) => {
            warn!("inbox full, dropping {:?}", cmd);
            false
        }
    }
}

/// Hand every pending command to `handler`, oldest first.
pub fn drain(mut handler: impl FnMut(AppCommand)) {
    while let Ok(cmd) = INBOX.try_receive() {
        handler(cmd);
    }
}
