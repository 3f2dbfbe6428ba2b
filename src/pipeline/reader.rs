//! Stdin reader thread.
//!
//! Raw input arrives as discrete byte chunks on a channel; the run loop
//! drains them and hands each chunk to the decoder synchronously. The
//! reader owns nothing shared (it only moves buffers), so the core stays
//! single-threaded. The thread parks in a blocking read and is reaped
//! with the process; once the receiver drops, the next send fails and the
//! loop exits.

use std::io::{self, Read};
use std::sync::mpsc::Sender;
use std::thread;

/// A message from the reader thread.
pub enum InputMessage {
    /// One chunk of raw bytes from stdin.
    Data(Vec<u8>),
    /// Stdin reached EOF or failed; no more input will arrive.
    Closed,
}

/// Spawn the reader thread, forwarding stdin chunks to `tx`.
pub fn spawn(tx: Sender<InputMessage>) -> io::Result<()> {
    thread::Builder::new()
        .name("ember-stdin".to_string())
        .spawn(move || {
            let mut stdin = io::stdin();
            let mut buf = [0u8; 1024];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => {
                        let _ = tx.send(InputMessage::Closed);
                        break;
                    }
                    Ok(n) => {
                        if tx.send(InputMessage::Data(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => {
                        let _ = tx.send(InputMessage::Closed);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}
