// src/serial_link.rs

//! Bluetooth-serial credential relay.
//!
//! Independent of the weather pipeline: opens the board's serial port and
//! forwards `ssid:password` lines typed into a form. Host → device only; the
//! board never answers.

use std::{
    io::{self, BufRead, Write},
    thread,
    time::Duration,
};

use log::Level;
use serial::prelude::*;
use thiserror::Error;

use crate::config::SerialConfig;
use crate::relay_log;

/// Read timeout applied to the port.
const PORT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("cannot open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serial::Error,
    },

    #[error("cannot configure serial port: {0}")]
    Configure(#[source] serial::Error),

    #[error("serial write failed: {0}")]
    Io(#[from] io::Error),
}

/// One credential frame as the firmware expects it.
pub fn frame(ssid: &str, password: &str) -> String {
    format!("{ssid}:{password}\n")
}

pub struct CredentialLink<P: Write> {
    port: P,
}

impl CredentialLink<serial::SystemPort> {
    /// Open the port at 8N1, no flow control, then wait for the board to boot.
    pub fn open(cfg: &SerialConfig) -> Result<Self, SerialError> {
        let mut port = serial::open(&cfg.port).map_err(|source| SerialError::Open {
            port: cfg.port.clone(),
            source,
        })?;

        let settings = serial::PortSettings {
            baud_rate:    serial::BaudRate::from_speed(cfg.baud_rate),
            char_size:    serial::Bits8,
            parity:       serial::ParityNone,
            stop_bits:    serial::Stop1,
            flow_control: serial::FlowNone,
        };
        port.configure(&settings).map_err(SerialError::Configure)?;
        port.set_timeout(PORT_TIMEOUT).map_err(SerialError::Configure)?;

        relay_log!(Level::Info, "serial", "Opened {} at {} baud", cfg.port, cfg.baud_rate);
        thread::sleep(cfg.warmup);
        Ok(Self { port })
    }
}

impl<P: Write> CredentialLink<P> {
    pub fn from_port(port: P) -> Self {
        Self { port }
    }

    /// Send one credential pair. No acknowledgement is awaited.
    pub fn submit_form(&mut self, ssid: &str, password: &str) -> Result<(), SerialError> {
        self.port.write_all(frame(ssid, password).as_bytes())?;
        self.port.flush()?;
        relay_log!(Level::Info, "serial", "Sent credentials for SSID {:?}", ssid);
        Ok(())
    }

    /// Prompt for SSID and password pairs until `input` ends. Returns how
    /// many pairs were sent.
    pub fn run_form<R: BufRead, W: Write>(&mut self, input: R, mut prompt: W) -> Result<usize, SerialError> {
        let mut lines = input.lines();
        let mut sent = 0;
        loop {
            write!(prompt, "SSID: ")?;
            prompt.flush()?;
            let Some(ssid) = lines.next().transpose()? else { break };

            write!(prompt, "Password: ")?;
            prompt.flush()?;
            let Some(password) = lines.next().transpose()? else { break };

            self.submit_form(ssid.trim_end(), password.trim_end())?;
            sent += 1;
        }
        Ok(sent)
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_is_colon_joined_and_newline_terminated() {
        assert_eq!(frame("home", "hunter2"), "home:hunter2\n");
    }

    #[test]
    fn submit_writes_exactly_one_frame() {
        let mut link = CredentialLink::from_port(Vec::new());
        link.submit_form("lab", "p:ss").unwrap();
        assert_eq!(link.into_inner(), b"lab:p:ss\n");
    }

    #[test]
    fn form_loop_sends_complete_pairs_only() {
        let mut link = CredentialLink::from_port(Vec::new());
        let input = Cursor::new("home\nsecret\noffice\nletmein\ndangling\n");
        let mut prompts = Vec::new();
        let sent = link.run_form(input, &mut prompts).unwrap();
        assert_eq!(sent, 2);
        assert_eq!(link.into_inner(), b"home:secret\noffice:letmein\n");
        assert!(String::from_utf8(prompts).unwrap().starts_with("SSID: Password: "));
    }
}
