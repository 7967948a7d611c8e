//! SSDP (Simple Service Discovery Protocol) client
//!
//! Internal to the crate: sends one M-SEARCH and reads responses until the
//! discovery window closes.

use crate::error::{DiscoveryError, Result};
use std::net::UdpSocket;
use std::time::{Duration, Instant};

pub(crate) const SSDP_ADDR: &str = "239.255.255.250:1900";

/// Search target advertised by Roku ECP devices
pub(crate) const ROKU_SEARCH_TARGET: &str = "roku:ecp";

/// SSDP response containing device information
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SsdpResponse {
    pub location: String,
    pub st: String,
    pub usn: String,
    pub server: Option<String>,
}

/// SSDP client for device discovery
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    window: Duration,
}

impl SsdpClient {
    /// Create a new SSDP client that listens for `window` after each search
    pub fn new(window: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self { socket, window })
    }

    /// Send an M-SEARCH request and return an iterator of responses.
    ///
    /// The iterator takes over the socket and yields each answer as soon as it
    /// arrives, until the window closes.
    pub fn search(self, search_target: &str) -> Result<SsdpResponseIterator> {
        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 1\r\n\
             ST: {}\r\n\
             USER-AGENT: roku-bridge/1.0 UPnP/1.0\r\n\
             \r\n",
            SSDP_ADDR, search_target
        );

        self.socket
            .send_to(request.as_bytes(), SSDP_ADDR)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        Ok(SsdpResponseIterator::new(self.socket, Instant::now() + self.window))
    }
}

/// Iterator for SSDP responses, bounded by a deadline
pub(crate) struct SsdpResponseIterator {
    socket: UdpSocket,
    deadline: Instant,
    buffer: [u8; 2048],
    finished: bool,
}

impl SsdpResponseIterator {
    pub(crate) fn new(socket: UdpSocket, deadline: Instant) -> Self {
        Self {
            socket,
            deadline,
            buffer: [0; 2048],
            finished: false,
        }
    }
}

impl Iterator for SsdpResponseIterator {
    type Item = Result<SsdpResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.finished = true;
                break;
            }

            if let Err(e) = self.socket.set_read_timeout(Some(remaining)) {
                self.finished = true;
                return Some(Err(DiscoveryError::NetworkError(format!(
                    "Failed to set read timeout: {}",
                    e
                ))));
            }

            match self.socket.recv_from(&mut self.buffer) {
                Ok((size, _)) => {
                    // Skip anything that isn't a well-formed UTF-8 SSDP response
                    if let Ok(text) = std::str::from_utf8(&self.buffer[..size]) {
                        if let Some(response) = parse_ssdp_response(text) {
                            return Some(Ok(response));
                        }
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    self.finished = true;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(DiscoveryError::NetworkError(format!("Socket error: {}", e))));
                }
            }
        }
        None
    }
}

/// Parse an SSDP response from HTTP text
pub(crate) fn parse_ssdp_response(response: &str) -> Option<SsdpResponse> {
    let mut location = None;
    let mut st = None;
    let mut usn = None;
    let mut server = None;

    for line in response.lines() {
        let line = line.trim();

        if let Some(value) = extract_header_value(line, "LOCATION:") {
            location = Some(value);
        } else if let Some(value) = extract_header_value(line, "ST:") {
            st = Some(value);
        } else if let Some(value) = extract_header_value(line, "USN:") {
            usn = Some(value);
        } else if let Some(value) = extract_header_value(line, "SERVER:") {
            server = Some(value);
        }
    }

    match (location, st, usn) {
        (Some(location), Some(st), Some(usn)) => Some(SsdpResponse {
            location,
            st,
            usn,
            server,
        }),
        _ => None,
    }
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    if line.len() > header.len() && line[..header.len()].eq_ignore_ascii_case(header) {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}
