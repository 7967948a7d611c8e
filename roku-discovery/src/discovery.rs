//! Core discovery logic and iterator implementation.
//!
//! The iterator sends one SSDP M-SEARCH for `roku:ecp`, drops responses that
//! don't look like Roku players, de-duplicates by location and yields one
//! event per device as soon as its answer arrives.

use crate::error::Result;
use crate::ssdp::{SsdpClient, SsdpResponse, SsdpResponseIterator, ROKU_SEARCH_TARGET};
use crate::{Device, DeviceEvent};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

/// Iterator that discovers Roku devices on the local network.
///
/// # Examples
///
/// ```no_run
/// use roku_discovery::{get_iter_with_timeout, DeviceEvent};
/// use std::time::Duration;
///
/// for event in get_iter_with_timeout(Duration::from_secs(1)) {
///     match event {
///         DeviceEvent::Found(device) => println!("Found: {}", device.ip_address),
///     }
/// }
/// ```
pub struct DiscoveryIterator {
    ssdp_client: Option<SsdpClient>,
    responses: Option<SsdpResponseIterator>,
    ssdp_buffer: VecDeque<SsdpResponse>,
    seen_locations: HashSet<String>,
}

impl DiscoveryIterator {
    /// Create a new discovery iterator listening for `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut iter = Self::empty();
        iter.ssdp_client = Some(SsdpClient::new(timeout)?);
        Ok(iter)
    }

    /// Create an empty iterator that yields no results
    pub(crate) fn empty() -> Self {
        Self {
            ssdp_client: None,
            responses: None,
            ssdp_buffer: VecDeque::new(),
            seen_locations: HashSet::new(),
        }
    }

    /// Iterator reading from an already-sent search
    pub(crate) fn from_responses(responses: SsdpResponseIterator) -> Self {
        let mut iter = Self::empty();
        iter.responses = Some(responses);
        iter
    }

    /// Check if an SSDP response is from a Roku ECP device
    fn is_roku(response: &SsdpResponse) -> bool {
        if response.st.eq_ignore_ascii_case(ROKU_SEARCH_TARGET) {
            return true;
        }

        if response.usn.contains("roku:ecp") {
            return true;
        }

        response
            .server
            .as_ref()
            .map(|server| server.to_lowercase().contains("roku"))
            .unwrap_or(false)
    }

    /// Send the search on first use
    fn start_search(&mut self) {
        if let Some(client) = self.ssdp_client.take() {
            match client.search(ROKU_SEARCH_TARGET) {
                Ok(responses) => self.responses = Some(responses),
                Err(e) => tracing::warn!("SSDP search failed: {}", e),
            }
        }
    }

    /// Next raw answer: buffered ones first, then the socket
    fn next_response(&mut self) -> Option<SsdpResponse> {
        if let Some(response) = self.ssdp_buffer.pop_front() {
            return Some(response);
        }

        let responses = self.responses.as_mut()?;
        for result in responses {
            match result {
                Ok(response) => return Some(response),
                Err(e) => tracing::debug!("SSDP receive failed: {}", e),
            }
        }

        self.responses = None;
        None
    }
}

impl Iterator for DiscoveryIterator {
    type Item = DeviceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.start_search();

        while let Some(response) = self.next_response() {
            if !self.seen_locations.insert(response.location.clone()) {
                continue;
            }

            if !Self::is_roku(&response) {
                continue;
            }

            let ip_address = match extract_ip_from_url(&response.location) {
                Some(ip) => ip,
                None => continue,
            };

            return Some(DeviceEvent::Found(Device {
                ip_address,
                serial_number: extract_serial_from_usn(&response.usn),
                location: response.location,
            }));
        }

        None
    }
}

/// Extract the host portion of a URL.
///
/// ```
/// use roku_discovery::extract_ip_from_url;
///
/// assert_eq!(
///     extract_ip_from_url("http://192.168.1.134:8060/"),
///     Some("192.168.1.134".to_string())
/// );
/// ```
pub fn extract_ip_from_url(url: &str) -> Option<String> {
    let host = url
        .split("//")
        .nth(1)?
        .split(|c| c == ':' || c == '/')
        .next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Extract the serial number from a USN like `uuid:roku:ecp:P0A070000007`
fn extract_serial_from_usn(usn: &str) -> Option<String> {
    usn.strip_prefix("uuid:roku:ecp:")
        .map(|serial| serial.split("::").next().unwrap_or(serial).to_string())
        .filter(|serial| !serial.is_empty())
}
