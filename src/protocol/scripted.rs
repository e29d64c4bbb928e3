// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::Command;
use crate::error::GatewayError;
use crate::protocol::{CommandResponse, Transport};

const ACK: &str = "<gip><version>1</version><rc>200</rc></gip>";

/// Builds a one-room carousel document from `(id, state, level)` triples.
pub(crate) fn carousel_xml(devices: &[(&str, u32, Option<u32>)]) -> String {
    let mut xml = String::from("<gip><version>1</version><rc>200</rc><room><name>Room</name>");
    for (id, state, level) in devices {
        let _ = write!(xml, "<device><did>{id}</did><state>{state}</state>");
        if let Some(level) = level {
            let _ = write!(xml, "<level>{level}</level>");
        }
        xml.push_str("</device>");
    }
    xml.push_str("</room></gip>");
    xml
}

/// A command as the transport received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentCommand {
    pub name: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

/// Transport answering from a script, after an optional delay.
///
/// Scripted answers are consumed in order; once the script is empty,
/// carousel requests get the current listing and other commands an ack.
/// The `timeout` argument is ignored so callers' own deadlines are exercised.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    delay: Mutex<Duration>,
    listing: Mutex<String>,
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    sent: Mutex<Vec<SentCommand>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Mutex::new(delay),
            listing: Mutex::new(carousel_xml(&[("1", 1, Some(50)), ("2", 0, None)])),
            script: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub(crate) fn set_listing(&self, xml: impl Into<String>) {
        *self.listing.lock() = xml.into();
    }

    pub(crate) fn push_body(&self, body: impl Into<String>) {
        self.script.lock().push_back(Ok(body.into()));
    }

    pub(crate) fn push_error(&self, error: GatewayError) {
        self.script.lock().push_back(Err(error));
    }

    pub(crate) fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().clone()
    }

    pub(crate) fn carousel_calls(&self) -> usize {
        self.count("RoomGetCarousel")
    }

    pub(crate) fn device_command_calls(&self) -> usize {
        self.count("DeviceSendCommand")
    }

    fn count(&self, name: &str) -> usize {
        self.sent.lock().iter().filter(|c| c.name == name).count()
    }
}

impl Transport for ScriptedTransport {
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
        _timeout: Duration,
    ) -> Result<CommandResponse, GatewayError> {
        self.sent.lock().push(SentCommand {
            name: command.name(),
            fields: command.payload_fields(),
        });
        let scripted = self.script.lock().pop_front();
        let answer = scripted.unwrap_or_else(|| {
            if command.name() == "RoomGetCarousel" {
                Ok(self.listing.lock().clone())
            } else {
                Ok(ACK.to_string())
            }
        });

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        answer.map(CommandResponse::new)
    }
}
