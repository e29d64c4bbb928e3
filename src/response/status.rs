// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Return-code parsing.

use serde::Deserialize;

use crate::error::GatewayError;

/// Return code meaning success.
const RC_OK: u16 = 200;

/// Return code the gateway uses when the token is not (or no longer) valid.
const RC_NOT_SYNCED: u16 = 404;

/// The return code envelope present in every gateway answer.
///
/// ```
/// use tcpbulb_lib::response::StatusResponse;
///
/// let status: StatusResponse =
///     quick_xml::de::from_str("<gip><version>1</version><rc>404</rc></gip>").unwrap();
/// assert_eq!(status.return_code(), Some(404));
/// assert!(status.check().is_err());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    rc: Option<u16>,
}

impl StatusResponse {
    /// Returns the `rc` value, if the gateway sent one.
    #[must_use]
    pub fn return_code(&self) -> Option<u16> {
        self.rc
    }

    /// Maps the return code onto the error taxonomy.
    ///
    /// A missing `rc` is accepted; some firmware omits it on success.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotSynced` for rc 404 and
    /// `GatewayError::CommandRejected` for any other non-200 code.
    pub fn check(&self) -> Result<(), GatewayError> {
        match self.rc {
            None | Some(RC_OK) => Ok(()),
            Some(RC_NOT_SYNCED) => Err(GatewayError::NotSynced),
            Some(rc) => Err(GatewayError::CommandRejected(rc)),
        }
    }
}
