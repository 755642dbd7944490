// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Combined stdout/stderr buffer for one host.

use parking_lot::Mutex;

/// Append-only byte buffer shared by a host's stdout and stderr readers.
#[derive(Default)]
pub(crate) struct OutputBuffer {
    bytes: Mutex<Vec<u8>>,
}

impl OutputBuffer {
    /// Append a chunk and hand the decoded text so far to `publish`.
    ///
    /// `publish` runs under the buffer lock, so concurrent readers publish in
    /// append order and the published text never goes backwards.
    pub(crate) fn append(&self, chunk: &[u8], publish: impl FnOnce(String)) {
        let mut bytes = self.bytes.lock();
        bytes.extend_from_slice(chunk);
        publish(live_text(&bytes));
    }

    /// Everything read so far, with invalid UTF-8 replaced.
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

/// Decode `bytes`, holding back a trailing multi-byte character that has not
/// fully arrived yet.
pub(crate) fn live_text(bytes: &[u8]) -> String {
    let end = complete_prefix_len(bytes);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn complete_prefix_len(bytes: &[u8]) -> usize {
    let mut start = 0;
    loop {
        match std::str::from_utf8(&bytes[start..]) {
            Ok(_) => return bytes.len(),
            // Invalid sequence mid-stream: lossy decoding replaces it, keep scanning.
            Err(e) => match e.error_len() {
                Some(bad) => start += e.valid_up_to() + bad,
                None => return start + e.valid_up_to(),
            },
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
