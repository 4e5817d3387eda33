// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Save state serialization for the Voodoo Rush
//!
//! A save state captures the complete coprocessor state so a trace can be
//! resumed later or compared against a reference run.
//!
//! # Save State Format
//!
//! Save states are serialized using bincode for efficient binary encoding.
//! The state includes:
//! - Metadata (timestamp, PUMA mode, a free-form description)
//! - Raw register storage and the typed triangle setup banks
//! - Fog table, CMDFIFO, swap and statistics state
//! - Both PUMA memory regions (frame buffer and texture memory)
//!
//! # Version Compatibility
//!
//! Save states include a version number to ensure compatibility.
//! Loading a save state with a different version will fail with an error.
//! A state can only be applied to a device with the same PUMA mode.
//!
//! # Example
//!
//! ```no_run
//! use at3d_rush::core::memory::PumaMode;
//! use at3d_rush::core::rush::VoodooRush;
//! use at3d_rush::core::save_state::SaveState;
//!
//! let rush = VoodooRush::new(PumaMode::Mode8Mb);
//!
//! let state = SaveState::from_rush(&rush, "after boot");
//! state.save_to_file("rush.state").unwrap();
//!
//! let mut restored = VoodooRush::new(PumaMode::Mode8Mb);
//! let loaded = SaveState::load_from_file("rush.state").unwrap();
//! loaded.apply_to(&mut restored).unwrap();
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{EmulatorError, Result};
use super::memory::PumaMode;
use super::rush::{RushState, VoodooRush};

/// Save state version for compatibility checking
///
/// Incremented whenever the format changes in a way that breaks loading.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete coprocessor save state
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    pub metadata: SaveStateMetadata,

    pub rush: RushState,
}

/// Save state metadata
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// PUMA aperture size of the captured device
    pub puma_mode: PumaMode,

    /// Completed buffer swaps at save time
    pub swaps_completed: u64,

    /// Free-form description, e.g. the trace that produced the state
    pub description: String,
}

impl SaveState {
    /// Capture the current state of a coprocessor
    pub fn from_rush(rush: &VoodooRush, description: &str) -> Self {
        let rush_state = rush.to_state();
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                puma_mode: rush_state.puma_mode,
                swaps_completed: rush_state.swap.completed,
                description: description.to_string(),
            },
            rush: rush_state,
        }
    }

    /// Restore the captured state into a coprocessor
    ///
    /// # Errors
    ///
    /// Fails with [`RushError::ModeMismatch`](super::error::RushError) when
    /// the device has a different PUMA mode, or a size mismatch when the
    /// state was tampered with. The device is unchanged on error.
    pub fn apply_to(&self, rush: &mut VoodooRush) -> Result<()> {
        rush.restore_from_state(&self.rush)
    }

    /// Encode the state into bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    /// Decode a state from bytes, checking the version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) = bincode::decode_from_slice(bytes, config::standard())?;

        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::IncompatibleSaveState {
                expected: SAVE_STATE_VERSION,
                got: state.version,
            });
        }

        Ok(state)
    }

    /// Save the state to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&encoded)?;
        log::info!(
            "Save state written to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load a state from a file, checking the version
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Approximate encoded size in bytes
    ///
    /// Dominated by the two PUMA memory regions.
    pub fn estimated_size(&self) -> usize {
        self.rush.fb.len() + self.rush.tex.len() + self.rush.regs.len() * 4 + 1024
    }
}

/// Components that can be saved and restored
///
/// # Example
///
/// ```
/// use at3d_rush::core::memory::PumaMode;
/// use at3d_rush::core::rush::{registers, VoodooRush};
/// use at3d_rush::core::save_state::StateSave;
///
/// let mut rush = VoodooRush::new(PumaMode::Mode4Mb);
/// rush.reg_write(registers::COLOR0, 0x00AB_CDEF);
/// let state = rush.to_state();
///
/// let mut other = VoodooRush::new(PumaMode::Mode4Mb);
/// other.restore_from_state(&state).unwrap();
/// assert_eq!(other.reg_read(registers::COLOR0), 0x00AB_CDEF);
/// ```
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    ///
    /// # Errors
    ///
    /// Returns an error when the state does not fit this component.
    fn restore_from_state(&mut self, state: &Self::State) -> Result<()>;
}
