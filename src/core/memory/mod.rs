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

//! PUMA shared memory
//!
//! The Voodoo Rush shares a PUMA aperture with the AT3D. The aperture is
//! split into a frame buffer (which also holds the CMDFIFO ring), a register
//! window that is decoded rather than storage backed, and texture memory.
//! Both storage regions are owned here for the lifetime of the device.
//!
//! # Layout
//!
//! | Mode | FB size | REG start | REG size | TEX start | TEX size |
//! |------|---------|-----------|----------|-----------|----------|
//! | 8 MB | 4 MB    | 0x400000  | 2 MB     | 0x600000  | 2 MB     |
//! | 4 MB | 2 MB    | 0x200000  | 1 MB     | 0x300000  | 1 MB     |
//!
//! All multi-byte accesses are little-endian.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

mod io_device;
mod region;
#[cfg(test)]
mod tests;

pub use io_device::IODevice;
pub use region::{PumaLayout, PumaRegion};

/// PUMA aperture size, fixed at construction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode,
)]
pub enum PumaMode {
    /// 8 MB aperture
    #[default]
    #[serde(rename = "8mb")]
    Mode8Mb,
    /// 4 MB aperture
    #[serde(rename = "4mb")]
    Mode4Mb,
}

impl PumaMode {
    /// Aperture size in megabytes
    pub fn megabytes(self) -> u32 {
        match self {
            PumaMode::Mode8Mb => 8,
            PumaMode::Mode4Mb => 4,
        }
    }
}

/// Frame buffer and texture storage of the PUMA aperture
pub struct PumaMemory {
    mode: PumaMode,
    layout: PumaLayout,
    fb: Vec<u8>,
    tex: Vec<u8>,
}

impl PumaMemory {
    /// Allocate zeroed memory for an aperture mode
    pub fn new(mode: PumaMode) -> Self {
        let layout = PumaLayout::for_mode(mode);
        Self {
            mode,
            layout,
            fb: vec![0; layout.fb_size as usize],
            tex: vec![0; layout.tex_size as usize],
        }
    }

    /// Aperture mode
    pub fn mode(&self) -> PumaMode {
        self.mode
    }

    /// Aperture layout
    pub fn layout(&self) -> &PumaLayout {
        &self.layout
    }

    /// Frame buffer bytes
    pub fn fb(&self) -> &[u8] {
        &self.fb
    }

    /// Mutable frame buffer bytes
    pub fn fb_mut(&mut self) -> &mut [u8] {
        &mut self.fb
    }

    /// Texture memory bytes
    pub fn tex(&self) -> &[u8] {
        &self.tex
    }

    /// Mutable texture memory bytes
    pub fn tex_mut(&mut self) -> &mut [u8] {
        &mut self.tex
    }

    /// Read a dword from the frame buffer, `None` if out of range
    pub fn read_fb32(&self, offset: u32) -> Option<u32> {
        read_le32(&self.fb, offset)
    }

    /// Write a dword to the frame buffer
    ///
    /// Returns `false` (and writes nothing) if the dword is out of range.
    pub fn write_fb32(&mut self, offset: u32, value: u32) -> bool {
        write_le32(&mut self.fb, offset, value)
    }

    /// Read a halfword from the frame buffer, `None` if out of range
    pub fn read_fb16(&self, offset: u32) -> Option<u16> {
        let start = offset as usize;
        let bytes = self.fb.get(start..start.checked_add(2)?)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Write a halfword to the frame buffer
    ///
    /// Returns `false` (and writes nothing) if the halfword is out of range.
    pub fn write_fb16(&mut self, offset: u32, value: u16) -> bool {
        let start = offset as usize;
        let Some(end) = start.checked_add(2) else {
            return false;
        };
        match self.fb.get_mut(start..end) {
            Some(bytes) => {
                bytes.copy_from_slice(&value.to_le_bytes());
                true
            }
            None => false,
        }
    }

    /// Read a dword from texture memory, `None` if out of range
    pub fn read_tex32(&self, offset: u32) -> Option<u32> {
        read_le32(&self.tex, offset)
    }

    /// Write a dword to texture memory
    pub fn write_tex32(&mut self, offset: u32, value: u32) -> bool {
        write_le32(&mut self.tex, offset, value)
    }
}

fn read_le32(buf: &[u8], offset: u32) -> Option<u32> {
    let start = offset as usize;
    let bytes = buf.get(start..start.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn write_le32(buf: &mut [u8], offset: u32, value: u32) -> bool {
    let start = offset as usize;
    let Some(end) = start.checked_add(4) else {
        return false;
    };
    match buf.get_mut(start..end) {
        Some(bytes) => {
            bytes.copy_from_slice(&value.to_le_bytes());
            true
        }
        None => false,
    }
}
