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

//! PUMA aperture layout and address decoding
//!
//! The PUMA window is split into three consecutive regions: frame buffer,
//! register window and texture memory. The register window is page-decoded:
//! every register owns a 4 KB alias, so the register index comes from bits
//! 12..19 of the offset into the window.

use super::PumaMode;

/// Region an aperture address decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumaRegion {
    /// Frame buffer (includes the CMDFIFO ring)
    FrameBuffer { offset: u32 },
    /// Register window
    Register { index: u8 },
    /// Texture memory
    Texture { offset: u32 },
    /// Outside every region
    Invalid,
}

/// Start and size of each aperture region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumaLayout {
    pub fb_start: u32,
    pub fb_size: u32,
    pub reg_start: u32,
    pub reg_size: u32,
    pub tex_start: u32,
    pub tex_size: u32,
}

impl PumaLayout {
    /// 8 MB aperture: 4 MB frame buffer, 2 MB registers, 2 MB textures
    pub const MODE_8MB: PumaLayout = PumaLayout {
        fb_start: 0x000000,
        fb_size: 0x400000,
        reg_start: 0x400000,
        reg_size: 0x200000,
        tex_start: 0x600000,
        tex_size: 0x200000,
    };

    /// 4 MB aperture: 2 MB frame buffer, 1 MB registers, 1 MB textures
    pub const MODE_4MB: PumaLayout = PumaLayout {
        fb_start: 0x000000,
        fb_size: 0x200000,
        reg_start: 0x200000,
        reg_size: 0x100000,
        tex_start: 0x300000,
        tex_size: 0x100000,
    };

    /// Layout for an aperture mode
    pub fn for_mode(mode: PumaMode) -> Self {
        match mode {
            PumaMode::Mode8Mb => Self::MODE_8MB,
            PumaMode::Mode4Mb => Self::MODE_4MB,
        }
    }

    /// Total aperture size in bytes
    pub fn aperture_size(&self) -> u32 {
        self.tex_start + self.tex_size
    }

    /// Classify an aperture address
    ///
    /// # Arguments
    ///
    /// * `addr` - Address relative to the start of the PUMA aperture
    ///
    /// # Returns
    ///
    /// The region containing `addr` with its region-relative offset, or the
    /// register index for register-window addresses.
    ///
    /// # Example
    ///
    /// ```
    /// use at3d_rush::core::memory::{PumaLayout, PumaRegion};
    ///
    /// let layout = PumaLayout::MODE_8MB;
    ///
    /// assert_eq!(layout.decode(0x1000), PumaRegion::FrameBuffer { offset: 0x1000 });
    /// assert_eq!(layout.decode(0x451000), PumaRegion::Register { index: 0x51 });
    /// assert_eq!(layout.decode(0x600010), PumaRegion::Texture { offset: 0x10 });
    /// assert_eq!(layout.decode(0x800000), PumaRegion::Invalid);
    /// ```
    pub fn decode(&self, addr: u32) -> PumaRegion {
        if self.in_frame_buffer(addr) {
            PumaRegion::FrameBuffer {
                offset: addr - self.fb_start,
            }
        } else if let Some(index) = self.register_index(addr) {
            PumaRegion::Register { index }
        } else if (self.tex_start..self.tex_start + self.tex_size).contains(&addr) {
            PumaRegion::Texture {
                offset: addr - self.tex_start,
            }
        } else {
            PumaRegion::Invalid
        }
    }

    /// Whether `addr` falls inside the frame buffer
    pub fn in_frame_buffer(&self, addr: u32) -> bool {
        (self.fb_start..self.fb_start + self.fb_size).contains(&addr)
    }

    /// Register index for a register-window address
    ///
    /// Returns `None` when `addr` lies outside the register window.
    pub fn register_index(&self, addr: u32) -> Option<u8> {
        if (self.reg_start..self.reg_start + self.reg_size).contains(&addr) {
            Some((((addr - self.reg_start) >> 12) & 0xFF) as u8)
        } else {
            None
        }
    }
}
