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

//! AT3D MMIO bank decode
//!
//! The 64 KB MMIO window is split into functional banks. Every byte of the
//! window has backing storage; the bank only decides which side effects a
//! byte access triggers.
//!
//! ```text
//! 0x000-0x01F  Extended setup
//! 0x030-0x06F  2D drawing engine
//! 0x080-0x09F  Motion video
//! 0x140-0x15F  Hardware cursor
//! 0x200-0x2FF  Video tile buffers
//! 0x300-0x3FF  3D rendering engine
//! 0x400-0x4FF  THP interface
//! 0x500-0x5FF  VMI+ host port
//! 0x600-0x6FF  VMI+ video port
//! ```

/// Size of the MMIO window
pub const MMIO_SIZE: usize = 0x1_0000;

// 2D drawing engine
pub const CLIP_CONTROL: u32 = 0x030;
pub const CLIP_LEFT: u32 = 0x038;
pub const CLIP_TOP: u32 = 0x03A;
pub const CLIP_RIGHT: u32 = 0x03C;
pub const CLIP_BOTTOM: u32 = 0x03E;
pub const DRAW_CONTROL: u32 = 0x040;
pub const RASTER_OP: u32 = 0x046;
pub const BYTE_MASK: u32 = 0x047;
pub const PATTERN: u32 = 0x048;
pub const SRC_X: u32 = 0x050;
pub const SRC_Y: u32 = 0x052;
pub const DST_X: u32 = 0x054;
pub const DST_Y: u32 = 0x056;
pub const SIZE_X: u32 = 0x058;
pub const SIZE_Y: u32 = 0x05A;
pub const DST_PITCH: u32 = 0x05C;
pub const SRC_PITCH: u32 = 0x05E;
pub const FG_COLOR: u32 = 0x060;
pub const BG_COLOR: u32 = 0x064;

// Hardware cursor
pub const CURSOR_CONTROL: u32 = 0x140;
pub const CURSOR_X: u32 = 0x142;
pub const CURSOR_Y: u32 = 0x144;
pub const CURSOR_ADDR: u32 = 0x148;
pub const CURSOR_HOTSPOT_X: u32 = 0x14C;
pub const CURSOR_HOTSPOT_Y: u32 = 0x14D;
pub const CURSOR_FG_COLOR: u32 = 0x150;
pub const CURSOR_BG_COLOR: u32 = 0x154;

// 3D rendering engine
pub const CMD_SET: u32 = 0x300;

// THP interface
pub const THP_CONTROL: u32 = 0x400;
pub const THP_STATUS: u32 = 0x404;
pub const THP_ADDRESS: u32 = 0x408;
pub const THP_DATA: u32 = 0x40C;

/// Functional bank of an MMIO offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmioBank {
    ExtSetup,
    Engine2d,
    MotionVideo,
    Cursor,
    TileBuffer,
    Engine3d,
    Thp,
    VmiHost,
    VmiVideo,
    /// Unassigned, plain storage
    Raw,
}

impl MmioBank {
    /// Decode an offset into the MMIO window
    ///
    /// Offsets are taken modulo the window size.
    ///
    /// # Example
    ///
    /// ```
    /// use at3d_rush::core::at3d::MmioBank;
    ///
    /// assert_eq!(MmioBank::decode(0x043), MmioBank::Engine2d);
    /// assert_eq!(MmioBank::decode(0x40F), MmioBank::Thp);
    /// assert_eq!(MmioBank::decode(0x020), MmioBank::Raw);
    /// ```
    pub fn decode(offset: u32) -> Self {
        match offset & 0xFFFF {
            0x000..=0x01F => MmioBank::ExtSetup,
            0x030..=0x06F => MmioBank::Engine2d,
            0x080..=0x09F => MmioBank::MotionVideo,
            0x140..=0x15F => MmioBank::Cursor,
            0x200..=0x2FF => MmioBank::TileBuffer,
            0x300..=0x3FF => MmioBank::Engine3d,
            0x400..=0x4FF => MmioBank::Thp,
            0x500..=0x5FF => MmioBank::VmiHost,
            0x600..=0x6FF => MmioBank::VmiVideo,
            _ => MmioBank::Raw,
        }
    }

    /// Bank name used in trace output
    pub fn name(self) -> &'static str {
        match self {
            MmioBank::ExtSetup => "ext-setup",
            MmioBank::Engine2d => "2d",
            MmioBank::MotionVideo => "video",
            MmioBank::Cursor => "cursor",
            MmioBank::TileBuffer => "tile",
            MmioBank::Engine3d => "3d",
            MmioBank::Thp => "thp",
            MmioBank::VmiHost => "vmi-host",
            MmioBank::VmiVideo => "vmi-video",
            MmioBank::Raw => "raw",
        }
    }
}

/// Little-endian byte-addressable register storage
pub struct MmioRegs {
    bytes: Vec<u8>,
}

impl MmioRegs {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MMIO_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    #[inline(always)]
    pub fn byte(&self, offset: u32) -> u8 {
        self.bytes[(offset as usize) & (MMIO_SIZE - 1)]
    }

    #[inline(always)]
    pub fn set_byte(&mut self, offset: u32, value: u8) {
        self.bytes[(offset as usize) & (MMIO_SIZE - 1)] = value;
    }

    pub fn u16(&self, offset: u32) -> u16 {
        u16::from_le_bytes([self.byte(offset), self.byte(offset.wrapping_add(1))])
    }

    pub fn u32(&self, offset: u32) -> u32 {
        u32::from_le_bytes([
            self.byte(offset),
            self.byte(offset.wrapping_add(1)),
            self.byte(offset.wrapping_add(2)),
            self.byte(offset.wrapping_add(3)),
        ])
    }

    pub fn set_u32(&mut self, offset: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.set_byte(offset.wrapping_add(i as u32), byte);
        }
    }
}

impl Default for MmioRegs {
    fn default() -> Self {
        Self::new()
    }
}
