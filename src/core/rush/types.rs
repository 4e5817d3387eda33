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

//! Voodoo Rush state types
//!
//! Typed views of the triangle setup banks, CMDFIFO control state and the
//! packed buffer/clip registers.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// One field of the triangle setup banks, in register order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleField {
    VertexAx,
    VertexAy,
    VertexBx,
    VertexBy,
    VertexCx,
    VertexCy,
    StartR,
    DrDx,
    DrDy,
    StartG,
    DgDx,
    DgDy,
    StartB,
    DbDx,
    DbDy,
    StartZ,
    DzDx,
    DzDy,
    StartA,
    DaDx,
    DaDy,
    StartS,
    DsDx,
    DsDy,
    StartT,
    DtDx,
    DtDy,
    StartW,
    DwDx,
    DwDy,
}

impl TriangleField {
    /// All fields ordered by their offset from the start of a bank
    pub const ALL: [TriangleField; 30] = [
        TriangleField::VertexAx,
        TriangleField::VertexAy,
        TriangleField::VertexBx,
        TriangleField::VertexBy,
        TriangleField::VertexCx,
        TriangleField::VertexCy,
        TriangleField::StartR,
        TriangleField::DrDx,
        TriangleField::DrDy,
        TriangleField::StartG,
        TriangleField::DgDx,
        TriangleField::DgDy,
        TriangleField::StartB,
        TriangleField::DbDx,
        TriangleField::DbDy,
        TriangleField::StartZ,
        TriangleField::DzDx,
        TriangleField::DzDy,
        TriangleField::StartA,
        TriangleField::DaDx,
        TriangleField::DaDy,
        TriangleField::StartS,
        TriangleField::DsDx,
        TriangleField::DsDy,
        TriangleField::StartT,
        TriangleField::DtDx,
        TriangleField::DtDy,
        TriangleField::StartW,
        TriangleField::DwDx,
        TriangleField::DwDy,
    ];
}

/// Sign-extend the low 16 bits of a register value
#[inline(always)]
pub fn sext16(value: u32) -> i32 {
    (value & 0xFFFF) as u16 as i16 as i32
}

/// Interpret the low 24 bits of a register value as two's complement
///
/// # Example
///
/// ```
/// use at3d_rush::core::rush::sext24;
///
/// assert_eq!(sext24(0x80_0000), -8_388_608);
/// assert_eq!(sext24(0x7F_FFFF), 8_388_607);
/// assert_eq!(sext24(0xAB12_3456), 0x12_3456);
/// ```
#[inline(always)]
pub fn sext24(value: u32) -> i32 {
    if value & 0x80_0000 != 0 {
        (value | 0xFF00_0000) as i32
    } else {
        (value & 0x00FF_FFFF) as i32
    }
}

/// Fixed-point triangle setup written through the integer bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TriangleParams {
    pub vertex_ax: i32,
    pub vertex_ay: i32,
    pub vertex_bx: i32,
    pub vertex_by: i32,
    pub vertex_cx: i32,
    pub vertex_cy: i32,

    /// Color starts, 24-bit unsigned
    pub start_r: u32,
    pub start_g: u32,
    pub start_b: u32,
    pub start_a: u32,

    /// Color gradients, 24-bit two's complement
    pub d_r_dx: i32,
    pub d_r_dy: i32,
    pub d_g_dx: i32,
    pub d_g_dy: i32,
    pub d_b_dx: i32,
    pub d_b_dy: i32,
    pub d_a_dx: i32,
    pub d_a_dy: i32,

    pub start_z: u32,
    pub d_z_dx: i32,
    pub d_z_dy: i32,

    pub start_s: u32,
    pub d_s_dx: i32,
    pub d_s_dy: i32,
    pub start_t: u32,
    pub d_t_dx: i32,
    pub d_t_dy: i32,
    pub start_w: u32,
    pub d_w_dx: i32,
    pub d_w_dy: i32,
}

impl TriangleParams {
    /// Store a register value into a field, applying the field's format
    pub fn set(&mut self, field: TriangleField, value: u32) {
        use TriangleField::*;
        match field {
            VertexAx => self.vertex_ax = sext16(value),
            VertexAy => self.vertex_ay = sext16(value),
            VertexBx => self.vertex_bx = sext16(value),
            VertexBy => self.vertex_by = sext16(value),
            VertexCx => self.vertex_cx = sext16(value),
            VertexCy => self.vertex_cy = sext16(value),
            StartR => self.start_r = value & 0x00FF_FFFF,
            StartG => self.start_g = value & 0x00FF_FFFF,
            StartB => self.start_b = value & 0x00FF_FFFF,
            StartA => self.start_a = value & 0x00FF_FFFF,
            DrDx => self.d_r_dx = sext24(value),
            DrDy => self.d_r_dy = sext24(value),
            DgDx => self.d_g_dx = sext24(value),
            DgDy => self.d_g_dy = sext24(value),
            DbDx => self.d_b_dx = sext24(value),
            DbDy => self.d_b_dy = sext24(value),
            DaDx => self.d_a_dx = sext24(value),
            DaDy => self.d_a_dy = sext24(value),
            StartZ => self.start_z = value,
            DzDx => self.d_z_dx = value as i32,
            DzDy => self.d_z_dy = value as i32,
            StartS => self.start_s = value,
            DsDx => self.d_s_dx = value as i32,
            DsDy => self.d_s_dy = value as i32,
            StartT => self.start_t = value,
            DtDx => self.d_t_dx = value as i32,
            DtDy => self.d_t_dy = value as i32,
            StartW => self.start_w = value,
            DwDx => self.d_w_dx = value as i32,
            DwDy => self.d_w_dy = value as i32,
        }
    }
}

/// Floating-point triangle setup written through the float bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TriangleParamsF {
    pub vertex_ax: f32,
    pub vertex_ay: f32,
    pub vertex_bx: f32,
    pub vertex_by: f32,
    pub vertex_cx: f32,
    pub vertex_cy: f32,
    pub start_r: f32,
    pub d_r_dx: f32,
    pub d_r_dy: f32,
    pub start_g: f32,
    pub d_g_dx: f32,
    pub d_g_dy: f32,
    pub start_b: f32,
    pub d_b_dx: f32,
    pub d_b_dy: f32,
    pub start_z: f32,
    pub d_z_dx: f32,
    pub d_z_dy: f32,
    pub start_a: f32,
    pub d_a_dx: f32,
    pub d_a_dy: f32,
    pub start_s: f32,
    pub d_s_dx: f32,
    pub d_s_dy: f32,
    pub start_t: f32,
    pub d_t_dx: f32,
    pub d_t_dy: f32,
    pub start_w: f32,
    pub d_w_dx: f32,
    pub d_w_dy: f32,
}

impl TriangleParamsF {
    /// Store the IEEE-754 bit pattern of a register value into a field
    pub fn set(&mut self, field: TriangleField, value: u32) {
        *self.field_mut(field) = f32::from_bits(value);
    }

    /// Read a field
    pub fn get(&self, field: TriangleField) -> f32 {
        use TriangleField::*;
        match field {
            VertexAx => self.vertex_ax,
            VertexAy => self.vertex_ay,
            VertexBx => self.vertex_bx,
            VertexBy => self.vertex_by,
            VertexCx => self.vertex_cx,
            VertexCy => self.vertex_cy,
            StartR => self.start_r,
            DrDx => self.d_r_dx,
            DrDy => self.d_r_dy,
            StartG => self.start_g,
            DgDx => self.d_g_dx,
            DgDy => self.d_g_dy,
            StartB => self.start_b,
            DbDx => self.d_b_dx,
            DbDy => self.d_b_dy,
            StartZ => self.start_z,
            DzDx => self.d_z_dx,
            DzDy => self.d_z_dy,
            StartA => self.start_a,
            DaDx => self.d_a_dx,
            DaDy => self.d_a_dy,
            StartS => self.start_s,
            DsDx => self.d_s_dx,
            DsDy => self.d_s_dy,
            StartT => self.start_t,
            DtDx => self.d_t_dx,
            DtDy => self.d_t_dy,
            StartW => self.start_w,
            DwDx => self.d_w_dx,
            DwDy => self.d_w_dy,
        }
    }

    fn field_mut(&mut self, field: TriangleField) -> &mut f32 {
        use TriangleField::*;
        match field {
            VertexAx => &mut self.vertex_ax,
            VertexAy => &mut self.vertex_ay,
            VertexBx => &mut self.vertex_bx,
            VertexBy => &mut self.vertex_by,
            VertexCx => &mut self.vertex_cx,
            VertexCy => &mut self.vertex_cy,
            StartR => &mut self.start_r,
            DrDx => &mut self.d_r_dx,
            DrDy => &mut self.d_r_dy,
            StartG => &mut self.start_g,
            DgDx => &mut self.d_g_dx,
            DgDy => &mut self.d_g_dy,
            StartB => &mut self.start_b,
            DbDx => &mut self.d_b_dx,
            DbDy => &mut self.d_b_dy,
            StartZ => &mut self.start_z,
            DzDx => &mut self.d_z_dx,
            DzDy => &mut self.d_z_dy,
            StartA => &mut self.start_a,
            DaDx => &mut self.d_a_dx,
            DaDy => &mut self.d_a_dy,
            StartS => &mut self.start_s,
            DsDx => &mut self.d_s_dx,
            DsDy => &mut self.d_s_dy,
            StartT => &mut self.start_t,
            DtDx => &mut self.d_t_dx,
            DtDy => &mut self.d_t_dy,
            StartW => &mut self.start_w,
            DwDx => &mut self.d_w_dx,
            DwDy => &mut self.d_w_dy,
        }
    }

    /// Convert to the fixed-point representation used by the integer bank
    ///
    /// Vertices become 12.4, colors 12.12, Z 20.12, S/T 14.18 and W 2.30.
    /// Each converted value goes through the same field format as an
    /// integer-bank write.
    pub fn to_fixed(&self) -> TriangleParams {
        let mut fixed = TriangleParams::default();
        for field in TriangleField::ALL {
            let scale = match field {
                TriangleField::VertexAx
                | TriangleField::VertexAy
                | TriangleField::VertexBx
                | TriangleField::VertexBy
                | TriangleField::VertexCx
                | TriangleField::VertexCy => 16.0,
                TriangleField::StartS
                | TriangleField::DsDx
                | TriangleField::DsDy
                | TriangleField::StartT
                | TriangleField::DtDx
                | TriangleField::DtDy => (1u32 << 18) as f32,
                TriangleField::StartW | TriangleField::DwDx | TriangleField::DwDy => {
                    (1u32 << 30) as f32
                }
                _ => 4096.0,
            };
            let scaled = self.get(field) * scale;
            let raw = match field {
                TriangleField::StartZ
                | TriangleField::StartS
                | TriangleField::StartT
                | TriangleField::StartW => scaled as u32,
                _ => scaled as i32 as u32,
            };
            fixed.set(field, raw);
        }
        fixed
    }
}

/// CMDFIFO control state
///
/// Page fields are in 4 KB units. The read pointer counts 32-bit words from
/// the bottom of the ring; a two-word packet advances it by 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CmdFifoState {
    pub enabled: bool,
    pub base_page: u32,
    pub bottom_page: u32,
    pub top_page: u32,
    pub entry_count: u32,
    pub read_ptr: u32,
    pub threshold: u32,
}

impl CmdFifoState {
    /// First byte of the ring in the frame buffer
    pub fn start(&self) -> u32 {
        self.bottom_page << 12
    }

    /// One past the last byte of the ring
    pub fn end(&self) -> u32 {
        self.top_page << 12
    }

    /// Whether a frame buffer offset lies inside the ring window
    pub fn contains(&self, offset: u32) -> bool {
        (self.start()..self.end()).contains(&offset)
    }

    /// Ring capacity in 64-bit slots
    pub fn ring_slots(&self) -> u32 {
        self.end().saturating_sub(self.start()) >> 3
    }

    /// Ring capacity in 32-bit words, the unit of the read pointer
    pub fn ring_words(&self) -> u32 {
        self.ring_slots() * 2
    }

    /// Frame buffer offset of the word `words` past the read pointer
    ///
    /// Wraps inside the ring. Returns `None` for an empty ring.
    pub fn word_address(&self, words: u32) -> Option<u32> {
        let ring = self.ring_words();
        if ring == 0 {
            return None;
        }
        let index = (self.read_ptr as u64 + words as u64) % ring as u64;
        Some(self.start() + (index as u32) * 4)
    }

    /// Decode FBIJR_INIT3
    pub fn apply_init3(&mut self, value: u32) {
        self.enabled = value & 0x01 != 0;
        self.bottom_page = (value >> 1) & 0x3FF;
        self.top_page = (value >> 11) & 0x3FF;
        self.threshold = (value >> 21) & 0x3FF;
    }
}

/// Color or aux buffer setup register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferSetup {
    /// Byte offset of the buffer in the frame buffer (bits 0..=21)
    pub base: u32,
    /// Row stride in bytes (bits 22..=30, in 4-byte units)
    pub stride: u32,
}

impl BufferSetup {
    pub fn from_raw(value: u32) -> Self {
        Self {
            base: value & 0x3F_FFFF,
            stride: ((value >> 22) & 0x1FF) * 4,
        }
    }

    /// Byte offset of row `y`
    ///
    /// With `flip` set the row offset is subtracted from the base. Callers
    /// mask or bounds-check the result.
    pub fn row_offset(&self, y: u32, flip: bool) -> u32 {
        if flip {
            self.base.wrapping_sub(y.wrapping_mul(self.stride))
        } else {
            self.base.wrapping_add(y.wrapping_mul(self.stride))
        }
    }
}

/// Scissor rectangle unpacked from a clip register pair
///
/// Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipRect {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl ClipRect {
    pub fn from_registers(left_right: u32, top_bottom: u32) -> Self {
        Self {
            left: left_right & 0x7FF,
            right: (left_right >> 16) & 0x7FF,
            top: top_bottom & 0x7FF,
            bottom: (top_bottom >> 16) & 0x7FF,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}

/// One fog table entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FogEntry {
    pub fog: u8,
    pub dfog: u8,
}

/// FBI statistics counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PixelCounters {
    pub pixels_in: u32,
    pub chroma_fail: u32,
    pub zfunc_fail: u32,
    pub afunc_fail: u32,
    pub pixels_out: u32,
}

/// Triangle engine state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    Busy,
}

/// Buffer swap bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SwapState {
    /// Pending swaps, saturating at 7
    pub pending: u8,
    /// Swap request outstanding
    pub requested: bool,
    /// Completed swaps since reset
    pub completed: u64,
}

impl SwapState {
    pub const MAX_PENDING: u8 = 7;
}

/// Windowed rendering origin and size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct RenderWindow {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 640,
            height: 480,
        }
    }
}
