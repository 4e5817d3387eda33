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

//! Hardware cursor state
//!
//! Cursor pixels are drawn by the display path; the device only keeps the
//! state derived from the cursor registers.

use super::banks::{
    MmioRegs, CURSOR_ADDR, CURSOR_CONTROL, CURSOR_HOTSPOT_X, CURSOR_HOTSPOT_Y, CURSOR_X, CURSOR_Y,
};

/// Cursor size in pixels, both axes
pub const CURSOR_SIZE: u32 = 32;

/// Cursor state derived from the cursor registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HwCursor {
    pub enabled: bool,
    /// Screen position of the cursor image origin (position minus hotspot)
    pub x: i32,
    pub y: i32,
    pub hotspot_x: u8,
    pub hotspot_y: u8,
    /// Cursor image address in VRAM
    pub addr: u32,
    pub size: u32,
}

impl HwCursor {
    pub fn from_regs(regs: &MmioRegs, vram_mask: u32) -> Self {
        let hotspot_x = regs.byte(CURSOR_HOTSPOT_X);
        let hotspot_y = regs.byte(CURSOR_HOTSPOT_Y);

        Self {
            enabled: regs.byte(CURSOR_CONTROL) & 0x01 != 0,
            x: regs.u16(CURSOR_X) as i32 - hotspot_x as i32,
            y: regs.u16(CURSOR_Y) as i32 - hotspot_y as i32,
            hotspot_x,
            hotspot_y,
            addr: regs.u32(CURSOR_ADDR) & vram_mask,
            size: CURSOR_SIZE,
        }
    }
}

/// Whether a write to `offset` changes the derived cursor state
pub(super) fn affects_cursor(offset: u32) -> bool {
    matches!(
        offset,
        CURSOR_CONTROL | 0x142..=0x145 | 0x148..=0x14B | CURSOR_HOTSPOT_X | CURSOR_HOTSPOT_Y
    )
}
