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

//! AT3D 2D drawing engine
//!
//! Writing the top byte of DRAW_CONTROL with bit 31 set starts the command
//! in bits 0..=3. Only the rectangle fill is implemented; other commands
//! complete immediately without drawing.

use super::banks::{
    MmioRegs, CLIP_BOTTOM, CLIP_CONTROL, CLIP_LEFT, CLIP_RIGHT, CLIP_TOP, DRAW_CONTROL, DST_PITCH,
    DST_X, DST_Y, FG_COLOR, SIZE_X, SIZE_Y,
};

/// DRAW_CONTROL start/busy bit
pub const DRAW_START: u32 = 1 << 31;

/// 2D engine command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command2d {
    /// Solid rectangle fill with the foreground color
    RectFill,
    /// Recognized by the hardware but not emulated
    Unsupported(u8),
}

impl Command2d {
    pub fn from_draw_control(draw_control: u32) -> Self {
        match (draw_control & 0x0F) as u8 {
            0x01 => Command2d::RectFill,
            other => Command2d::Unsupported(other),
        }
    }
}

/// Clip rectangle, right and bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip2d {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Clip2d {
    fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left as u32 && x < self.right as u32 && y >= self.top as u32 && y < self.bottom as u32
    }
}

/// Rectangle fill parameters latched from the engine registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectFill {
    pub dst_x: u16,
    pub dst_y: u16,
    pub width: u16,
    pub height: u16,
    /// Destination row pitch in bytes
    pub pitch: u16,
    /// Low byte of the foreground color
    pub color: u8,
    /// Active when CLIP_CONTROL bit 0 is set
    pub clip: Option<Clip2d>,
}

impl RectFill {
    pub fn from_regs(regs: &MmioRegs) -> Self {
        let clip = (regs.byte(CLIP_CONTROL) & 0x01 != 0).then(|| Clip2d {
            left: regs.u16(CLIP_LEFT),
            top: regs.u16(CLIP_TOP),
            right: regs.u16(CLIP_RIGHT),
            bottom: regs.u16(CLIP_BOTTOM),
        });

        Self {
            dst_x: regs.u16(DST_X),
            dst_y: regs.u16(DST_Y),
            width: regs.u16(SIZE_X),
            height: regs.u16(SIZE_Y),
            pitch: regs.u16(DST_PITCH),
            color: regs.byte(FG_COLOR),
            clip,
        }
    }

    /// Fill the rectangle in VRAM
    ///
    /// Pixels outside the clip rectangle or past the end of VRAM are
    /// skipped. Returns the number of bytes written.
    pub fn execute(&self, vram: &mut [u8]) -> usize {
        let mut written = 0;

        for y in 0..self.height as u32 {
            let py = self.dst_y as u32 + y;
            for x in 0..self.width as u32 {
                let px = self.dst_x as u32 + x;
                if self.clip.is_some_and(|clip| !clip.contains(px, py)) {
                    continue;
                }

                let offset = py as u64 * self.pitch as u64 + px as u64;
                if let Some(byte) = vram.get_mut(offset as usize) {
                    *byte = self.color;
                    written += 1;
                }
            }
        }

        written
    }
}

/// Run the command latched in DRAW_CONTROL, then clear the start bit
///
/// The caller owns the busy flag around this call.
pub(super) fn run(regs: &mut MmioRegs, vram: &mut [u8]) {
    let draw_control = regs.u32(DRAW_CONTROL);

    match Command2d::from_draw_control(draw_control) {
        Command2d::RectFill => {
            let fill = RectFill::from_regs(regs);
            let written = fill.execute(vram);
            log::debug!(
                "2D rect fill: ({}, {}) {}x{} pitch={} color={:02x} ({} bytes)",
                fill.dst_x,
                fill.dst_y,
                fill.width,
                fill.height,
                fill.pitch,
                fill.color,
                written
            );
        }
        Command2d::Unsupported(cmd) => {
            log::debug!("2D engine command {:#x} not emulated", cmd);
        }
    }

    regs.set_u32(DRAW_CONTROL, draw_control & !DRAW_START);
}
