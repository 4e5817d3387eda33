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

//! Command dispatcher
//!
//! Command registers act purely through their side effects:
//! - TRIANGLE_CMD / FTRIANGLE_CMD: translate and submit a triangle
//! - FASTFILL_CMD: fill the clip rectangle of the color and/or aux buffer
//! - SWAPBUFFER_CMD / SWAPPEND_CMD: buffer swap bookkeeping
//! - NOP_CMD: pipeline flush, nothing to do here

use crate::core::memory::PumaMemory;

use super::backend::RenderBackend;
use super::registers::{self, Command, FbzColorPath, FbzMode};
use super::translate::{translate_params, RenderState};
use super::types::{BufferSetup, ClipRect, EngineState, SwapState, TriangleParams};
use super::VoodooRush;

/// Largest texture uploaded per TMU (256 x 256 texels, 16 bpp)
const MAX_TEXTURE_BYTES: u32 = 256 * 256 * 2;

/// Quantize COLOR0 into the 16-bit fast-fill color
///
/// Takes 5 bits from 19..=23, 6 bits from 10..=15 and 5 bits from 3..=7 and
/// packs them low to high.
///
/// # Example
///
/// ```
/// use at3d_rush::core::rush::quantize_fill_color;
///
/// assert_eq!(quantize_fill_color(0x00F8_0000), 0x001F);
/// assert_eq!(quantize_fill_color(0x0000_FC00), 0x07E0);
/// assert_eq!(quantize_fill_color(0x0000_00F8), 0xF800);
/// ```
pub fn quantize_fill_color(color: u32) -> u16 {
    (((color >> 19) & 0x1F) | (((color >> 10) & 0x3F) << 5) | (((color >> 3) & 0x1F) << 11)) as u16
}

impl VoodooRush {
    pub(in crate::core::rush) fn execute(&mut self, command: Command) {
        match command {
            Command::Triangle => {
                log::debug!("Triangle command");
                self.render_triangle();
            }
            Command::FloatTriangle => {
                log::debug!("Float triangle command");
                let tri = self.ftriangle.to_fixed();
                self.submit_triangle(&tri);
            }
            Command::Nop => log::debug!("NOP command"),
            Command::FastFill => {
                log::debug!("FastFill command");
                self.fastfill();
            }
            Command::SwapBuffer => {
                self.swap.requested = true;
                self.swap.pending = self.swap.pending.saturating_sub(1);
                log::debug!("SwapBuffer command (pending {})", self.swap.pending);
            }
            Command::SwapPend => {
                self.swap.pending = (self.swap.pending + 1).min(SwapState::MAX_PENDING);
                log::debug!("SwapPending increment: {}", self.swap.pending);
            }
        }
    }

    /// Submit the integer-bank triangle to the rendering engine
    ///
    /// Loads textures first when the color path enables texturing. Without
    /// an attached backend the triangle is logged and dropped.
    pub fn render_triangle(&mut self) {
        let tri = self.triangle;
        self.submit_triangle(&tri);
    }

    fn submit_triangle(&mut self, tri: &TriangleParams) {
        if !self.enabled {
            return;
        }

        let Some(backend) = self.backend.as_deref_mut() else {
            log::warn!("Cannot render triangle: no rendering backend attached");
            return;
        };

        self.engine = EngineState::Busy;

        let color_path = FbzColorPath::from_bits_truncate(self.regs[registers::FBZ_COLOR_PATH as usize]);
        if color_path.contains(FbzColorPath::TEXTURE_ENABLED) {
            let tex_base = self.regs[registers::TEX_BASE_ADDR as usize];
            upload_texture(&self.memory, tex_base, backend, 0);
            if backend.dual_tmus() {
                upload_texture(&self.memory, tex_base, backend, 1);
            }
        }

        let state = RenderState {
            regs: &self.regs,
            fog_table: &self.fog_table,
            window: self.window,
        };
        let params = translate_params(tri, &state);
        backend.queue_triangle(&params, self.memory.fb());

        self.counters.pixels_in = self.counters.pixels_in.wrapping_add(1);
        self.engine = EngineState::Idle;
    }

    /// Upload the current texture into one TMU of the rendering engine
    pub fn load_texture(&mut self, tmu: usize) {
        let tex_base = self.regs[registers::TEX_BASE_ADDR as usize];
        if let Some(backend) = self.backend.as_deref_mut() {
            upload_texture(&self.memory, tex_base, backend, tmu);
        }
    }

    /// Fill the clip rectangle
    ///
    /// Color buffer pixels receive the quantized COLOR0 when the RGB write
    /// mask is set; aux buffer pixels receive the low 16 bits of ZA_COLOR
    /// when the depth write mask is set. With Y-flip the row order inside
    /// the rectangle is inverted. Pixels outside the frame buffer are
    /// skipped.
    pub fn fastfill(&mut self) {
        if !self.enabled {
            return;
        }

        let color = BufferSetup::from_raw(self.regs[registers::COL_BUFFER_SETUP as usize]);
        let aux = BufferSetup::from_raw(self.regs[registers::AUX_BUFFER_SETUP as usize]);
        let clip = ClipRect::from_registers(
            self.regs[registers::CLIP_LEFT_RIGHT0 as usize],
            self.regs[registers::CLIP_TOP_BOTTOM0 as usize],
        );
        let fbz = FbzMode::from_bits_truncate(self.regs[registers::FBZ_MODE as usize]);
        let fill_color = quantize_fill_color(self.regs[registers::COLOR0 as usize]);
        let depth = (self.regs[registers::ZA_COLOR as usize] & 0xFFFF) as u16;

        let write_color = fbz.contains(FbzMode::RGB_WMASK);
        let write_depth = fbz.contains(FbzMode::DEPTH_WMASK);
        let flip = fbz.contains(FbzMode::Y_ORIGIN_FLIP);

        if (write_color || write_depth) && !clip.is_empty() {
            for y in clip.top..clip.bottom {
                let row = if flip { clip.bottom - 1 - y } else { y };
                let color_row = color.row_offset(row, false);
                let aux_row = aux.row_offset(row, false);

                for x in clip.left..clip.right {
                    if write_color {
                        self.memory.write_fb16(color_row.wrapping_add(x * 2), fill_color);
                    }
                    if write_depth {
                        self.memory.write_fb16(aux_row.wrapping_add(x * 2), depth);
                    }
                }
            }
        }

        log::debug!(
            "FastFill: [{}, {}] to [{}, {}], color={:04x}",
            clip.left,
            clip.top,
            clip.right,
            clip.bottom,
            fill_color
        );
    }

    /// Perform an outstanding buffer swap
    ///
    /// Front/back presentation belongs to the host chip's display engine, so
    /// the swap clears the request and counts it.
    pub fn swap_buffers(&mut self) {
        if !self.swap.requested {
            return;
        }

        self.swap.requested = false;
        self.swap.completed += 1;

        log::debug!(
            "Buffer swap completed: color base=0x{:06X} window={}x{}",
            BufferSetup::from_raw(self.regs[registers::COL_BUFFER_SETUP as usize]).base,
            self.window.width,
            self.window.height
        );
    }

    /// Vertical sync
    ///
    /// With a swap requested and swaps pending, one pending swap retires;
    /// when the last one retires the swap executes.
    pub fn vsync_callback(&mut self) {
        if !self.enabled {
            return;
        }

        if self.swap.pending > 0 && self.swap.requested {
            self.swap.pending -= 1;
            if self.swap.pending == 0 {
                self.swap_buffers();
            }
        }
    }

    /// Frame buffer byte address of pixel `(x, y)` in the color buffer
    ///
    /// Honors the Y-flip bit: rows go down from the base normally and up
    /// from it when flipped. The result is wrapped into the frame buffer.
    pub fn lfb_address(&self, x: u32, y: u32) -> u32 {
        let color = BufferSetup::from_raw(self.regs[registers::COL_BUFFER_SETUP as usize]);
        let flip = FbzMode::from_bits_truncate(self.regs[registers::FBZ_MODE as usize])
            .contains(FbzMode::Y_ORIGIN_FLIP);
        let addr = color.row_offset(y, flip).wrapping_add(x.wrapping_mul(2));
        addr & (self.memory.layout().fb_size - 1)
    }
}

/// Copy a texture from PUMA texture memory into a TMU
///
/// `tex_base` is the TEX_BASE_ADDR register, in 4 KB pages.
fn upload_texture(memory: &PumaMemory, tex_base: u32, backend: &mut dyn RenderBackend, tmu: usize) {
    let offset = (tex_base & 0x7_FFFF) << 12;
    let tex_size = memory.tex().len() as u32;

    if offset >= tex_size {
        log::debug!("Texture base 0x{:08X} outside texture memory", offset);
        return;
    }

    let len = MAX_TEXTURE_BYTES.min(tex_size - offset);
    let data = &memory.tex()[offset as usize..(offset + len) as usize];
    backend.load_texture(tmu, offset, data);
    backend.flush_texture_cache(offset, tmu);
}
