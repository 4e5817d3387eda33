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

//! SST-96 to rendering-engine parameter translation
//!
//! The SST-96 accumulates triangle state in 12.12 colors and packed mode
//! registers. The rendering engine consumes a flat [`VoodooParams`] block with
//! 12-bit color precision, per-TMU texture state and unpacked clip/fog
//! fields. Translation is a pure function of the register file.

use super::registers::{self, REGISTER_COUNT};
use super::types::{BufferSetup, ClipRect, FogEntry, RenderWindow, TriangleParams};

/// Number of fog table entries
pub const FOG_TABLE_SIZE: usize = 64;

/// Fog color unpacked into channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FogColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FogColor {
    pub fn from_register(value: u32) -> Self {
        Self {
            r: (value & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: ((value >> 16) & 0xFF) as u8,
        }
    }
}

/// Texture coordinate iterators and texture state for one TMU
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TmuParams {
    pub start_s: i64,
    pub start_t: i64,
    pub start_w: i64,
    pub d_s_dx: i64,
    pub d_t_dx: i64,
    pub d_w_dx: i64,
    pub d_s_dy: i64,
    pub d_t_dy: i64,
    pub d_w_dy: i64,

    pub texture_mode: u32,
    pub tlod: u32,
    pub tdetail: u32,
    pub tex_base_addr: u32,
    pub tex_base_addr1: u32,
}

/// Parameter block submitted to the rendering engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoodooParams {
    pub vertex_ax: i32,
    pub vertex_ay: i32,
    pub vertex_bx: i32,
    pub vertex_by: i32,
    pub vertex_cx: i32,
    pub vertex_cy: i32,

    pub start_r: i32,
    pub start_g: i32,
    pub start_b: i32,
    pub start_a: i32,
    pub start_z: i32,

    pub d_r_dx: i32,
    pub d_g_dx: i32,
    pub d_b_dx: i32,
    pub d_a_dx: i32,
    pub d_z_dx: i32,

    pub d_r_dy: i32,
    pub d_g_dy: i32,
    pub d_b_dy: i32,
    pub d_a_dy: i32,
    pub d_z_dy: i32,

    pub tmu: [TmuParams; 2],

    pub fbz_color_path: u32,
    pub fog_mode: u32,
    pub alpha_mode: u32,
    pub fbz_mode: u32,
    pub stipple: u32,
    pub color0: u32,
    pub color1: u32,
    pub za_color: u32,
    pub chroma_key: u32,
    pub chroma_range: u32,
    pub fog_color: FogColor,
    pub fog_table: [FogEntry; FOG_TABLE_SIZE],

    pub clip_left: u32,
    pub clip_right: u32,
    pub clip_low_y: u32,
    pub clip_high_y: u32,

    /// Color buffer byte offset in the frame buffer
    pub draw_offset: u32,
    /// Aux buffer byte offset in the frame buffer
    pub aux_offset: u32,
    /// Color buffer row stride in bytes
    pub row_width: u32,
    /// Aux buffer row stride in bytes
    pub aux_row_width: u32,
}

impl Default for VoodooParams {
    fn default() -> Self {
        Self {
            vertex_ax: 0,
            vertex_ay: 0,
            vertex_bx: 0,
            vertex_by: 0,
            vertex_cx: 0,
            vertex_cy: 0,
            start_r: 0,
            start_g: 0,
            start_b: 0,
            start_a: 0,
            start_z: 0,
            d_r_dx: 0,
            d_g_dx: 0,
            d_b_dx: 0,
            d_a_dx: 0,
            d_z_dx: 0,
            d_r_dy: 0,
            d_g_dy: 0,
            d_b_dy: 0,
            d_a_dy: 0,
            d_z_dy: 0,
            tmu: [TmuParams::default(); 2],
            fbz_color_path: 0,
            fog_mode: 0,
            alpha_mode: 0,
            fbz_mode: 0,
            stipple: 0,
            color0: 0,
            color1: 0,
            za_color: 0,
            chroma_key: 0,
            chroma_range: 0,
            fog_color: FogColor::default(),
            fog_table: [FogEntry::default(); FOG_TABLE_SIZE],
            clip_left: 0,
            clip_right: 0,
            clip_low_y: 0,
            clip_high_y: 0,
            draw_offset: 0,
            aux_offset: 0,
            row_width: 0,
            aux_row_width: 0,
        }
    }
}

/// Register file state the translator reads besides the triangle setup
pub struct RenderState<'a> {
    pub regs: &'a [u32; REGISTER_COUNT],
    pub fog_table: &'a [FogEntry; FOG_TABLE_SIZE],
    pub window: RenderWindow,
}

impl RenderState<'_> {
    fn reg(&self, index: u32) -> u32 {
        self.regs[index as usize]
    }
}

/// Translate accumulated SST-96 state into a rendering-engine block
///
/// Color starts, color gradients and Z drop their 12 fractional bits.
/// Texture iterators pass through unchanged and TMU0 state is mirrored into
/// TMU1. A non-zero window origin offsets every vertex by the origin in 12.4
/// screen units.
///
/// # Example
///
/// ```
/// use at3d_rush::core::rush::{registers, translate_params, FogEntry, RenderState,
///     RenderWindow, TriangleParams};
///
/// let mut regs = [0u32; registers::REGISTER_COUNT];
/// regs[registers::FOG_COLOR as usize] = 0x00_33_22_11;
///
/// let tri = TriangleParams {
///     start_r: 0x00_FF_F000,
///     d_r_dx: -4096,
///     ..Default::default()
/// };
/// let fog = [FogEntry::default(); 64];
/// let state = RenderState { regs: &regs, fog_table: &fog, window: RenderWindow::default() };
///
/// let params = translate_params(&tri, &state);
/// assert_eq!(params.start_r, 0xFFF);
/// assert_eq!(params.d_r_dx, -1);
/// assert_eq!((params.fog_color.r, params.fog_color.g, params.fog_color.b), (0x11, 0x22, 0x33));
/// ```
pub fn translate_params(tri: &TriangleParams, state: &RenderState<'_>) -> VoodooParams {
    let mut params = VoodooParams {
        vertex_ax: tri.vertex_ax,
        vertex_ay: tri.vertex_ay,
        vertex_bx: tri.vertex_bx,
        vertex_by: tri.vertex_by,
        vertex_cx: tri.vertex_cx,
        vertex_cy: tri.vertex_cy,

        start_r: (tri.start_r >> 12) as i32,
        start_g: (tri.start_g >> 12) as i32,
        start_b: (tri.start_b >> 12) as i32,
        start_a: (tri.start_a >> 12) as i32,
        start_z: (tri.start_z >> 12) as i32,

        d_r_dx: tri.d_r_dx >> 12,
        d_g_dx: tri.d_g_dx >> 12,
        d_b_dx: tri.d_b_dx >> 12,
        d_a_dx: tri.d_a_dx >> 12,
        d_z_dx: tri.d_z_dx >> 12,

        d_r_dy: tri.d_r_dy >> 12,
        d_g_dy: tri.d_g_dy >> 12,
        d_b_dy: tri.d_b_dy >> 12,
        d_a_dy: tri.d_a_dy >> 12,
        d_z_dy: tri.d_z_dy >> 12,

        fbz_color_path: state.reg(registers::FBZ_COLOR_PATH),
        fog_mode: state.reg(registers::FOG_MODE),
        alpha_mode: state.reg(registers::ALPHA_MODE),
        fbz_mode: state.reg(registers::FBZ_MODE),
        stipple: state.reg(registers::STIPPLE),
        color0: state.reg(registers::COLOR0),
        color1: state.reg(registers::COLOR1),
        za_color: state.reg(registers::ZA_COLOR),
        chroma_key: state.reg(registers::CHROMA_KEY),
        chroma_range: state.reg(registers::CHROMA_RANGE),
        fog_color: FogColor::from_register(state.reg(registers::FOG_COLOR)),
        fog_table: *state.fog_table,

        ..Default::default()
    };

    let tmu0 = TmuParams {
        start_s: tri.start_s as i64,
        start_t: tri.start_t as i64,
        start_w: tri.start_w as i64,
        d_s_dx: tri.d_s_dx as i64,
        d_t_dx: tri.d_t_dx as i64,
        d_w_dx: tri.d_w_dx as i64,
        d_s_dy: tri.d_s_dy as i64,
        d_t_dy: tri.d_t_dy as i64,
        d_w_dy: tri.d_w_dy as i64,
        texture_mode: state.reg(registers::TEXTURE_MODE),
        tlod: state.reg(registers::TLOD),
        tdetail: state.reg(registers::TDETAIL),
        tex_base_addr: state.reg(registers::TEX_BASE_ADDR),
        tex_base_addr1: state.reg(registers::TEX_BASE_ADDR1),
    };
    params.tmu = [tmu0; 2];

    let clip = ClipRect::from_registers(
        state.reg(registers::CLIP_LEFT_RIGHT0),
        state.reg(registers::CLIP_TOP_BOTTOM0),
    );
    params.clip_left = clip.left;
    params.clip_right = clip.right;
    params.clip_low_y = clip.top;
    params.clip_high_y = clip.bottom;

    let color = BufferSetup::from_raw(state.reg(registers::COL_BUFFER_SETUP));
    let aux = BufferSetup::from_raw(state.reg(registers::AUX_BUFFER_SETUP));
    params.draw_offset = color.base;
    params.row_width = color.stride;
    params.aux_offset = aux.base;
    params.aux_row_width = aux.stride;

    let window = state.window;
    if window.x != 0 || window.y != 0 {
        // 12.4 screen units; out-of-range origins wrap like the hardware adders
        let dx = window.x.wrapping_mul(16);
        let dy = window.y.wrapping_mul(16);
        params.vertex_ax = params.vertex_ax.wrapping_add(dx);
        params.vertex_ay = params.vertex_ay.wrapping_add(dy);
        params.vertex_bx = params.vertex_bx.wrapping_add(dx);
        params.vertex_by = params.vertex_by.wrapping_add(dy);
        params.vertex_cx = params.vertex_cx.wrapping_add(dx);
        params.vertex_cy = params.vertex_cy.wrapping_add(dy);
    }

    params
}
