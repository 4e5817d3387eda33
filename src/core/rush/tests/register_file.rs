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

//! Register file tests
//! Tests for storage masks, typed mirrors, computed reads and side effects

use super::*;

#[test]
fn test_masked_registers_read_back_masked() {
    let masked = [
        (registers::FBZ_COLOR_PATH, 0x0FFF_FFFF),
        (registers::FOG_MODE, 0x3F),
        (registers::FBZ_MODE, 0x000F_FFFF),
        (registers::FOG_COLOR, 0x00FF_FFFF),
        (registers::CHROMA_KEY, 0x00FF_FFFF),
        (registers::CHROMA_RANGE, 0x1FFF_FFFF),
        (registers::AUX_BUFFER_SETUP, 0x7FFF_FFFF),
        (registers::TEXTURE_MODE, 0x7FFF_FFFF),
        (registers::TLOD, 0x7FFF_FFFF),
        (registers::TDETAIL, 0xFFFF),
        (registers::TEX_BASE_ADDR, 0x7_FFFF),
        (registers::TEX_BASE_ADDR38, 0x7_FFFF),
    ];

    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
    for (index, mask) in masked {
        rush.reg_write(index, 0xFFFF_FFFF);
        assert_eq!(rush.reg_read(index), mask, "register {:#04x}", index);
        assert_eq!(rush.raw_read(index), mask, "register {:#04x}", index);
    }
}

#[test]
fn test_fog_mode_example() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
    rush.reg_write(registers::FOG_MODE, 0xFFFF_FFFF);
    assert_eq!(rush.reg_read(registers::FOG_MODE), 0x3F);
}

#[test]
fn test_plain_registers_store_full_value() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    for index in [registers::ALPHA_MODE, registers::COLOR0, registers::ZA_COLOR, registers::COL_BUFFER_SETUP] {
        rush.reg_write(index, 0xFEDC_BA98);
        assert_eq!(rush.reg_read(index), 0xFEDC_BA98);
    }
}

#[test]
fn test_vertex_sign_extension() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::VERTEX_AX, 0x0001_FFF0);
    rush.reg_write(registers::VERTEX_CY, 0x0000_7FFF);

    assert_eq!(rush.triangle().vertex_ax, -16);
    assert_eq!(rush.triangle().vertex_cy, 0x7FFF);

    // Raw storage keeps the written value
    assert_eq!(rush.reg_read(registers::VERTEX_AX), 0x0001_FFF0);
}

#[test]
fn test_color_start_masked_to_24_bits() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::START_R, 0xFF12_3456);
    rush.reg_write(registers::START_A, 0x0080_0000);

    assert_eq!(rush.triangle().start_r, 0x12_3456);
    assert_eq!(rush.triangle().start_a, 0x80_0000);
}

#[test]
fn test_gradient_sign_extension() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::DRDX, 0x0080_0000);
    rush.reg_write(registers::DGDY, 0x007F_FFFF);
    rush.reg_write(registers::DBDX, 0xFF00_0001);
    rush.reg_write(registers::DADY, 0x00FF_FFFF);

    // 24-bit two's complement, not +8388608
    assert_eq!(rush.triangle().d_r_dx, -8_388_608);
    assert_eq!(rush.triangle().d_g_dy, 8_388_607);
    assert_eq!(rush.triangle().d_b_dx, 1);
    assert_eq!(rush.triangle().d_a_dy, -1);
}

#[test]
fn test_zstw_stored_raw() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::START_Z, 0xFFFF_0000);
    rush.reg_write(registers::DZDX, 0xFFFF_FFFF);
    rush.reg_write(registers::START_W, 0x8000_0000);
    rush.reg_write(registers::DTDY, 0x8000_0000);

    assert_eq!(rush.triangle().start_z, 0xFFFF_0000);
    assert_eq!(rush.triangle().d_z_dx, -1);
    assert_eq!(rush.triangle().start_w, 0x8000_0000);
    assert_eq!(rush.triangle().d_t_dy, i32::MIN);
}

#[test]
fn test_float_bank() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    // START_R of the float bank sits at the same offset as in the integer bank
    let fstart_r = registers::FVERTEX_AX + (registers::START_R - registers::VERTEX_AX);
    rush.reg_write(fstart_r, 1.5f32.to_bits());
    rush.reg_write(registers::FVERTEX_AX, (-2.25f32).to_bits());

    assert_eq!(rush.triangle_f().start_r, 1.5);
    assert_eq!(rush.triangle_f().vertex_ax, -2.25);

    // Integer bank untouched
    assert_eq!(rush.triangle().start_r, 0);
    assert_eq!(rush.triangle().vertex_ax, 0);
}

#[test]
fn test_version_is_constant() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::FBIJR_VERSION, 0);
    assert_eq!(rush.reg_read(registers::FBIJR_VERSION), registers::FBIJR_VERSION_VALUE);
    assert_eq!(rush.raw_read(registers::FBIJR_VERSION), 0);
}

#[test]
fn test_pixel_counters_masked_to_24_bits() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.counters.pixels_in = 0x1234_5678;
    rush.counters.pixels_out = 0xFF00_0001;

    assert_eq!(rush.reg_read(registers::FBI_PIXELS_IN), 0x34_5678);
    assert_eq!(rush.reg_read(registers::FBI_PIXELS_OUT), 0x00_0001);
    assert_eq!(rush.reg_read(registers::FBI_ZFUNC_FAIL), 0);
}

#[test]
fn test_swap_pending_saturates() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    for _ in 0..10 {
        rush.reg_write(registers::SWAPPEND_CMD, 0);
    }
    assert_eq!(rush.swap_state().pending, 7);

    // Pending count shows in STATUS bits 28..=30
    assert_eq!((rush.reg_read(registers::STATUS) >> 28) & 0x7, 7);

    rush.reg_write(registers::SWAPBUFFER_CMD, 0);
    assert!(rush.swap_state().requested);
    assert_eq!(rush.swap_state().pending, 6);
}

#[test]
fn test_swap_buffer_floor_at_zero() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::SWAPBUFFER_CMD, 0);
    rush.reg_write(registers::SWAPBUFFER_CMD, 0);

    assert_eq!(rush.swap_state().pending, 0);
    assert!(rush.swap_state().requested);
}

#[test]
fn test_init3_decode() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::FBIJR_INIT3, 0x0000_0203);

    let fifo = rush.cmdfifo();
    assert!(fifo.enabled);
    assert_eq!(fifo.bottom_page, 0x101);
    assert_eq!(fifo.top_page, 0);
    assert_eq!(fifo.threshold, 0);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT3), 0x0000_0203);

    // All four fields
    let value = 0x1 | (0x10 << 1) | (0x20 << 11) | (0x5 << 21);
    rush.reg_write(registers::FBIJR_INIT3, value);
    let fifo = rush.cmdfifo();
    assert_eq!(fifo.bottom_page, 0x10);
    assert_eq!(fifo.top_page, 0x20);
    assert_eq!(fifo.threshold, 5);

    rush.reg_write(registers::FBIJR_INIT3, 0);
    assert!(!rush.cmdfifo().enabled);
}

#[test]
fn test_init4_init5_override_fifo_state() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::FBIJR_INIT4, 0x0FFF_FFFF);
    rush.reg_write(registers::FBIJR_INIT5, 0x0001_2345);

    assert_eq!(rush.cmdfifo().entry_count, 0x7_FFFF);
    assert_eq!(rush.cmdfifo().read_ptr, 0x1_2345);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT4), 0x7_FFFF);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT5), 0x1_2345);
}

#[test]
fn test_cmdfifo_control_registers() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::CMDFIFO_BASE, 0x0001_0012);
    assert_eq!(rush.cmdfifo().base_page, 0x12);
    assert_eq!(rush.cmdfifo().bottom_page, 0x12);

    rush.reg_write(registers::CMDFIFO_BOTTOM, 0x14);
    rush.reg_write(registers::CMDFIFO_TOP, 0x20);
    rush.reg_write(registers::CMDFIFO_THRESHOLD, 0x8);
    rush.reg_write(registers::CMDFIFO_RDPTR, 0x6);
    rush.reg_write(registers::CMDFIFO_ENABLE, 0x3);

    let fifo = *rush.cmdfifo();
    assert_eq!(fifo.base_page, 0x12);
    assert_eq!(fifo.bottom_page, 0x14);
    assert_eq!(fifo.top_page, 0x20);
    assert_eq!(fifo.threshold, 0x8);
    assert_eq!(fifo.read_ptr, 0x6);
    assert!(fifo.enabled);

    assert_eq!(rush.reg_read(registers::CMDFIFO_BOTTOM), 0x14);
    assert_eq!(rush.reg_read(registers::CMDFIFO_ENABLE), 1);

    rush.reg_write(registers::CMDFIFO_ENABLE, 0x2);
    assert!(!rush.cmdfifo().enabled);
}

#[test]
fn test_fog_table_registers() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(registers::FOG_TABLE + 1, 0x4433_2211);
    rush.reg_write(registers::FOG_TABLE + 31, 0xDDCC_BBAA);

    let table = rush.fog_table();
    assert_eq!(table[2], FogEntry { dfog: 0x11, fog: 0x22 });
    assert_eq!(table[3], FogEntry { dfog: 0x33, fog: 0x44 });
    assert_eq!(table[62], FogEntry { dfog: 0xAA, fog: 0xBB });
    assert_eq!(table[63], FogEntry { dfog: 0xCC, fog: 0xDD });
    assert_eq!(table[0], FogEntry::default());
}

#[test]
fn test_descriptor_table() {
    use registers::{descriptor, WriteEffect};

    // PUMA reads sign-extend the block from DRDX through DADY
    let sign_extended: Vec<u32> = (0..256u32)
        .filter(|&i| descriptor(i).is_some_and(|d| d.sign_extend_read))
        .collect();
    assert_eq!(sign_extended, (registers::DRDX..=registers::DADY).collect::<Vec<_>>());

    assert_eq!(
        descriptor(registers::START_G).map(|d| d.write),
        Some(WriteEffect::Triangle(TriangleField::StartG))
    );
    assert_eq!(
        descriptor(registers::FVERTEX_AX + 0x1D).map(|d| d.write),
        Some(WriteEffect::TriangleF(TriangleField::DwDy))
    );
    assert!(descriptor(256).is_none());
}
