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

//! PUMA aperture tests
//! Tests for address decode, texture cache flushes and the THP port

use super::*;

#[test]
fn test_register_page_alias() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    // Any byte inside the 4 KB page selects the same register
    rush.puma_write(reg_addr(registers::COLOR0) + 0xABC, 0x1234_5678);
    assert_eq!(rush.reg_read(registers::COLOR0), 0x1234_5678);
    assert_eq!(rush.puma_read(reg_addr(registers::COLOR0) + 0xFFC), 0x1234_5678);

    // Upper half of the register window wraps onto the same 256 registers
    rush.puma_write(reg_addr(registers::COLOR1) + 0x10_0000, 0xCAFE);
    assert_eq!(rush.reg_read(registers::COLOR1), 0xCAFE);
}

#[test]
fn test_gradient_reads_sign_extended() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.puma_write(reg_addr(registers::DRDX), 0x0080_0000);
    rush.puma_write(reg_addr(registers::START_G), 0x0080_0000);
    rush.puma_write(reg_addr(registers::START_R), 0x0080_0000);
    rush.puma_write(reg_addr(registers::START_Z), 0x0080_0000);
    rush.puma_write(reg_addr(registers::START_S), 0x0080_0000);

    assert_eq!(rush.puma_read(reg_addr(registers::DRDX)), 0xFF80_0000);
    // The whole DRDX..=DADY block sign-extends, starts inside it too
    assert_eq!(rush.puma_read(reg_addr(registers::START_G)), 0xFF80_0000);
    assert_eq!(rush.puma_read(reg_addr(registers::START_Z)), 0xFF80_0000);
    // Registers on either side of the block do not
    assert_eq!(rush.puma_read(reg_addr(registers::START_R)), 0x0080_0000);
    assert_eq!(rush.puma_read(reg_addr(registers::START_S)), 0x0080_0000);
    // Direct register reads return the stored value
    assert_eq!(rush.reg_read(registers::DRDX), 0x0080_0000);
}

#[test]
fn test_frame_buffer_access_aligned() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.puma_write(0x1002, 0xDEAD_BEEF);
    assert_eq!(rush.memory().read_fb32(0x1000), Some(0xDEAD_BEEF));
    assert_eq!(rush.puma_read(0x1003), 0xDEAD_BEEF);
    assert_eq!(rush.puma_read(0x3F_FFFC), 0);
}

#[test]
fn test_texture_write_flushes_page() {
    let (mut rush, recorder) = rush_with_recorder(PumaMode::Mode8Mb, true);

    rush.puma_write(0x60_3456, 0x0102_0304);

    assert_eq!(rush.memory().read_tex32(0x3454), Some(0x0102_0304));
    assert_eq!(rush.puma_read(0x60_3454), 0x0102_0304);
    assert_eq!(recorder.borrow().flushes, vec![(0x3000, 0), (0x3000, 1)]);
}

#[test]
fn test_texture_write_single_tmu() {
    let (mut rush, recorder) = rush_with_recorder(PumaMode::Mode8Mb, false);

    rush.puma_write(0x60_0010, 1);
    rush.puma_write(0x7F_FFFC, 2);

    assert_eq!(recorder.borrow().flushes, vec![(0x0000, 0), (0x1F_F000, 0)]);
}

#[test]
fn test_texture_write_without_backend() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.puma_write(0x60_0000, 0xAA55_AA55);
    assert_eq!(rush.memory().read_tex32(0), Some(0xAA55_AA55));
}

#[test]
fn test_invalid_address() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.puma_write(0x80_0000, 0xFFFF_FFFF);
    assert_eq!(rush.puma_read(0x80_0000), 0);
    assert_eq!(rush.puma_read(0xFFFF_FFFC), 0);
}

#[test]
fn test_4mb_layout() {
    let mut rush = VoodooRush::new(PumaMode::Mode4Mb);
    let layout = *rush.layout();

    assert_eq!(rush.memory().fb().len(), 0x20_0000);
    assert_eq!(rush.memory().tex().len(), 0x10_0000);

    rush.puma_write(layout.reg_start + (registers::COLOR0 << 12), 0x42);
    assert_eq!(rush.reg_read(registers::COLOR0), 0x42);

    rush.puma_write(layout.tex_start + 0x100, 0x77);
    assert_eq!(rush.memory().read_tex32(0x100), Some(0x77));

    // 8 MB texture window is past the end of the 4 MB aperture
    rush.puma_write(0x60_0000, 0x99);
    assert_eq!(rush.puma_read(0x60_0000), 0);
}

#[test]
fn test_thp_flags() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    // Register traffic does not touch the PUMA handshake
    rush.thp_write(reg_addr(registers::COLOR0), 0x10);
    assert_eq!(rush.thp_read(reg_addr(registers::COLOR0)), 0x10);
    assert!(!rush.puma_request());
    assert!(!rush.puma_grant());

    rush.thp_write(0x2000, 0x1234);
    assert!(rush.puma_request());
    assert!(!rush.puma_grant());

    assert_eq!(rush.thp_read(0x2000), 0x1234);
    assert!(rush.puma_grant());
}

#[test]
fn test_thp_disabled() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
    rush.set_enabled(false);

    rush.thp_write(0x2000, 0x1234);
    assert_eq!(rush.thp_read(0x2000), 0);
    assert!(!rush.puma_request());
    assert!(!rush.puma_grant());

    rush.set_enabled(true);
    assert_eq!(rush.memory().read_fb32(0x2000), Some(0));
}
