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

//! MMIO window tests

use super::*;
use crate::core::error::{EmulatorError, RushError};
use crate::core::memory::IODevice;

#[test]
fn test_new_sizes_vram() {
    for mb in [1, 2, 4] {
        let at3d = at3d_standalone(mb);
        assert_eq!(at3d.vram_size(), mb as usize * 1024 * 1024);
        assert!(at3d.rush().is_none());
    }
}

#[test]
fn test_new_rejects_bad_vram_size() {
    let config = DeviceConfig {
        vram_mb: 3,
        ..DeviceConfig::default()
    };
    let err = At3d::new(&config).err().unwrap();
    assert!(matches!(err, EmulatorError::Rush(RushError::InvalidVramSize(3))));
}

#[test]
fn test_new_applies_rush_config() {
    let config = DeviceConfig {
        puma_mode: PumaMode::Mode4Mb,
        window: crate::core::rush::RenderWindow {
            x: 8,
            y: 4,
            width: 320,
            height: 200,
        },
        ..DeviceConfig::default()
    };
    let at3d = At3d::new(&config).unwrap();
    let rush = at3d.rush().unwrap();

    assert_eq!(rush.mode(), PumaMode::Mode4Mb);
    assert_eq!(rush.window().width, 320);
    assert_eq!(rush.window().x, 8);
}

#[test]
fn test_mmio_composed_little_endian() {
    let mut at3d = at3d();

    at3d.mmio_write32(0x010, 0x1122_3344);
    assert_eq!(at3d.mmio_read8(0x010), 0x44);
    assert_eq!(at3d.mmio_read8(0x013), 0x11);
    assert_eq!(at3d.mmio_read16(0x012), 0x1122);

    at3d.mmio_write16(0x011, 0xAABB);
    assert_eq!(at3d.mmio_read32(0x010), 0x11AA_BB44);
}

#[test]
fn test_mmio_offset_wraps_window() {
    let mut at3d = at3d();

    at3d.mmio_write8(0x1_0020, 0x5A);
    assert_eq!(at3d.mmio_read8(0x020), 0x5A);
    assert_eq!(at3d.regs().byte(0x020), 0x5A);
}

#[test]
fn test_bank_decode() {
    assert_eq!(MmioBank::decode(0x000), MmioBank::ExtSetup);
    assert_eq!(MmioBank::decode(0x05C), MmioBank::Engine2d);
    assert_eq!(MmioBank::decode(0x090), MmioBank::MotionVideo);
    assert_eq!(MmioBank::decode(0x148), MmioBank::Cursor);
    assert_eq!(MmioBank::decode(0x2FF), MmioBank::TileBuffer);
    assert_eq!(MmioBank::decode(0x300), MmioBank::Engine3d);
    assert_eq!(MmioBank::decode(0x500), MmioBank::VmiHost);
    assert_eq!(MmioBank::decode(0x6FF), MmioBank::VmiVideo);
    assert_eq!(MmioBank::decode(0x700), MmioBank::Raw);
    assert_eq!(MmioBank::decode(0x1_0400), MmioBank::Thp);
}

#[test]
fn test_linear_aperture_wraps() {
    let mut at3d = at3d_standalone(1);

    at3d.linear_write32(0x10, 0xDEAD_BEEF);
    assert_eq!(at3d.linear_read32(0x10), 0xDEAD_BEEF);
    assert_eq!(at3d.linear_read16(0x12), 0xDEAD);
    assert_eq!(at3d.linear_read8(0x10_0010), 0xEF);

    // A dword straddling the end of VRAM wraps byte by byte
    at3d.linear_write32(0xF_FFFE, 0x0403_0201);
    assert_eq!(at3d.vram()[0xF_FFFE], 0x01);
    assert_eq!(at3d.vram()[0xF_FFFF], 0x02);
    assert_eq!(at3d.vram()[0x0], 0x03);
    assert_eq!(at3d.vram()[0x1], 0x04);
    assert_eq!(at3d.linear_read32(0xF_FFFE), 0x0403_0201);
}

#[test]
fn test_reset_clears_registers_keeps_vram() {
    let mut at3d = at3d();

    at3d.mmio_write32(0x020, 0xFFFF_FFFF);
    at3d.linear_write8(0x100, 0x77);
    at3d.rush_mut().unwrap().reg_write(registers::COLOR0, 0x1234);

    at3d.reset();

    assert_eq!(at3d.mmio_read32(0x020), 0);
    assert_eq!(at3d.linear_read8(0x100), 0x77);
    assert_eq!(at3d.rush().unwrap().reg_read(registers::COLOR0), 0);
}

#[test]
fn test_io_device_view() {
    let mut at3d = at3d();

    assert_eq!(at3d.name(), "at3d-mmio");
    assert_eq!(at3d.aperture_size(), 0x1_0000);
    assert!(at3d.contains(0xFFFF));
    assert!(!at3d.contains(0x1_0000));

    IODevice::write16(&mut at3d, 0x018, 0xBEEF);
    assert_eq!(IODevice::read8(&mut at3d, 0x019), 0xBE);
    assert_eq!(IODevice::read32(&mut at3d, 0x018), 0x0000_BEEF);
}

#[test]
fn test_require_rush() {
    let mut standalone = at3d_standalone(2);
    assert!(matches!(standalone.require_rush(), Err(RushError::NotAttached)));

    let mut paired = at3d();
    assert!(paired.require_rush().is_ok());
}
