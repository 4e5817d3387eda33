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

//! Basic Voodoo Rush functionality tests
//! Tests for initialization, reset, enable flag and aperture access

use super::*;

#[test]
fn test_initial_state() {
    let rush = VoodooRush::new(PumaMode::Mode8Mb);

    // Init registers hold their power-on values
    assert_eq!(rush.reg_read(registers::FBIJR_INIT0), 0x0000_F201);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT1), 0x0180_0000);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT2), 0x0007_0D2D);
    assert_eq!(rush.reg_read(registers::FBIJR_INIT3), 0x0018_0600);
    assert_eq!(rush.reg_read(registers::FBIJR_VERSION), 0x0001_0201);

    // The default INIT3 value is stored, not decoded
    assert!(!rush.cmdfifo().enabled);

    assert_eq!(rush.reg_read(registers::STATUS), 0);
    assert!(rush.is_enabled());
    assert_eq!(rush.engine_state(), EngineState::Idle);
    assert_eq!(rush.window(), RenderWindow::default());
    assert_eq!(rush.memory().fb().len(), 0x40_0000);
    assert_eq!(rush.memory().tex().len(), 0x20_0000);
}

#[test]
fn test_reset() {
    let mut rush = VoodooRush::new(PumaMode::Mode4Mb);

    rush.memory_mut().write_fb32(0x100, 0xDEAD_BEEF);
    rush.reg_write(registers::COLOR0, 0x1234_5678);
    rush.reg_write(registers::VERTEX_AX, 0x10);
    rush.reg_write(registers::FBIJR_INIT0, 0);
    rush.reg_write(registers::SWAPPEND_CMD, 0);
    enable_cmdfifo(&mut rush, 1, 2);
    rush.set_window(RenderWindow {
        x: 8,
        y: 4,
        width: 320,
        height: 200,
    });

    rush.reset();

    // Registers and state are cleared
    assert_eq!(rush.reg_read(registers::COLOR0), 0);
    assert_eq!(rush.triangle().vertex_ax, 0);
    assert_eq!(rush.swap_state().pending, 0);
    assert_eq!(*rush.cmdfifo(), CmdFifoState::default());

    // Init defaults re-applied
    assert_eq!(rush.reg_read(registers::FBIJR_INIT0), 0x0000_F201);

    // Memory and configuration survive
    assert_eq!(rush.memory().read_fb32(0x100), Some(0xDEAD_BEEF));
    assert_eq!(rush.window().x, 8);
    assert!(rush.is_enabled());
}

#[test]
fn test_out_of_range_index() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);

    rush.reg_write(256, 0xFFFF_FFFF);
    rush.reg_write(u32::MAX, 0xFFFF_FFFF);

    assert_eq!(rush.reg_read(256), 0);
    assert_eq!(rush.raw_read(1000), 0);
}

#[test]
fn test_disabled_device_ignores_access() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
    rush.set_enabled(false);

    rush.puma_write(reg_addr(registers::COLOR0), 0xAAAA_AAAA);
    rush.puma_write(0x1000, 0x5555_5555);
    assert_eq!(rush.puma_read(0x1000), 0);

    rush.set_enabled(true);
    assert_eq!(rush.reg_read(registers::COLOR0), 0);
    assert_eq!(rush.puma_read(0x1000), 0);
}

#[test]
fn test_io_device_view() {
    let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
    let dev: &mut dyn IODevice = &mut rush;

    assert_eq!(dev.name(), "voodoo-rush");
    assert_eq!(dev.aperture_size(), 0x80_0000);
    assert!(dev.contains(0x7F_FFFF));
    assert!(!dev.contains(0x80_0000));

    dev.write32(0x2000, 0x1122_3344);
    assert_eq!(dev.read32(0x2000), 0x1122_3344);

    // Narrow writes read-modify-write the containing dword
    dev.write16(0x2002, 0xBEEF);
    assert_eq!(dev.read32(0x2000), 0xBEEF_3344);
    dev.write8(0x2000, 0x00);
    assert_eq!(dev.read32(0x2000), 0xBEEF_3300);
    assert_eq!(dev.read8(0x2003), 0xBE);
}
