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

//! Alliance ProMotion AT3D host chip
//!
//! The AT3D owns the VRAM, the 64 KB MMIO register window and, optionally,
//! a Voodoo Rush coprocessor reached through the THP interface. SVGA timing,
//! PCI configuration space and BIOS ROM mapping live outside this crate.
//!
//! # MMIO Window
//!
//! Registers are byte-addressable; word and dword accesses are composed of
//! little-endian byte accesses, so a side effect triggered by the top byte of
//! a register fires after the lower bytes have been latched:
//! - DRAW_CONTROL byte 3 (0x043): start the 2D engine when bit 31 is set
//! - CMD_SET byte 3 (0x303): acknowledge a 3D command when bit 31 is set
//! - THP control byte 3 (0x403): enable or disable the coprocessor (bit 0)
//! - THP data byte 3 (0x40F): forward a THP write to the coprocessor
//!
//! THP data reads fetch from the coprocessor, and the THP status byte at
//! 0x405 mirrors the low byte of the coprocessor STATUS register.

use crate::core::config::DeviceConfig;
use crate::core::error::{Result, RushError};
use crate::core::memory::IODevice;
use crate::core::rush::{registers, VoodooRush};
use bitflags::bitflags;

pub mod banks;
mod cursor;
mod engine2d;
#[cfg(test)]
mod tests;

pub use banks::{MmioBank, MmioRegs, MMIO_SIZE};
pub use cursor::{HwCursor, CURSOR_SIZE};
pub use engine2d::{Clip2d, Command2d, RectFill, DRAW_START};

use banks::{CMD_SET, DRAW_CONTROL, THP_ADDRESS, THP_CONTROL, THP_DATA, THP_STATUS};

/// CMD_SET start/busy bit
pub const CMD_SET_START: u32 = 1 << 31;

bitflags! {
    /// Drawing engines with a command in flight
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EngineBusy: u8 {
        const DRAW_2D = 1 << 0;
        const RENDER_3D = 1 << 1;
    }
}

/// AT3D device state
///
/// # Example
///
/// ```
/// use at3d_rush::core::at3d::At3d;
/// use at3d_rush::core::config::DeviceConfig;
/// use at3d_rush::core::rush::registers;
///
/// let mut at3d = At3d::new(&DeviceConfig::default()).unwrap();
///
/// // Point the THP address at COLOR0 and write through the data register
/// at3d.mmio_write32(0x408, 0x40_0000 + (registers::COLOR0 << 12));
/// at3d.mmio_write32(0x40C, 0x0012_3456);
///
/// let rush = at3d.rush().unwrap();
/// assert_eq!(rush.reg_read(registers::COLOR0), 0x0012_3456);
/// ```
pub struct At3d {
    /// MMIO register storage
    regs: MmioRegs,

    /// Video memory
    vram: Vec<u8>,

    /// Linear aperture address mask (VRAM size - 1)
    vram_mask: u32,

    /// Derived hardware cursor state
    cursor: HwCursor,

    /// Voodoo Rush coprocessor behind the THP interface
    rush: Option<VoodooRush>,

    busy: EngineBusy,
}

impl At3d {
    /// Create an AT3D from a device configuration
    ///
    /// # Errors
    ///
    /// Returns [`RushError::InvalidVramSize`] for VRAM sizes other than
    /// 1, 2 or 4 MB.
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;

        let vram_size = config.vram_bytes();
        let rush = config.voodoo_rush.then(|| {
            let mut rush = VoodooRush::new(config.puma_mode);
            rush.set_window(config.window);
            rush
        });

        log::info!(
            "AT3D initialized with {} MB VRAM{}",
            config.vram_mb,
            if rush.is_some() { " and Voodoo Rush" } else { "" }
        );

        Ok(Self {
            regs: MmioRegs::new(),
            vram: vec![0; vram_size],
            vram_mask: (vram_size - 1) as u32,
            cursor: HwCursor::default(),
            rush,
            busy: EngineBusy::empty(),
        })
    }

    /// Reset the chip
    ///
    /// Clears every MMIO register and resets the coprocessor. VRAM keeps its
    /// contents.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.cursor = HwCursor::default();
        self.busy = EngineBusy::empty();
        if let Some(rush) = self.rush.as_mut() {
            rush.reset();
        }
        log::debug!("AT3D reset");
    }

    /// VRAM size in bytes
    pub fn vram_size(&self) -> usize {
        self.vram.len()
    }

    pub fn vram(&self) -> &[u8] {
        &self.vram
    }

    pub fn vram_mut(&mut self) -> &mut [u8] {
        &mut self.vram
    }

    pub fn regs(&self) -> &MmioRegs {
        &self.regs
    }

    pub fn cursor(&self) -> HwCursor {
        self.cursor
    }

    /// Engines still executing a command
    ///
    /// Both engines complete synchronously, so this is empty between bus
    /// accesses.
    pub fn engine_busy(&self) -> EngineBusy {
        self.busy
    }

    pub fn rush(&self) -> Option<&VoodooRush> {
        self.rush.as_ref()
    }

    pub fn rush_mut(&mut self) -> Option<&mut VoodooRush> {
        self.rush.as_mut()
    }

    /// The coprocessor, or an error when the board has none
    pub fn require_rush(&mut self) -> std::result::Result<&mut VoodooRush, RushError> {
        self.rush.as_mut().ok_or(RushError::NotAttached)
    }

    /// Whether a coprocessor is attached and enabled
    pub fn rush_enabled(&self) -> bool {
        self.rush.as_ref().is_some_and(|rush| rush.is_enabled())
    }

    fn enabled_rush(&mut self) -> Option<&mut VoodooRush> {
        self.rush.as_mut().filter(|rush| rush.is_enabled())
    }

    /// Read a byte from the MMIO window
    pub fn mmio_read8(&mut self, offset: u32) -> u8 {
        let offset = offset & 0xFFFF;

        let value = match offset {
            0x405 => {
                let stored = self.regs.byte(offset);
                match self.rush.as_ref().filter(|rush| rush.is_enabled()) {
                    Some(rush) => stored | (rush.reg_read(registers::STATUS) & 0xFF) as u8,
                    None => stored,
                }
            }
            THP_DATA..=0x40F => {
                let address = self.regs.u32(THP_ADDRESS);
                let stored = self.regs.byte(offset);
                self.enabled_rush()
                    .map(|rush| rush.thp_read(address).to_le_bytes()[(offset - THP_DATA) as usize])
                    .unwrap_or(stored)
            }
            _ => self.regs.byte(offset),
        };

        log::trace!(
            "AT3D MMIO read [{}] {:04x} = {:02x}",
            MmioBank::decode(offset).name(),
            offset,
            value
        );
        value
    }

    /// Write a byte to the MMIO window
    pub fn mmio_write8(&mut self, offset: u32, value: u8) {
        let offset = offset & 0xFFFF;
        log::trace!(
            "AT3D MMIO write [{}] {:04x} = {:02x}",
            MmioBank::decode(offset).name(),
            offset,
            value
        );

        self.regs.set_byte(offset, value);

        match offset {
            0x043 => {
                if self.regs.u32(DRAW_CONTROL) & DRAW_START != 0 {
                    self.busy.insert(EngineBusy::DRAW_2D);
                    engine2d::run(&mut self.regs, &mut self.vram);
                    self.busy.remove(EngineBusy::DRAW_2D);
                }
            }
            0x303 => {
                let cmd_set = self.regs.u32(CMD_SET);
                if cmd_set & CMD_SET_START != 0 {
                    self.busy.insert(EngineBusy::RENDER_3D);
                    log::debug!("AT3D 3D command {:08x} acknowledged", cmd_set);
                    self.regs.set_u32(CMD_SET, cmd_set & !CMD_SET_START);
                    self.busy.remove(EngineBusy::RENDER_3D);
                }
            }
            0x403 => self.update_thp_control(),
            0x40F => {
                let address = self.regs.u32(THP_ADDRESS);
                let data = self.regs.u32(THP_DATA);
                if let Some(rush) = self.enabled_rush() {
                    rush.thp_write(address, data);
                }
            }
            _ if cursor::affects_cursor(offset) => {
                self.cursor = HwCursor::from_regs(&self.regs, self.vram_mask);
            }
            _ => {}
        }
    }

    fn update_thp_control(&mut self) {
        let enable = self.regs.u32(THP_CONTROL) & 0x01 != 0;
        match self.rush.as_mut() {
            Some(rush) => {
                rush.set_enabled(enable);
                log::debug!("Voodoo Rush {} via THP", if enable { "enabled" } else { "disabled" });
            }
            None if enable => {
                log::warn!("THP requests Voodoo Rush but none is attached");
            }
            None => {}
        }
    }

    pub fn mmio_read16(&mut self, offset: u32) -> u16 {
        u16::from_le_bytes([self.mmio_read8(offset), self.mmio_read8(offset.wrapping_add(1))])
    }

    pub fn mmio_read32(&mut self, offset: u32) -> u32 {
        u32::from_le_bytes([
            self.mmio_read8(offset),
            self.mmio_read8(offset.wrapping_add(1)),
            self.mmio_read8(offset.wrapping_add(2)),
            self.mmio_read8(offset.wrapping_add(3)),
        ])
    }

    pub fn mmio_write16(&mut self, offset: u32, value: u16) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.mmio_write8(offset.wrapping_add(i as u32), byte);
        }
    }

    pub fn mmio_write32(&mut self, offset: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.mmio_write8(offset.wrapping_add(i as u32), byte);
        }
    }

    /// Read a byte through the linear VRAM aperture
    ///
    /// Addresses wrap at the VRAM size.
    pub fn linear_read8(&self, addr: u32) -> u8 {
        self.vram[(addr & self.vram_mask) as usize]
    }

    pub fn linear_read16(&self, addr: u32) -> u16 {
        u16::from_le_bytes([self.linear_read8(addr), self.linear_read8(addr.wrapping_add(1))])
    }

    pub fn linear_read32(&self, addr: u32) -> u32 {
        u32::from_le_bytes([
            self.linear_read8(addr),
            self.linear_read8(addr.wrapping_add(1)),
            self.linear_read8(addr.wrapping_add(2)),
            self.linear_read8(addr.wrapping_add(3)),
        ])
    }

    pub fn linear_write8(&mut self, addr: u32, value: u8) {
        self.vram[(addr & self.vram_mask) as usize] = value;
    }

    pub fn linear_write16(&mut self, addr: u32, value: u16) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.linear_write8(addr.wrapping_add(i as u32), byte);
        }
    }

    pub fn linear_write32(&mut self, addr: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.linear_write8(addr.wrapping_add(i as u32), byte);
        }
    }

    /// Read a dword from the PUMA aperture
    ///
    /// Reads 0 without an enabled coprocessor.
    pub fn puma_read(&self, addr: u32) -> u32 {
        match self.rush.as_ref().filter(|rush| rush.is_enabled()) {
            Some(rush) => rush.puma_read(addr),
            None => 0,
        }
    }

    /// Write a dword to the PUMA aperture
    pub fn puma_write(&mut self, addr: u32, value: u32) {
        if let Some(rush) = self.enabled_rush() {
            rush.puma_write(addr, value);
        }
    }

    /// Vertical sync from the display path
    pub fn vsync(&mut self) {
        if let Some(rush) = self.enabled_rush() {
            rush.vsync_callback();
        }
    }

    /// THP status register, including the mirrored coprocessor byte
    pub fn thp_status(&mut self) -> u32 {
        self.mmio_read32(THP_STATUS)
    }
}

impl IODevice for At3d {
    fn name(&self) -> &'static str {
        "at3d-mmio"
    }

    fn aperture_size(&self) -> u32 {
        MMIO_SIZE as u32
    }

    fn read32(&mut self, offset: u32) -> u32 {
        self.mmio_read32(offset)
    }

    fn write32(&mut self, offset: u32, value: u32) {
        self.mmio_write32(offset, value);
    }

    fn read16(&mut self, offset: u32) -> u16 {
        self.mmio_read16(offset)
    }

    fn write16(&mut self, offset: u32, value: u16) {
        self.mmio_write16(offset, value);
    }

    fn read8(&mut self, offset: u32) -> u8 {
        self.mmio_read8(offset)
    }

    fn write8(&mut self, offset: u32, value: u8) {
        self.mmio_write8(offset, value);
    }
}
