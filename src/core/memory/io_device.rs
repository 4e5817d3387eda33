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

//! I/O Device Trait
//!
//! Both apertures of the device pair (the AT3D MMIO window and the Voodoo
//! Rush PUMA window) are exposed to the host bus through the `IODevice`
//! trait. The bus hands the device an offset relative to the aperture base;
//! the device decodes it.
//!
//! # Access Widths
//!
//! Devices must implement the 32-bit accessors. The 8-bit and 16-bit
//! accessors default to a read-modify-write of the containing dword, which is
//! how the PUMA window behaves. Devices whose registers have byte-granular
//! side effects (the AT3D MMIO window) override every width.
//!
//! # Faults
//!
//! Accesses never fail: an access outside the device's decode is logged by
//! the device and reads back 0. Reads take `&mut self` because several
//! registers have read side effects (THP data reads, PUMA grant tracking).
//!
//! # Example
//!
//! ```
//! use at3d_rush::core::memory::IODevice;
//!
//! struct Scratch {
//!     regs: [u32; 4],
//! }
//!
//! impl IODevice for Scratch {
//!     fn name(&self) -> &'static str {
//!         "scratch"
//!     }
//!
//!     fn aperture_size(&self) -> u32 {
//!         16
//!     }
//!
//!     fn read32(&mut self, offset: u32) -> u32 {
//!         self.regs.get((offset / 4) as usize).copied().unwrap_or(0)
//!     }
//!
//!     fn write32(&mut self, offset: u32, value: u32) {
//!         if let Some(reg) = self.regs.get_mut((offset / 4) as usize) {
//!             *reg = value;
//!         }
//!     }
//! }
//!
//! let mut dev = Scratch { regs: [0; 4] };
//! dev.write8(0x05, 0xAB);
//! assert_eq!(dev.read32(0x04), 0x0000_AB00);
//! ```

/// Trait for memory-mapped apertures
pub trait IODevice {
    /// Short device name used in log messages
    fn name(&self) -> &'static str;

    /// Size of the aperture in bytes
    fn aperture_size(&self) -> u32;

    /// Check if an aperture-relative offset belongs to this device
    fn contains(&self, offset: u32) -> bool {
        offset < self.aperture_size()
    }

    /// Read a 32-bit value
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset from the aperture base (4-byte aligned)
    fn read32(&mut self, offset: u32) -> u32;

    /// Write a 32-bit value
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset from the aperture base (4-byte aligned)
    /// * `value` - 32-bit value to write
    fn write32(&mut self, offset: u32, value: u32);

    /// Read a 16-bit value
    ///
    /// Default implementation reads the containing dword and extracts the
    /// halfword.
    fn read16(&mut self, offset: u32) -> u16 {
        let value = self.read32(offset & !0x03);
        let shift = (offset & 0x02) * 8;
        ((value >> shift) & 0xFFFF) as u16
    }

    /// Write a 16-bit value
    ///
    /// Default implementation performs a read-modify-write of the containing
    /// dword.
    fn write16(&mut self, offset: u32, value: u16) {
        let aligned = offset & !0x03;
        let shift = (offset & 0x02) * 8;
        let mask = !(0xFFFF << shift);
        let current = self.read32(aligned);
        self.write32(aligned, (current & mask) | ((value as u32) << shift));
    }

    /// Read an 8-bit value
    fn read8(&mut self, offset: u32) -> u8 {
        let value = self.read32(offset & !0x03);
        let shift = (offset & 0x03) * 8;
        ((value >> shift) & 0xFF) as u8
    }

    /// Write an 8-bit value
    fn write8(&mut self, offset: u32, value: u8) {
        let aligned = offset & !0x03;
        let shift = (offset & 0x03) * 8;
        let mask = !(0xFF << shift);
        let current = self.read32(aligned);
        self.write32(aligned, (current & mask) | ((value as u32) << shift));
    }
}
