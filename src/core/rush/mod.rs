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

//! Voodoo Rush (SST-96) coprocessor
//!
//! This module implements the register file, PUMA aperture decode, CMDFIFO
//! engine and command dispatcher of the 3Dfx SST-96 as attached to an
//! Alliance AT3D. The SST-96 shares the AT3D's PUMA memory window:
//! - Frame buffer: color/aux buffers and the CMDFIFO ring
//! - Register window: 256 registers, each aliased over a 4 KB page
//! - Texture memory: uploaded into the rendering engine's TMUs on demand
//!
//! # Register File
//!
//! Registers are described by a [descriptor table](registers::REGISTER_TABLE)
//! giving each index a storage mask, a write side effect and a read source.
//! Raw storage always receives the masked value; typed mirrors (triangle
//! setup, fog table, CMDFIFO control) are updated alongside it.
//!
//! # Rendering
//!
//! Rasterization is external. Triangle commands translate the accumulated
//! state into a [`VoodooParams`] block and submit it to the attached
//! [`RenderBackend`]. Fast fills write the frame buffer directly.
//!
//! # References
//!
//! - 3Dfx Interactive SST-96 Specification r2.2

use crate::core::memory::{IODevice, PumaLayout, PumaMemory, PumaMode, PumaRegion};

mod backend;
mod cmdfifo;
mod commands;
pub mod registers;
mod snapshot;
#[cfg(test)]
mod tests;
mod translate;
mod types;

pub use backend::{RecordingBackend, RenderBackend};
pub use commands::quantize_fill_color;
pub use registers::{FbzColorPath, FbzMode, StatusFlags};
pub use snapshot::RushState;
pub use translate::{translate_params, FogColor, RenderState, TmuParams, VoodooParams, FOG_TABLE_SIZE};
pub use types::*;

use registers::{
    CmdFifoReg, PixelCounter, ReadSource, WriteEffect, FBIJR_INIT0, FBIJR_INIT_DEFAULTS,
    FBIJR_VERSION_VALUE, REGISTER_COUNT,
};

/// SST-96 coprocessor state
///
/// # Examples
///
/// ```
/// use at3d_rush::core::memory::PumaMode;
/// use at3d_rush::core::rush::{registers, VoodooRush};
///
/// let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
///
/// // Registers are reachable through their 4 KB page in the PUMA window
/// rush.puma_write(0x40_0000 + (registers::COLOR0 << 12), 0x00FF_8040);
/// assert_eq!(rush.reg_read(registers::COLOR0), 0x00FF_8040);
///
/// // Ten swap-append commands saturate the pending count at 7
/// for _ in 0..10 {
///     rush.reg_write(registers::SWAPPEND_CMD, 0);
/// }
/// assert_eq!(rush.swap_state().pending, 7);
/// ```
pub struct VoodooRush {
    /// PUMA frame buffer and texture memory
    pub(in crate::core::rush) memory: PumaMemory,

    /// Raw register storage
    ///
    /// Holds the masked value of the last write to every index, including
    /// registers whose reads are computed from other state.
    pub(in crate::core::rush) regs: [u32; REGISTER_COUNT],

    /// Integer triangle setup bank
    pub(in crate::core::rush) triangle: TriangleParams,

    /// Floating-point triangle setup bank
    pub(in crate::core::rush) ftriangle: TriangleParamsF,

    /// Fog table, filled two entries per register
    pub(in crate::core::rush) fog_table: [FogEntry; FOG_TABLE_SIZE],

    pub(in crate::core::rush) status: StatusFlags,
    pub(in crate::core::rush) cmdfifo: CmdFifoState,
    pub(in crate::core::rush) swap: SwapState,
    pub(in crate::core::rush) counters: PixelCounters,
    pub(in crate::core::rush) engine: EngineState,

    /// Windowed rendering origin and size
    pub(in crate::core::rush) window: RenderWindow,

    /// Accesses are ignored while disabled
    pub(in crate::core::rush) enabled: bool,

    /// PUMA request raised by a THP frame buffer write
    pub(in crate::core::rush) puma_req: bool,

    /// PUMA grant raised by a THP frame buffer read
    pub(in crate::core::rush) puma_gnt: bool,

    /// External rendering engine
    pub(in crate::core::rush) backend: Option<Box<dyn RenderBackend>>,
}

impl VoodooRush {
    /// Create a coprocessor with a PUMA aperture of the given size
    ///
    /// Memory is zeroed and the FBIjr init registers hold their power-on
    /// values. The device starts enabled with no rendering backend.
    pub fn new(mode: PumaMode) -> Self {
        let mut rush = Self {
            memory: PumaMemory::new(mode),
            regs: [0; REGISTER_COUNT],
            triangle: TriangleParams::default(),
            ftriangle: TriangleParamsF::default(),
            fog_table: [FogEntry::default(); FOG_TABLE_SIZE],
            status: StatusFlags::empty(),
            cmdfifo: CmdFifoState::default(),
            swap: SwapState::default(),
            counters: PixelCounters::default(),
            engine: EngineState::Idle,
            window: RenderWindow::default(),
            enabled: true,
            puma_req: false,
            puma_gnt: false,
            backend: None,
        };
        rush.apply_init_defaults();
        log::info!("Voodoo Rush initialized (PUMA mode: {} MB)", mode.megabytes());
        rush
    }

    /// Reset the coprocessor
    ///
    /// Clears registers, triangle setup, CMDFIFO, swap and counter state and
    /// re-applies the init register defaults. PUMA memory, the render window,
    /// the enable flag and the attached backend are preserved.
    pub fn reset(&mut self) {
        self.regs = [0; REGISTER_COUNT];
        self.triangle = TriangleParams::default();
        self.ftriangle = TriangleParamsF::default();
        self.fog_table = [FogEntry::default(); FOG_TABLE_SIZE];
        self.status = StatusFlags::empty();
        self.cmdfifo = CmdFifoState::default();
        self.swap = SwapState::default();
        self.counters = PixelCounters::default();
        self.engine = EngineState::Idle;
        self.puma_req = false;
        self.puma_gnt = false;
        self.apply_init_defaults();
        log::debug!("Voodoo Rush reset");
    }

    fn apply_init_defaults(&mut self) {
        for (i, value) in FBIJR_INIT_DEFAULTS.iter().enumerate() {
            self.regs[FBIJR_INIT0 as usize + i] = *value;
        }
    }

    /// Attach the rendering engine, replacing any previous one
    pub fn attach_backend(&mut self, backend: Box<dyn RenderBackend>) {
        self.backend = Some(backend);
    }

    /// Detach and return the rendering engine
    pub fn detach_backend(&mut self) -> Option<Box<dyn RenderBackend>> {
        self.backend.take()
    }

    /// Enable or disable the coprocessor
    ///
    /// While disabled PUMA/THP accesses, fast fills, triangles and vsync are
    /// silent no-ops.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("Voodoo Rush {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the windowed rendering origin and size
    pub fn set_window(&mut self, window: RenderWindow) {
        self.window = window;
    }

    pub fn window(&self) -> RenderWindow {
        self.window
    }

    pub fn mode(&self) -> PumaMode {
        self.memory.mode()
    }

    pub fn layout(&self) -> &PumaLayout {
        self.memory.layout()
    }

    pub fn memory(&self) -> &PumaMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut PumaMemory {
        &mut self.memory
    }

    pub fn triangle(&self) -> &TriangleParams {
        &self.triangle
    }

    pub fn triangle_f(&self) -> &TriangleParamsF {
        &self.ftriangle
    }

    pub fn fog_table(&self) -> &[FogEntry; FOG_TABLE_SIZE] {
        &self.fog_table
    }

    pub fn cmdfifo(&self) -> &CmdFifoState {
        &self.cmdfifo
    }

    pub fn swap_state(&self) -> &SwapState {
        &self.swap
    }

    pub fn counters(&self) -> &PixelCounters {
        &self.counters
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine
    }

    pub fn status_flags(&self) -> StatusFlags {
        self.status
    }

    /// PUMA request raised by a THP frame buffer write
    pub fn puma_request(&self) -> bool {
        self.puma_req
    }

    /// PUMA grant raised by a THP frame buffer read
    pub fn puma_grant(&self) -> bool {
        self.puma_gnt
    }

    /// STATUS register value
    ///
    /// Status flags with the swap-pending count in bits 28..=30.
    pub fn status_value(&self) -> u32 {
        self.status.bits() | (((self.swap.pending & 0x7) as u32) << 28)
    }

    /// Raw storage of a register, bypassing computed reads
    pub fn raw_read(&self, index: u32) -> u32 {
        self.regs.get(index as usize).copied().unwrap_or(0)
    }

    /// Read a register
    ///
    /// Indices outside the register file read as 0.
    pub fn reg_read(&self, index: u32) -> u32 {
        let Some(desc) = registers::descriptor(index) else {
            return 0;
        };

        match desc.read {
            ReadSource::Raw => self.regs[index as usize],
            ReadSource::Status => self.status_value(),
            ReadSource::Version => FBIJR_VERSION_VALUE,
            ReadSource::PixelCounter(counter) => {
                let value = match counter {
                    PixelCounter::PixelsIn => self.counters.pixels_in,
                    PixelCounter::ChromaFail => self.counters.chroma_fail,
                    PixelCounter::ZFuncFail => self.counters.zfunc_fail,
                    PixelCounter::AFuncFail => self.counters.afunc_fail,
                    PixelCounter::PixelsOut => self.counters.pixels_out,
                };
                value & 0x00FF_FFFF
            }
            ReadSource::CmdFifoCount => self.cmdfifo.entry_count,
            ReadSource::CmdFifoReadPtr => self.cmdfifo.read_ptr,
            ReadSource::CmdFifo(reg) => match reg {
                CmdFifoReg::Base => self.cmdfifo.base_page,
                CmdFifoReg::Top => self.cmdfifo.top_page,
                CmdFifoReg::Bottom => self.cmdfifo.bottom_page,
                CmdFifoReg::ReadPtr => self.cmdfifo.read_ptr,
                CmdFifoReg::Threshold => self.cmdfifo.threshold,
                CmdFifoReg::Enable => self.cmdfifo.enabled as u32,
            },
        }
    }

    /// Write a register
    ///
    /// The masked value is stored, then the register's side effect runs.
    /// Indices outside the register file are ignored.
    pub fn reg_write(&mut self, index: u32, value: u32) {
        let Some(desc) = registers::descriptor(index) else {
            return;
        };

        self.regs[index as usize] = value & desc.mask;

        match desc.write {
            WriteEffect::Store => {}
            WriteEffect::Triangle(field) => self.triangle.set(field, value),
            WriteEffect::TriangleF(field) => self.ftriangle.set(field, value),
            WriteEffect::FogTable(n) => self.write_fog_table(n as usize, value),
            WriteEffect::Init(n) => self.write_init(n, value),
            WriteEffect::CmdFifo(reg) => self.write_cmdfifo_reg(reg, value),
            WriteEffect::Command(command) => self.execute(command),
        }
    }

    fn write_fog_table(&mut self, n: usize, value: u32) {
        let entry = 2 * n;
        if entry + 1 >= FOG_TABLE_SIZE {
            return;
        }
        self.fog_table[entry] = FogEntry {
            dfog: (value & 0xFF) as u8,
            fog: ((value >> 8) & 0xFF) as u8,
        };
        self.fog_table[entry + 1] = FogEntry {
            dfog: ((value >> 16) & 0xFF) as u8,
            fog: ((value >> 24) & 0xFF) as u8,
        };
    }

    fn write_init(&mut self, n: u8, value: u32) {
        match n {
            3 => {
                self.cmdfifo.apply_init3(value);
                log::debug!(
                    "CMDFIFO {}: bottom={:#x} top={:#x} threshold={}",
                    if self.cmdfifo.enabled { "enabled" } else { "disabled" },
                    self.cmdfifo.bottom_page,
                    self.cmdfifo.top_page,
                    self.cmdfifo.threshold
                );
            }
            4 => self.cmdfifo.entry_count = value & 0x7_FFFF,
            5 => self.cmdfifo.read_ptr = value & 0x7_FFFF,
            _ => {}
        }
    }

    /// Read a dword from the PUMA aperture
    ///
    /// Registers DRDX through DADY read back sign-extended from 24 bits.
    /// Invalid addresses are logged and read as 0.
    pub fn puma_read(&self, addr: u32) -> u32 {
        if !self.enabled {
            return 0;
        }

        match self.memory.layout().decode(addr) {
            PumaRegion::FrameBuffer { offset } => self.memory.read_fb32(offset & !3).unwrap_or(0),
            PumaRegion::Register { index } => {
                let value = self.reg_read(index as u32);
                match registers::descriptor(index as u32) {
                    Some(desc) if desc.sign_extend_read => sext24(value) as u32,
                    _ => value,
                }
            }
            PumaRegion::Texture { offset } => self.memory.read_tex32(offset & !3).unwrap_or(0),
            PumaRegion::Invalid => {
                log::warn!("PUMA read from invalid address: 0x{:08X}", addr);
                0
            }
        }
    }

    /// Write a dword to the PUMA aperture
    ///
    /// Frame buffer writes inside the enabled CMDFIFO window go to the
    /// CMDFIFO engine. Texture writes invalidate the written page in the
    /// rendering engine's texture cache.
    pub fn puma_write(&mut self, addr: u32, value: u32) {
        if !self.enabled {
            return;
        }

        match self.memory.layout().decode(addr) {
            PumaRegion::FrameBuffer { offset } => {
                if self.cmdfifo.enabled && self.cmdfifo.contains(offset) {
                    self.cmdfifo_write(offset, value);
                    return;
                }
                self.memory.write_fb32(offset & !3, value);
            }
            PumaRegion::Register { index } => self.reg_write(index as u32, value),
            PumaRegion::Texture { offset } => {
                self.memory.write_tex32(offset & !3, value);
                if let Some(backend) = self.backend.as_deref_mut() {
                    let page = (offset >> 12) << 12;
                    backend.flush_texture_cache(page, 0);
                    if backend.dual_tmus() {
                        backend.flush_texture_cache(page, 1);
                    }
                }
            }
            PumaRegion::Invalid => {
                log::warn!("PUMA write to invalid address: 0x{:08X} = 0x{:08X}", addr, value);
            }
        }
    }

    /// Write through the host chip's THP port
    ///
    /// Frame buffer writes raise the PUMA request flag.
    pub fn thp_write(&mut self, addr: u32, value: u32) {
        if !self.enabled {
            return;
        }
        self.puma_write(addr, value);
        if self.memory.layout().in_frame_buffer(addr) {
            self.puma_req = true;
        }
    }

    /// Read through the host chip's THP port
    ///
    /// Frame buffer reads raise the PUMA grant flag.
    pub fn thp_read(&mut self, addr: u32) -> u32 {
        if !self.enabled {
            return 0;
        }
        let value = self.puma_read(addr);
        if self.memory.layout().in_frame_buffer(addr) {
            self.puma_gnt = true;
        }
        value
    }
}

impl IODevice for VoodooRush {
    fn name(&self) -> &'static str {
        "voodoo-rush"
    }

    fn aperture_size(&self) -> u32 {
        self.memory.layout().aperture_size()
    }

    fn read32(&mut self, offset: u32) -> u32 {
        self.puma_read(offset)
    }

    fn write32(&mut self, offset: u32, value: u32) {
        self.puma_write(offset, value);
    }
}

impl Drop for VoodooRush {
    fn drop(&mut self) {
        log::debug!("Voodoo Rush closed");
    }
}
