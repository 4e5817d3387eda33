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

//! SST-96 register map and descriptor table
//!
//! Every register index maps to a [`RegisterDescriptor`] describing the
//! storage mask applied on write, the side effect triggered by the write and
//! where a read takes its value from. The register file evaluates the table
//! uniformly; raw storage is always updated alongside the side effect.

use bitflags::bitflags;

use super::types::TriangleField;

/// Number of registers in the register file
pub const REGISTER_COUNT: usize = 256;

pub const STATUS: u32 = 0x00;

// Integer triangle setup bank
pub const VERTEX_AX: u32 = 0x02;
pub const VERTEX_AY: u32 = 0x03;
pub const VERTEX_BX: u32 = 0x04;
pub const VERTEX_BY: u32 = 0x05;
pub const VERTEX_CX: u32 = 0x06;
pub const VERTEX_CY: u32 = 0x07;
pub const START_R: u32 = 0x08;
pub const DRDX: u32 = 0x09;
pub const DRDY: u32 = 0x0A;
pub const START_G: u32 = 0x0B;
pub const DGDX: u32 = 0x0C;
pub const DGDY: u32 = 0x0D;
pub const START_B: u32 = 0x0E;
pub const DBDX: u32 = 0x0F;
pub const DBDY: u32 = 0x10;
pub const START_Z: u32 = 0x11;
pub const DZDX: u32 = 0x12;
pub const DZDY: u32 = 0x13;
pub const START_A: u32 = 0x14;
pub const DADX: u32 = 0x15;
pub const DADY: u32 = 0x16;
pub const START_S: u32 = 0x17;
pub const DSDX: u32 = 0x18;
pub const DSDY: u32 = 0x19;
pub const START_T: u32 = 0x1A;
pub const DTDX: u32 = 0x1B;
pub const DTDY: u32 = 0x1C;
pub const START_W: u32 = 0x1D;
pub const DWDX: u32 = 0x1E;
pub const DWDY: u32 = 0x1F;
pub const TRIANGLE_CMD: u32 = 0x20;

/// First register of the floating-point triangle bank
///
/// The float bank mirrors the integer bank layout at `0x22..=0x3F`.
pub const FVERTEX_AX: u32 = 0x22;
pub const FTRIANGLE_CMD: u32 = 0x40;

pub const NOP_CMD: u32 = 0x42;
pub const FASTFILL_CMD: u32 = 0x44;
pub const SWAPBUFFER_CMD: u32 = 0x46;
pub const SWAPPEND_CMD: u32 = 0x48;

pub const FBZ_COLOR_PATH: u32 = 0x50;
pub const FOG_MODE: u32 = 0x51;
pub const ALPHA_MODE: u32 = 0x52;
pub const FBZ_MODE: u32 = 0x54;
pub const STIPPLE: u32 = 0x55;
pub const COLOR0: u32 = 0x56;
pub const COLOR1: u32 = 0x57;
pub const FOG_COLOR: u32 = 0x58;
pub const ZA_COLOR: u32 = 0x59;
pub const CHROMA_KEY: u32 = 0x5A;
pub const CHROMA_RANGE: u32 = 0x5B;

pub const COL_BUFFER_SETUP: u32 = 0x60;
pub const AUX_BUFFER_SETUP: u32 = 0x61;
pub const CLIP_LEFT_RIGHT0: u32 = 0x62;
pub const CLIP_TOP_BOTTOM0: u32 = 0x63;
pub const CLIP_LEFT_RIGHT1: u32 = 0x64;
pub const CLIP_TOP_BOTTOM1: u32 = 0x65;

/// Fog table, 32 registers each holding two entries
pub const FOG_TABLE: u32 = 0x70;
pub const FOG_TABLE_REGS: u32 = 32;

pub const FBIJR_INIT0: u32 = 0x90;
pub const FBIJR_INIT1: u32 = 0x91;
pub const FBIJR_INIT2: u32 = 0x92;
pub const FBIJR_INIT3: u32 = 0x93;
pub const FBIJR_INIT4: u32 = 0x94;
pub const FBIJR_INIT5: u32 = 0x95;
pub const FBIJR_VERSION: u32 = 0xA0;

pub const FBI_PIXELS_IN: u32 = 0xA1;
pub const FBI_CHROMA_FAIL: u32 = 0xA2;
pub const FBI_ZFUNC_FAIL: u32 = 0xA3;
pub const FBI_AFUNC_FAIL: u32 = 0xA4;
pub const FBI_PIXELS_OUT: u32 = 0xA5;

pub const TEX_CHIP_SEL: u32 = 0xC0;
pub const TEXTURE_MODE: u32 = 0xC1;
pub const TLOD: u32 = 0xC2;
pub const TDETAIL: u32 = 0xC3;
pub const TEX_BASE_ADDR: u32 = 0xC4;
pub const TEX_BASE_ADDR1: u32 = 0xC5;
pub const TEX_BASE_ADDR2: u32 = 0xC6;
pub const TEX_BASE_ADDR38: u32 = 0xC7;
pub const TREX_INIT0: u32 = 0xC8;
pub const TREX_INIT1: u32 = 0xC9;
pub const NCC_TABLE0: u32 = 0xD5;
pub const NCC_TABLE1: u32 = 0xE1;

pub const CMDFIFO_BASE: u32 = 0xE8;
pub const CMDFIFO_TOP: u32 = 0xE9;
pub const CMDFIFO_BOTTOM: u32 = 0xEA;
pub const CMDFIFO_RDPTR: u32 = 0xEB;
pub const CMDFIFO_THRESHOLD: u32 = 0xEC;
pub const CMDFIFO_ENABLE: u32 = 0xED;

/// FBIjr version register value (FBIjr v1, device 0x02)
pub const FBIJR_VERSION_VALUE: u32 = 0x0001_0201;

/// Power-on values of FBIJR_INIT0..=FBIJR_INIT3
pub const FBIJR_INIT_DEFAULTS: [u32; 4] = [0x0000_F201, 0x0180_0000, 0x0007_0D2D, 0x0018_0600];

bitflags! {
    /// STATUS register flag bits
    ///
    /// Bits 28..=30 carry the swap-pending count and are composed at read
    /// time rather than stored here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusFlags: u32 {
        /// Vertical retrace active
        const VRETRACE = 1 << 6;
        /// Frame buffer interface busy
        const FBI_BUSY = 1 << 7;
        /// Texture unit busy
        const TREX_BUSY = 1 << 8;
        /// Chip busy
        const SST_BUSY = 1 << 9;
        /// CMDFIFO entry count reached the drain threshold
        const CMDFIFO_THRESHOLD = 1 << 16;
    }
}

bitflags! {
    /// FBZ_MODE bits used by the command pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FbzMode: u32 {
        /// Color buffer write enable
        const RGB_WMASK = 1 << 9;
        /// Depth/aux buffer write enable
        const DEPTH_WMASK = 1 << 10;
        /// Y origin at the bottom of the buffer
        const Y_ORIGIN_FLIP = 1 << 17;
    }
}

bitflags! {
    /// FBZ_COLOR_PATH bits used by the command pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FbzColorPath: u32 {
        /// Texture mapping enabled
        const TEXTURE_ENABLED = 1 << 27;
    }
}

/// Command register actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Triangle,
    FloatTriangle,
    Nop,
    FastFill,
    SwapBuffer,
    SwapPend,
}

/// CMDFIFO control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdFifoReg {
    Base,
    Top,
    Bottom,
    ReadPtr,
    Threshold,
    Enable,
}

/// FBI pixel statistics counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelCounter {
    PixelsIn,
    ChromaFail,
    ZFuncFail,
    AFuncFail,
    PixelsOut,
}

/// Side effect of a register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEffect {
    /// Raw storage only
    Store,
    /// Integer triangle setup field
    Triangle(TriangleField),
    /// Floating-point triangle setup field
    TriangleF(TriangleField),
    /// Fog table register `n`, carrying entries `2n` and `2n + 1`
    FogTable(u8),
    /// FBIJR_INITn
    Init(u8),
    /// CMDFIFO control register
    CmdFifo(CmdFifoReg),
    /// Command trigger
    Command(Command),
}

/// Source of a register read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    /// Raw storage
    Raw,
    /// Status flags with the swap-pending count in bits 28..=30
    Status,
    /// Constant FBIjr version
    Version,
    /// Pixel counter, 24 bits wide
    PixelCounter(PixelCounter),
    /// Live CMDFIFO entry count (FBIJR_INIT4)
    CmdFifoCount,
    /// Live CMDFIFO read pointer (FBIJR_INIT5)
    CmdFifoReadPtr,
    /// Live CMDFIFO control register
    CmdFifo(CmdFifoReg),
}

/// Per-register behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Mask applied to the value before it is stored
    pub mask: u32,
    /// Write side effect
    pub write: WriteEffect,
    /// Read source
    pub read: ReadSource,
    /// PUMA reads sign-extend the low 24 bits
    pub sign_extend_read: bool,
}

impl RegisterDescriptor {
    const fn store(mask: u32) -> Self {
        Self {
            mask,
            write: WriteEffect::Store,
            read: ReadSource::Raw,
            sign_extend_read: false,
        }
    }

    const fn with_write(mut self, write: WriteEffect) -> Self {
        self.write = write;
        self
    }

    const fn with_read(mut self, read: ReadSource) -> Self {
        self.read = read;
        self
    }
}

const fn describe(index: u32) -> RegisterDescriptor {
    let plain = RegisterDescriptor::store(0xFFFF_FFFF);
    match index {
        STATUS => plain.with_read(ReadSource::Status),
        VERTEX_AX..=DWDY => {
            let field = TriangleField::ALL[(index - VERTEX_AX) as usize];
            let mut desc = plain.with_write(WriteEffect::Triangle(field));
            desc.sign_extend_read = index >= DRDX && index <= DADY;
            desc
        }
        TRIANGLE_CMD => plain.with_write(WriteEffect::Command(Command::Triangle)),
        FVERTEX_AX..=0x3F => {
            let field = TriangleField::ALL[(index - FVERTEX_AX) as usize];
            plain.with_write(WriteEffect::TriangleF(field))
        }
        FTRIANGLE_CMD => plain.with_write(WriteEffect::Command(Command::FloatTriangle)),
        NOP_CMD => plain.with_write(WriteEffect::Command(Command::Nop)),
        FASTFILL_CMD => plain.with_write(WriteEffect::Command(Command::FastFill)),
        SWAPBUFFER_CMD => plain.with_write(WriteEffect::Command(Command::SwapBuffer)),
        SWAPPEND_CMD => plain.with_write(WriteEffect::Command(Command::SwapPend)),
        FBZ_COLOR_PATH => RegisterDescriptor::store(0x0FFF_FFFF),
        FOG_MODE => RegisterDescriptor::store(0x3F),
        FBZ_MODE => RegisterDescriptor::store(0x000F_FFFF),
        FOG_COLOR => RegisterDescriptor::store(0x00FF_FFFF),
        CHROMA_KEY => RegisterDescriptor::store(0x00FF_FFFF),
        CHROMA_RANGE => RegisterDescriptor::store(0x1FFF_FFFF),
        AUX_BUFFER_SETUP => RegisterDescriptor::store(0x7FFF_FFFF),
        FOG_TABLE..=0x8F => plain.with_write(WriteEffect::FogTable((index - FOG_TABLE) as u8)),
        FBIJR_INIT0..=FBIJR_INIT3 => plain.with_write(WriteEffect::Init((index - FBIJR_INIT0) as u8)),
        FBIJR_INIT4 => plain
            .with_write(WriteEffect::Init(4))
            .with_read(ReadSource::CmdFifoCount),
        FBIJR_INIT5 => plain
            .with_write(WriteEffect::Init(5))
            .with_read(ReadSource::CmdFifoReadPtr),
        FBIJR_VERSION => plain.with_read(ReadSource::Version),
        FBI_PIXELS_IN => plain.with_read(ReadSource::PixelCounter(PixelCounter::PixelsIn)),
        FBI_CHROMA_FAIL => plain.with_read(ReadSource::PixelCounter(PixelCounter::ChromaFail)),
        FBI_ZFUNC_FAIL => plain.with_read(ReadSource::PixelCounter(PixelCounter::ZFuncFail)),
        FBI_AFUNC_FAIL => plain.with_read(ReadSource::PixelCounter(PixelCounter::AFuncFail)),
        FBI_PIXELS_OUT => plain.with_read(ReadSource::PixelCounter(PixelCounter::PixelsOut)),
        TEXTURE_MODE | TLOD => RegisterDescriptor::store(0x7FFF_FFFF),
        TDETAIL => RegisterDescriptor::store(0xFFFF),
        TEX_BASE_ADDR..=TEX_BASE_ADDR38 => RegisterDescriptor::store(0x7_FFFF),
        CMDFIFO_BASE => cmdfifo(CmdFifoReg::Base, 0xFFFF),
        CMDFIFO_TOP => cmdfifo(CmdFifoReg::Top, 0xFFFF),
        CMDFIFO_BOTTOM => cmdfifo(CmdFifoReg::Bottom, 0xFFFF),
        CMDFIFO_RDPTR => cmdfifo(CmdFifoReg::ReadPtr, 0xFFFF),
        CMDFIFO_THRESHOLD => cmdfifo(CmdFifoReg::Threshold, 0xFFFF),
        CMDFIFO_ENABLE => cmdfifo(CmdFifoReg::Enable, 0x1),
        _ => plain,
    }
}

const fn cmdfifo(reg: CmdFifoReg, mask: u32) -> RegisterDescriptor {
    RegisterDescriptor::store(mask)
        .with_write(WriteEffect::CmdFifo(reg))
        .with_read(ReadSource::CmdFifo(reg))
}

const fn build_table() -> [RegisterDescriptor; REGISTER_COUNT] {
    let mut table = [RegisterDescriptor::store(0xFFFF_FFFF); REGISTER_COUNT];
    let mut index = 0;
    while index < REGISTER_COUNT {
        table[index] = describe(index as u32);
        index += 1;
    }
    table
}

/// Descriptor table indexed by register number
pub static REGISTER_TABLE: [RegisterDescriptor; REGISTER_COUNT] = build_table();

/// Look up the descriptor for a register index
///
/// Returns `None` for indices outside the register file.
pub fn descriptor(index: u32) -> Option<&'static RegisterDescriptor> {
    REGISTER_TABLE.get(index as usize)
}
