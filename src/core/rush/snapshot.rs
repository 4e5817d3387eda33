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

//! Coprocessor state capture and restore

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RushError};
use crate::core::memory::PumaMode;
use crate::core::save_state::StateSave;

use super::registers::{StatusFlags, REGISTER_COUNT};
use super::translate::FOG_TABLE_SIZE;
use super::types::{
    CmdFifoState, EngineState, FogEntry, PixelCounters, RenderWindow, SwapState, TriangleParams,
    TriangleParamsF,
};
use super::VoodooRush;

/// Serializable Voodoo Rush state
///
/// Fixed-size tables are stored as vectors and checked on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RushState {
    pub puma_mode: PumaMode,

    /// Raw register storage, one entry per register index
    pub regs: Vec<u32>,

    pub triangle: TriangleParams,
    pub ftriangle: TriangleParamsF,
    pub fog_table: Vec<FogEntry>,

    /// Status flag bits, without the swap-pending field
    pub status: u32,

    pub cmdfifo: CmdFifoState,
    pub swap: SwapState,
    pub counters: PixelCounters,
    pub window: RenderWindow,
    pub enabled: bool,
    pub puma_req: bool,
    pub puma_gnt: bool,

    /// PUMA frame buffer contents
    pub fb: Vec<u8>,

    /// PUMA texture memory contents
    pub tex: Vec<u8>,
}

impl StateSave for VoodooRush {
    type State = RushState;

    fn to_state(&self) -> RushState {
        RushState {
            puma_mode: self.memory.mode(),
            regs: self.regs.to_vec(),
            triangle: self.triangle,
            ftriangle: self.ftriangle,
            fog_table: self.fog_table.to_vec(),
            status: self.status.bits(),
            cmdfifo: self.cmdfifo,
            swap: self.swap,
            counters: self.counters,
            window: self.window,
            enabled: self.enabled,
            puma_req: self.puma_req,
            puma_gnt: self.puma_gnt,
            fb: self.memory.fb().to_vec(),
            tex: self.memory.tex().to_vec(),
        }
    }

    /// Restore a snapshot taken from a device of the same PUMA mode
    ///
    /// Every size is checked before anything is written, so a rejected
    /// snapshot leaves the device untouched. The attached backend is kept.
    fn restore_from_state(&mut self, state: &RushState) -> Result<()> {
        let mode = self.memory.mode();
        if state.puma_mode != mode {
            return Err(RushError::ModeMismatch {
                device: mode.megabytes(),
                snapshot: state.puma_mode.megabytes(),
            }
            .into());
        }

        check_len("register file", REGISTER_COUNT, state.regs.len())?;
        check_len("fog table", FOG_TABLE_SIZE, state.fog_table.len())?;
        check_len("frame buffer", self.memory.fb().len(), state.fb.len())?;
        check_len("texture memory", self.memory.tex().len(), state.tex.len())?;

        self.regs.copy_from_slice(&state.regs);
        self.fog_table.copy_from_slice(&state.fog_table);
        self.memory.fb_mut().copy_from_slice(&state.fb);
        self.memory.tex_mut().copy_from_slice(&state.tex);

        self.triangle = state.triangle;
        self.ftriangle = state.ftriangle;
        self.status = StatusFlags::from_bits_truncate(state.status);
        self.cmdfifo = state.cmdfifo;
        self.swap = state.swap;
        self.counters = state.counters;
        self.window = state.window;
        self.enabled = state.enabled;
        self.puma_req = state.puma_req;
        self.puma_gnt = state.puma_gnt;
        self.engine = EngineState::Idle;

        log::info!("Voodoo Rush state restored ({} MB PUMA)", mode.megabytes());
        Ok(())
    }
}

fn check_len(region: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(RushError::MemorySizeMismatch {
            region,
            expected,
            got,
        }
        .into());
    }
    Ok(())
}
