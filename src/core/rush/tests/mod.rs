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

//! Voodoo Rush module tests
//!
//! Tests are organized into the following modules:
//! - `basic`: Construction, reset, enable flag and the IODevice view
//! - `register_file`: Register file masks, typed mirrors and computed reads
//! - `puma`: PUMA aperture decode, texture cache flushes and the THP port
//! - `cmdfifo`: CMDFIFO write path, packet decoding and ring arithmetic
//! - `commands`: Triangle, fast fill, swap and vsync dispatch
//! - `translation`: Parameter block translation
//! - `properties`: Property-based checks of register and ring invariants

use super::*;
use crate::core::memory::PumaLayout;
use std::cell::RefCell;
use std::rc::Rc;

mod basic;
mod puma;
mod register_file;

/// PUMA address of a register in the 8 MB layout
fn reg_addr(index: u32) -> u32 {
    PumaLayout::MODE_8MB.reg_start + (index << 12)
}

/// Device with a shared recording backend attached
fn rush_with_recorder(mode: PumaMode, dual: bool) -> (VoodooRush, Rc<RefCell<RecordingBackend>>) {
    let recorder = Rc::new(RefCell::new(RecordingBackend {
        dual,
        ..RecordingBackend::default()
    }));
    let mut rush = VoodooRush::new(mode);
    rush.attach_backend(Box::new(recorder.clone()));
    (rush, recorder)
}

/// Enable a CMDFIFO ring covering pages `[bottom, top)` with no threshold
fn enable_cmdfifo(rush: &mut VoodooRush, bottom: u32, top: u32) {
    rush.reg_write(registers::FBIJR_INIT3, 0x1 | (bottom << 1) | (top << 11));
}

/// Write one 8-byte pair into the CMDFIFO
fn push_pair(rush: &mut VoodooRush, offset: u32, first: u32, second: u32) {
    rush.cmdfifo_write(offset, first);
    rush.cmdfifo_write(offset + 4, second);
}

/// Store words in the frame buffer without counting CMDFIFO entries
fn stage_words(rush: &mut VoodooRush, offset: u32, words: &[u32]) {
    for (i, &word) in words.iter().enumerate() {
        rush.memory_mut().write_fb32(offset + i as u32 * 4, word);
    }
}
