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

//! Test fixtures for common test scenarios

use std::cell::RefCell;
use std::rc::Rc;

use at3d_rush::core::at3d::At3d;
use at3d_rush::core::config::DeviceConfig;
use at3d_rush::core::memory::PumaMode;
use at3d_rush::core::rush::{RecordingBackend, VoodooRush};

/// Shared handle on the recording backend attached to a device
pub type Recorder = Rc<RefCell<RecordingBackend>>;

/// PUMA address of a coprocessor register
#[allow(dead_code)]
pub fn reg_addr(rush: &VoodooRush, index: u32) -> u32 {
    rush.layout().reg_start + (index << 12)
}

/// Coprocessor with a recording backend attached
#[allow(dead_code)]
pub fn rush_with_recorder(mode: PumaMode) -> (VoodooRush, Recorder) {
    let recorder: Recorder = Rc::new(RefCell::new(RecordingBackend::new()));
    let mut rush = VoodooRush::new(mode);
    rush.attach_backend(Box::new(recorder.clone()));
    (rush, recorder)
}

/// AT3D with the default configuration and a recording backend
#[allow(dead_code)]
pub fn at3d_with_recorder() -> (At3d, Recorder) {
    let mut at3d = At3d::new(&DeviceConfig::default()).expect("default config is valid");
    let recorder: Recorder = Rc::new(RefCell::new(RecordingBackend::new()));
    at3d.require_rush()
        .expect("default config attaches a coprocessor")
        .attach_backend(Box::new(recorder.clone()));
    (at3d, recorder)
}

/// Write one 8-byte CMDFIFO pair through the PUMA aperture
#[allow(dead_code)]
pub fn puma_pair(rush: &mut VoodooRush, offset: u32, first: u32, second: u32) {
    rush.puma_write(offset, first);
    rush.puma_write(offset + 4, second);
}

/// Store words in the frame buffer without counting CMDFIFO entries
#[allow(dead_code)]
pub fn stage_words(rush: &mut VoodooRush, offset: u32, words: &[u32]) {
    for (i, &word) in words.iter().enumerate() {
        rush.memory_mut().write_fb32(offset + i as u32 * 4, word);
    }
}

/// Header of a singleton CMDFIFO packet targeting a register
#[allow(dead_code)]
pub fn singleton_header(index: u32) -> u32 {
    index << 2
}

/// Header of a grouped CMDFIFO packet starting at a register
#[allow(dead_code)]
pub fn grouped_header(base: u32) -> u32 {
    0x8000_0000 | (base << 2)
}
