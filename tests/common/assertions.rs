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

//! Custom assertions for device state

use at3d_rush::core::rush::VoodooRush;

/// Assert a register reads back the expected value
#[allow(dead_code)]
pub fn assert_reg(rush: &VoodooRush, index: u32, expected: u32) {
    let actual = rush.reg_read(index);
    assert_eq!(
        actual, expected,
        "Register 0x{:02X} mismatch: expected 0x{:08X}, got 0x{:08X}",
        index, expected, actual
    );
}

/// Assert a 16-bit frame buffer pixel
#[allow(dead_code)]
pub fn assert_fb16(rush: &VoodooRush, offset: u32, expected: u16) {
    let actual = rush.memory().read_fb16(offset);
    assert_eq!(
        actual,
        Some(expected),
        "Frame buffer at 0x{:06X} mismatch: expected 0x{:04X}, got {:?}",
        offset,
        expected,
        actual
    );
}

/// Assert the CMDFIFO has drained completely
#[allow(dead_code)]
pub fn assert_cmdfifo_drained(rush: &VoodooRush, read_ptr: u32) {
    let fifo = rush.cmdfifo();
    assert_eq!(fifo.entry_count, 0, "CMDFIFO still holds {} entries", fifo.entry_count);
    assert_eq!(
        fifo.read_ptr, read_ptr,
        "CMDFIFO read pointer mismatch: expected {}, got {}",
        read_ptr, fifo.read_ptr
    );
}
