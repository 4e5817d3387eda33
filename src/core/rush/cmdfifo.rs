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

//! CMDFIFO engine
//!
//! The CMDFIFO is a ring of register-write packets stored in the PUMA frame
//! buffer between `bottom_page << 12` and `top_page << 12`. The host fills it
//! in 8-byte pairs; the second word of every pair counts one entry and drains
//! the ring synchronously.
//!
//! # Packet Formats
//!
//! Every packet starts at the read pointer with a header word `H` and a
//! data word `D`. Bits 2..=22 of `H` hold a register address, counted in
//! register pages of the PUMA register window.
//!
//! ```text
//! H == 0, D == 0     NOP                        2 words
//! H bit 31 clear     singleton: reg[addr] = D   2 words
//! H bit 31 set       grouped: D is a mask; for each set bit i the next
//!                    data word goes to reg[addr + i]
//!                    1 + popcount(D) words
//! ```
//!
//! The read pointer counts 32-bit words from the bottom of the ring and wraps
//! at the ring size, so a packet never reads outside the ring. NOP and
//! singleton packets advance it by 2, a grouped packet by `1 + popcount(D)`.
//! Every drained packet retires one entry.

use super::registers::{CmdFifoReg, StatusFlags};
use super::VoodooRush;

/// Decoded CMDFIFO packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::core::rush) enum Packet {
    Nop,
    Singleton { addr: u32, value: u32 },
    Grouped { base: u32, mask: u32 },
}

impl Packet {
    pub(in crate::core::rush) fn decode(header: u32, data: u32) -> Self {
        if header == 0 && data == 0 {
            Packet::Nop
        } else if header & 0x8000_0000 != 0 {
            Packet::Grouped {
                base: (header >> 2) & 0x1F_FFFF,
                mask: data,
            }
        } else {
            Packet::Singleton {
                addr: (header >> 2) & 0x1F_FFFF,
                value: data,
            }
        }
    }
}

impl VoodooRush {
    /// Write a word into the CMDFIFO ring
    ///
    /// # Arguments
    ///
    /// * `offset` - Frame buffer offset; must lie inside the ring window
    /// * `value` - Packet word
    ///
    /// The first word of a pair is stored. The second word is stored, counts
    /// one entry and drains the ring. Writes outside the window or not
    /// aligned to a word of a pair are logged and dropped.
    pub fn cmdfifo_write(&mut self, offset: u32, value: u32) {
        if !self.cmdfifo.enabled {
            return;
        }

        if !self.cmdfifo.contains(offset) {
            log::warn!(
                "CMDFIFO write out of bounds: offset=0x{:08X} window=[0x{:08X}, 0x{:08X})",
                offset,
                self.cmdfifo.start(),
                self.cmdfifo.end()
            );
            return;
        }

        match (offset - self.cmdfifo.start()) & 7 {
            0 => {
                self.memory.write_fb32(offset, value);
            }
            4 => {
                self.memory.write_fb32(offset, value);
                self.cmdfifo.entry_count = self.cmdfifo.entry_count.saturating_add(1);

                if self.cmdfifo.threshold != 0 && self.cmdfifo.entry_count >= self.cmdfifo.threshold {
                    self.status.insert(StatusFlags::CMDFIFO_THRESHOLD);
                }

                if self.cmdfifo.entry_count > 0 {
                    self.process_cmdfifo();
                }
            }
            _ => {
                log::warn!("CMDFIFO unaligned write: offset=0x{:08X}", offset);
            }
        }
    }

    /// Drain pending CMDFIFO packets into register writes
    ///
    /// At most `threshold` packets are executed per call, or every pending
    /// entry when the threshold is 0. A read pointer outside the ring aborts
    /// the drain.
    pub fn process_cmdfifo(&mut self) {
        if !self.cmdfifo.enabled || self.cmdfifo.entry_count == 0 {
            return;
        }

        let max_packets = if self.cmdfifo.threshold != 0 {
            self.cmdfifo.threshold
        } else {
            self.cmdfifo.entry_count
        };
        let mut processed = 0;

        while self.cmdfifo.enabled && self.cmdfifo.entry_count > 0 && processed < max_packets {
            let ring_words = self.cmdfifo.ring_words();
            if self.cmdfifo.read_ptr >= ring_words {
                log::warn!(
                    "CMDFIFO read pointer out of bounds: {} (ring holds {} words)",
                    self.cmdfifo.read_ptr,
                    ring_words
                );
                break;
            }

            let (Some(header), Some(data)) = (self.ring_word(0), self.ring_word(1)) else {
                log::warn!("CMDFIFO ring lies outside the frame buffer");
                break;
            };

            match Packet::decode(header, data) {
                Packet::Nop => self.advance_read_ptr(2),
                Packet::Singleton { addr, value } => {
                    self.advance_read_ptr(2);
                    self.write_packet_register(addr, value);
                }
                Packet::Grouped { base, mask } => {
                    let count = mask.count_ones();
                    if count == 0 {
                        log::warn!("CMDFIFO grouped packet with empty mask: header=0x{:08X}", header);
                        self.advance_read_ptr(2);
                    } else {
                        let mut writes = Vec::with_capacity(count as usize);
                        let mut word = 2;
                        for bit in 0..32 {
                            if mask & (1 << bit) != 0 {
                                writes.push((base + bit, self.ring_word(word).unwrap_or(0)));
                                word += 1;
                            }
                        }

                        self.advance_read_ptr(1 + count);
                        for (addr, value) in writes {
                            self.write_packet_register(addr, value);
                        }
                    }
                }
            }

            self.cmdfifo.entry_count = self.cmdfifo.entry_count.saturating_sub(1);
            processed += 1;
        }

        if self.cmdfifo.entry_count < self.cmdfifo.threshold {
            self.status.remove(StatusFlags::CMDFIFO_THRESHOLD);
        }
    }

    /// Apply a write to one of the CMDFIFO control registers
    pub(in crate::core::rush) fn write_cmdfifo_reg(&mut self, reg: CmdFifoReg, value: u32) {
        let value = value & 0xFFFF;
        match reg {
            CmdFifoReg::Base => {
                self.cmdfifo.base_page = value;
                self.cmdfifo.bottom_page = value;
                log::debug!("CMDFIFO base page set to {:#06x}", value);
            }
            CmdFifoReg::Bottom => {
                self.cmdfifo.bottom_page = value;
                log::debug!("CMDFIFO bottom page set to {:#06x}", value);
            }
            CmdFifoReg::Top => {
                self.cmdfifo.top_page = value;
                log::debug!("CMDFIFO top page set to {:#06x}", value);
            }
            CmdFifoReg::ReadPtr => self.cmdfifo.read_ptr = value,
            CmdFifoReg::Threshold => self.cmdfifo.threshold = value,
            CmdFifoReg::Enable => {
                self.cmdfifo.enabled = value & 0x01 != 0;
                log::debug!(
                    "CMDFIFO {}: bottom={:#06x} top={:#06x}",
                    if self.cmdfifo.enabled { "enabled" } else { "disabled" },
                    self.cmdfifo.bottom_page,
                    self.cmdfifo.top_page
                );
            }
        }
    }

    /// Word `words` past the read pointer, wrapping inside the ring
    fn ring_word(&self, words: u32) -> Option<u32> {
        let offset = self.cmdfifo.word_address(words)?;
        self.memory.read_fb32(offset)
    }

    /// Move the read pointer `words` forward, wrapping at the ring size
    fn advance_read_ptr(&mut self, words: u32) {
        let ring_words = self.cmdfifo.ring_words();
        if ring_words != 0 {
            self.cmdfifo.read_ptr = (self.cmdfifo.read_ptr + words) % ring_words;
        }
    }

    /// Write a register named by a packet address
    ///
    /// The address selects a 4 KB page of the register window and goes
    /// through the same page decode as a PUMA register access.
    fn write_packet_register(&mut self, addr: u32, value: u32) {
        let layout = *self.memory.layout();
        let index = addr
            .checked_mul(0x1000)
            .and_then(|offset| layout.reg_start.checked_add(offset))
            .and_then(|puma_addr| layout.register_index(puma_addr));

        match index {
            Some(index) => self.reg_write(index as u32, value),
            None => log::warn!("CMDFIFO invalid register address: 0x{:06X}", addr),
        }
    }
}
