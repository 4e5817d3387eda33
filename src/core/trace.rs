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

//! Bus-access trace scripts
//!
//! A trace script drives a freshly configured [`At3d`] through the same
//! entry points a host bus would use. One access per line:
//!
//! ```text
//! # comment
//! mmio.l 0x408 0x00456000   # dword MMIO write
//! mmio.b 0x405              # byte MMIO read
//! puma 0x600010 0x12345678  # PUMA aperture write
//! thp 0x001000              # THP port read
//! reg 0x56 0x00FF8040       # coprocessor register write
//! vsync
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex. A line with a value writes,
//! a line without one reads and records the result.

use serde::Serialize;

use super::at3d::At3d;
use super::error::{EmulatorError, Result};
use super::memory::PumaMode;
use super::rush::{CmdFifoState, PixelCounters, SwapState, VoodooRush};

/// MMIO access width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Width {
    Byte,
    Word,
    Dword,
}

impl Width {
    fn mask(self) -> u32 {
        match self {
            Width::Byte => 0xFF,
            Width::Word => 0xFFFF,
            Width::Dword => 0xFFFF_FFFF,
        }
    }
}

/// One scripted bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOp {
    Mmio {
        width: Width,
        addr: u32,
        value: Option<u32>,
    },
    Puma { addr: u32, value: Option<u32> },
    Thp { addr: u32, value: Option<u32> },
    Reg { index: u32, value: Option<u32> },
    Vsync,
}

impl TraceOp {
    /// Parse one script line
    ///
    /// Returns `Ok(None)` for blank lines and comments.
    ///
    /// # Example
    ///
    /// ```
    /// use at3d_rush::core::trace::{TraceOp, Width};
    ///
    /// let op = TraceOp::parse_line("mmio.w 0x404 0x1234 # status", 1).unwrap();
    /// assert_eq!(op, Some(TraceOp::Mmio { width: Width::Word, addr: 0x404, value: Some(0x1234) }));
    /// assert_eq!(TraceOp::parse_line("  # nothing", 2).unwrap(), None);
    /// ```
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Self>> {
        let line = match line.split_once('#') {
            Some((code, _)) => code,
            None => line,
        }
        .trim();

        if line.is_empty() {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let err = |reason: String| EmulatorError::Parse {
            line: line_no,
            reason,
        };

        if command == "vsync" {
            if !args.is_empty() {
                return Err(err("vsync takes no arguments".to_string()));
            }
            return Ok(Some(TraceOp::Vsync));
        }

        let (addr, value) = match args.as_slice() {
            [addr] => (parse_number(addr, line_no)?, None),
            [addr, value] => (parse_number(addr, line_no)?, Some(parse_number(value, line_no)?)),
            _ => {
                return Err(err(format!(
                    "{} expects an address and an optional value",
                    command
                )))
            }
        };

        let op = match command {
            "mmio.b" | "mmio.w" | "mmio.l" => {
                let width = match command {
                    "mmio.b" => Width::Byte,
                    "mmio.w" => Width::Word,
                    _ => Width::Dword,
                };
                if let Some(v) = value {
                    if v & !width.mask() != 0 {
                        return Err(err(format!("value 0x{:X} does not fit {}", v, command)));
                    }
                }
                TraceOp::Mmio { width, addr, value }
            }
            "puma" => TraceOp::Puma { addr, value },
            "thp" => TraceOp::Thp { addr, value },
            "reg" => TraceOp::Reg { index: addr, value },
            other => return Err(err(format!("unknown command '{}'", other))),
        };

        Ok(Some(op))
    }

    /// Mnemonic used in read records
    pub fn mnemonic(&self) -> &'static str {
        match self {
            TraceOp::Mmio {
                width: Width::Byte, ..
            } => "mmio.b",
            TraceOp::Mmio {
                width: Width::Word, ..
            } => "mmio.w",
            TraceOp::Mmio { .. } => "mmio.l",
            TraceOp::Puma { .. } => "puma",
            TraceOp::Thp { .. } => "thp",
            TraceOp::Reg { .. } => "reg",
            TraceOp::Vsync => "vsync",
        }
    }
}

fn parse_number(text: &str, line_no: usize) -> Result<u32> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|e| EmulatorError::Parse {
        line: line_no,
        reason: format!("invalid number '{}': {}", text, e),
    })
}

/// Parse a whole script
///
/// Stops at the first malformed line.
pub fn parse_script(source: &str) -> Result<Vec<(usize, TraceOp)>> {
    let mut ops = Vec::new();
    for (i, line) in source.lines().enumerate() {
        if let Some(op) = TraceOp::parse_line(line, i + 1)? {
            ops.push((i + 1, op));
        }
    }
    Ok(ops)
}

/// Result of a scripted read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRead {
    pub line: usize,
    pub op: &'static str,
    pub addr: u32,
    pub value: u32,
}

/// Execute one access against the device
///
/// Returns the value of a read.
///
/// # Errors
///
/// `thp` and `reg` accesses fail with [`RushError::NotAttached`](super::error::RushError)
/// on a board without a coprocessor.
pub fn execute(at3d: &mut At3d, op: &TraceOp) -> Result<Option<u32>> {
    let read = match *op {
        TraceOp::Mmio { width, addr, value } => match (width, value) {
            (Width::Byte, Some(v)) => {
                at3d.mmio_write8(addr, v as u8);
                None
            }
            (Width::Word, Some(v)) => {
                at3d.mmio_write16(addr, v as u16);
                None
            }
            (Width::Dword, Some(v)) => {
                at3d.mmio_write32(addr, v);
                None
            }
            (Width::Byte, None) => Some(at3d.mmio_read8(addr) as u32),
            (Width::Word, None) => Some(at3d.mmio_read16(addr) as u32),
            (Width::Dword, None) => Some(at3d.mmio_read32(addr)),
        },
        TraceOp::Puma { addr, value } => match value {
            Some(v) => {
                at3d.puma_write(addr, v);
                None
            }
            None => Some(at3d.puma_read(addr)),
        },
        TraceOp::Thp { addr, value } => {
            let rush = at3d.require_rush()?;
            match value {
                Some(v) => {
                    rush.thp_write(addr, v);
                    None
                }
                None => Some(rush.thp_read(addr)),
            }
        }
        TraceOp::Reg { index, value } => {
            let rush = at3d.require_rush()?;
            match value {
                Some(v) => {
                    rush.reg_write(index, v);
                    None
                }
                None => Some(rush.reg_read(index)),
            }
        }
        TraceOp::Vsync => {
            at3d.vsync();
            None
        }
    };
    Ok(read)
}

/// Run a parsed script, collecting every read
pub fn run_script(at3d: &mut At3d, ops: &[(usize, TraceOp)]) -> Result<Vec<TraceRead>> {
    let mut reads = Vec::new();
    for (line, op) in ops {
        if let Some(value) = execute(at3d, op)? {
            let addr = match *op {
                TraceOp::Mmio { addr, .. } | TraceOp::Puma { addr, .. } | TraceOp::Thp { addr, .. } => addr,
                TraceOp::Reg { index, .. } => index,
                TraceOp::Vsync => 0,
            };
            log::debug!("line {}: {} 0x{:X} -> 0x{:08X}", line, op.mnemonic(), addr, value);
            reads.push(TraceRead {
                line: *line,
                op: op.mnemonic(),
                addr,
                value,
            });
        }
    }
    Ok(reads)
}

/// Coprocessor state reported after a run
#[derive(Debug, Clone, Serialize)]
pub struct RushSummary {
    pub puma_mode: PumaMode,
    pub enabled: bool,
    pub status: u32,
    pub cmdfifo: CmdFifoState,
    pub swap: SwapState,
    pub counters: PixelCounters,
    pub puma_request: bool,
    pub puma_grant: bool,
}

impl RushSummary {
    pub fn from_rush(rush: &VoodooRush) -> Self {
        Self {
            puma_mode: rush.mode(),
            enabled: rush.is_enabled(),
            status: rush.status_value(),
            cmdfifo: *rush.cmdfifo(),
            swap: *rush.swap_state(),
            counters: *rush.counters(),
            puma_request: rush.puma_request(),
            puma_grant: rush.puma_grant(),
        }
    }
}

/// Device state reported after a run
#[derive(Debug, Clone, Serialize)]
pub struct TraceSummary {
    pub accesses: usize,
    pub vram_bytes: usize,
    pub rush: Option<RushSummary>,
    /// Triangles received by the rendering backend
    pub triangles: usize,
    pub reads: Vec<TraceRead>,
}

impl TraceSummary {
    pub fn new(at3d: &At3d, accesses: usize, reads: Vec<TraceRead>) -> Self {
        Self {
            accesses,
            vram_bytes: at3d.vram_size(),
            rush: at3d.rush().map(RushSummary::from_rush),
            triangles: 0,
            reads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DeviceConfig;
    use crate::core::error::RushError;
    use crate::core::rush::registers;

    fn at3d() -> At3d {
        At3d::new(&DeviceConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_line_forms() {
        assert_eq!(
            TraceOp::parse_line("mmio.b 0x43 0x80", 1).unwrap(),
            Some(TraceOp::Mmio {
                width: Width::Byte,
                addr: 0x43,
                value: Some(0x80)
            })
        );
        assert_eq!(
            TraceOp::parse_line("puma 4194304", 1).unwrap(),
            Some(TraceOp::Puma {
                addr: 0x40_0000,
                value: None
            })
        );
        assert_eq!(
            TraceOp::parse_line("reg 0X56 0xff", 1).unwrap(),
            Some(TraceOp::Reg {
                index: 0x56,
                value: Some(0xFF)
            })
        );
        assert_eq!(TraceOp::parse_line("vsync  # retrace", 1).unwrap(), Some(TraceOp::Vsync));
        assert_eq!(TraceOp::parse_line("", 1).unwrap(), None);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let cases = [
            "mmio.q 0x10",
            "puma",
            "puma 0x10 0x20 0x30",
            "thp 0xZZ",
            "mmio.b 0x10 0x100",
            "vsync 1",
        ];
        for case in cases {
            let result = TraceOp::parse_line(case, 7);
            assert!(
                matches!(result, Err(EmulatorError::Parse { line: 7, .. })),
                "{} should fail",
                case
            );
        }
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = "# header\n\nmmio.l 0x10 1\n  # indented\nvsync\n";
        let ops = parse_script(script).unwrap();

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].0, 3);
        assert_eq!(ops[1], (5, TraceOp::Vsync));
    }

    #[test]
    fn test_parse_script_reports_first_error() {
        let err = parse_script("vsync\nbogus 1\npuma").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_run_script_records_reads() {
        let mut at3d = at3d();
        let script = format!(
            "reg 0x{:X} 0x00123456\nreg 0x{:X}\nmmio.w 0x20 0xBEEF\nmmio.b 0x21\n",
            registers::COLOR0,
            registers::COLOR0
        );
        let ops = parse_script(&script).unwrap();
        let reads = run_script(&mut at3d, &ops).unwrap();

        assert_eq!(
            reads,
            vec![
                TraceRead {
                    line: 2,
                    op: "reg",
                    addr: registers::COLOR0,
                    value: 0x0012_3456
                },
                TraceRead {
                    line: 4,
                    op: "mmio.b",
                    addr: 0x21,
                    value: 0xBE
                },
            ]
        );
    }

    #[test]
    fn test_thp_needs_rush() {
        let config = DeviceConfig {
            voodoo_rush: false,
            ..DeviceConfig::default()
        };
        let mut at3d = At3d::new(&config).unwrap();

        let result = execute(&mut at3d, &TraceOp::Thp { addr: 0, value: None });
        assert!(matches!(result, Err(EmulatorError::Rush(RushError::NotAttached))));

        // PUMA accesses without a coprocessor read as 0
        let value = execute(&mut at3d, &TraceOp::Puma { addr: 0, value: None }).unwrap();
        assert_eq!(value, Some(0));
    }

    #[test]
    fn test_summary_serializes() {
        let mut at3d = at3d();
        let ops = parse_script("reg 0x48 0\nthp 0x1000 7").unwrap();
        let reads = run_script(&mut at3d, &ops).unwrap();
        let summary = TraceSummary::new(&at3d, ops.len(), reads);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["accesses"], 2);
        assert_eq!(json["vram_bytes"], 2 * 1024 * 1024);
        assert_eq!(json["rush"]["swap"]["pending"], 1);
        assert_eq!(json["rush"]["puma_request"], true);
        assert_eq!(json["rush"]["puma_mode"], "8mb");
    }
}
