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

/// Emulator error types
///
/// Guest-visible faults (bad PUMA addresses, malformed CMDFIFO packets) are
/// logged and absorbed by the devices. The types here cover host-side
/// operations such as loading configuration or save states.
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Save state encode error: {0}")]
    SaveStateEncode(#[from] bincode::error::EncodeError),

    #[error("Save state decode error: {0}")]
    SaveStateDecode(#[from] bincode::error::DecodeError),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    IncompatibleSaveState { expected: u32, got: u32 },

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Voodoo Rush error: {0}")]
    Rush(#[from] RushError),
}

/// Voodoo Rush specific error types
#[derive(Error, Debug)]
pub enum RushError {
    #[error("PUMA mode mismatch: device aperture is {device} MB, snapshot is {snapshot} MB")]
    ModeMismatch { device: u32, snapshot: u32 },

    #[error("Snapshot {region} size mismatch: expected {expected} bytes, got {got}")]
    MemorySizeMismatch {
        region: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Voodoo Rush coprocessor is not attached")]
    NotAttached,

    #[error("Unsupported VRAM size: {0} MB (expected 1, 2 or 4)")]
    InvalidVramSize(u32),
}
