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

//! Core emulation components
//!
//! This module contains all device emulation components:
//! - AT3D host chip (MMIO window, 2D engine, THP bridge)
//! - Voodoo Rush / SST-96 coprocessor (register file, CMDFIFO, dispatcher)
//! - PUMA shared memory (frame buffer, texture memory, address decode)
//! - Device configuration, save states and bus-access trace scripts

pub mod at3d;
pub mod config;
pub mod error;
pub mod memory;
pub mod rush;
pub mod save_state;
pub mod trace;

// Re-export commonly used types
pub use at3d::At3d;
pub use config::DeviceConfig;
pub use error::{EmulatorError, Result, RushError};
pub use memory::{PumaMemory, PumaMode};
pub use rush::{RenderBackend, VoodooRush};
pub use save_state::SaveState;
