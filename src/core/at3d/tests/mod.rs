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

//! AT3D module tests
//!
//! - `mmio`: Register window storage, bank decode and the linear aperture
//! - `engine`: 2D rectangle fill, 3D command acknowledge and the cursor
//! - `thp`: THP bridge to the Voodoo Rush coprocessor

use super::*;
use crate::core::memory::PumaMode;
use crate::core::rush::registers;

mod mmio;

/// AT3D with the default configuration (2 MB VRAM, Voodoo Rush attached)
fn at3d() -> At3d {
    At3d::new(&DeviceConfig::default()).unwrap()
}

/// AT3D without a coprocessor
fn at3d_standalone(vram_mb: u32) -> At3d {
    let config = DeviceConfig {
        vram_mb,
        voodoo_rush: false,
        ..DeviceConfig::default()
    };
    At3d::new(&config).unwrap()
}

/// PUMA address of a coprocessor register in the 8 MB layout
fn reg_addr(index: u32) -> u32 {
    0x40_0000 + (index << 12)
}
