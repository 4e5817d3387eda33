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

//! AT3D / Voodoo Rush device core library
//!
//! This library emulates the register file, memory-mapped I/O and command
//! queue of the Alliance AT3D 2D/3D chip together with the attached Voodoo
//! Rush (SST-96) 3D coprocessor that shares the AT3D's PUMA memory window.
//! Rasterization is delegated to a [`RenderBackend`](core::rush::RenderBackend)
//! supplied by the host.
//!
//! # Example
//!
//! ```
//! use at3d_rush::core::memory::PumaMode;
//! use at3d_rush::core::rush::{registers, VoodooRush};
//!
//! let mut rush = VoodooRush::new(PumaMode::Mode8Mb);
//!
//! // Fog mode is a 6-bit register
//! rush.reg_write(registers::FOG_MODE, 0xFFFF_FFFF);
//! assert_eq!(rush.reg_read(registers::FOG_MODE), 0x3F);
//! ```

pub mod core;
