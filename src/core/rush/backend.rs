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

//! Rendering engine collaborator interface
//!
//! The Voodoo Rush core does not rasterize. Triangles are handed to a
//! [`RenderBackend`] supplied by the owner of the device together with a
//! borrow of the PUMA frame buffer that lasts for the duration of the call.
//! Backends that render asynchronously must copy what they need before
//! returning.

use std::cell::RefCell;
use std::rc::Rc;

use super::translate::VoodooParams;

/// External rendering engine
pub trait RenderBackend {
    /// Whether the engine simulates a second texture unit
    fn dual_tmus(&self) -> bool {
        false
    }

    /// Submit a translated triangle
    ///
    /// # Arguments
    ///
    /// * `params` - Translated parameter block
    /// * `fb` - PUMA frame buffer; color and aux buffers live at
    ///   `params.draw_offset` and `params.aux_offset`
    fn queue_triangle(&mut self, params: &VoodooParams, fb: &[u8]);

    /// Invalidate cached texels for the 4 KB page at `addr` on one TMU
    fn flush_texture_cache(&mut self, addr: u32, tmu: usize);

    /// Upload texture memory into a TMU
    ///
    /// # Arguments
    ///
    /// * `tmu` - Texture unit index (0 or 1)
    /// * `addr` - Destination byte address in the TMU's texture memory
    /// * `data` - Texels copied from PUMA texture memory
    fn load_texture(&mut self, tmu: usize, addr: u32, data: &[u8]);
}

/// Shared backends let the owner inspect the engine while the device holds it
impl<T: RenderBackend> RenderBackend for Rc<RefCell<T>> {
    fn dual_tmus(&self) -> bool {
        self.borrow().dual_tmus()
    }

    fn queue_triangle(&mut self, params: &VoodooParams, fb: &[u8]) {
        self.borrow_mut().queue_triangle(params, fb);
    }

    fn flush_texture_cache(&mut self, addr: u32, tmu: usize) {
        self.borrow_mut().flush_texture_cache(addr, tmu);
    }

    fn load_texture(&mut self, tmu: usize, addr: u32, data: &[u8]) {
        self.borrow_mut().load_texture(tmu, addr, data);
    }
}

/// Backend that records every call
///
/// Used by the trace runner and tests to observe what the core submits.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Simulate a second TMU
    pub dual: bool,
    /// Submitted parameter blocks
    pub triangles: Vec<VoodooParams>,
    /// `(addr, tmu)` of every cache flush
    pub flushes: Vec<(u32, usize)>,
    /// `(tmu, addr, len)` of every texture upload
    pub uploads: Vec<(usize, u32, usize)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dual_tmus() -> Self {
        Self {
            dual: true,
            ..Self::default()
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn dual_tmus(&self) -> bool {
        self.dual
    }

    fn queue_triangle(&mut self, params: &VoodooParams, _fb: &[u8]) {
        self.triangles.push(params.clone());
    }

    fn flush_texture_cache(&mut self, addr: u32, tmu: usize) {
        self.flushes.push((addr, tmu));
    }

    fn load_texture(&mut self, tmu: usize, addr: u32, data: &[u8]) {
        self.uploads.push((tmu, addr, data.len()));
    }
}
