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

//! Aperture decode tests

use super::super::*;

#[test]
fn test_decode_8mb() {
    let layout = PumaLayout::MODE_8MB;

    assert_eq!(layout.decode(0), PumaRegion::FrameBuffer { offset: 0 });
    assert_eq!(
        layout.decode(0x3F_FFFC),
        PumaRegion::FrameBuffer { offset: 0x3F_FFFC }
    );
    assert_eq!(layout.decode(0x40_0000), PumaRegion::Register { index: 0 });
    assert_eq!(layout.decode(0x5F_FFFF), PumaRegion::Register { index: 0xFF });
    assert_eq!(layout.decode(0x60_0000), PumaRegion::Texture { offset: 0 });
    assert_eq!(
        layout.decode(0x7F_FFFF),
        PumaRegion::Texture { offset: 0x1F_FFFF }
    );
    assert_eq!(layout.decode(0x80_0000), PumaRegion::Invalid);
    assert_eq!(layout.aperture_size(), 0x80_0000);
}

#[test]
fn test_decode_4mb() {
    let layout = PumaLayout::for_mode(PumaMode::Mode4Mb);

    assert_eq!(
        layout.decode(0x1F_FFFF),
        PumaRegion::FrameBuffer { offset: 0x1F_FFFF }
    );
    assert_eq!(layout.decode(0x20_0000), PumaRegion::Register { index: 0 });
    assert_eq!(layout.decode(0x2F_F000), PumaRegion::Register { index: 0xFF });
    assert_eq!(layout.decode(0x30_0000), PumaRegion::Texture { offset: 0 });
    assert_eq!(layout.decode(0x40_0000), PumaRegion::Invalid);
}

#[test]
fn test_register_page_alias() {
    let layout = PumaLayout::MODE_8MB;

    // Every byte of a 4 KB page decodes to the same register
    assert_eq!(layout.register_index(0x45_4000), Some(0x54));
    assert_eq!(layout.register_index(0x45_4004), Some(0x54));
    assert_eq!(layout.register_index(0x45_4FFF), Some(0x54));
    assert_eq!(layout.register_index(0x45_5000), Some(0x55));

    // The upper half of the 2 MB window wraps onto the same 256 registers
    assert_eq!(layout.register_index(0x50_0000), Some(0x00));
    assert_eq!(layout.register_index(0x55_4000), Some(0x54));

    // Outside the window
    assert_eq!(layout.register_index(0x3F_F000), None);
    assert_eq!(layout.register_index(0x60_0000), None);
}
