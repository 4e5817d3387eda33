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

//! Device configuration
//!
//! The device pair is configured from a TOML file. Every field is optional
//! and falls back to the power-on defaults of an AT3D board with a Voodoo
//! Rush daughter chip:
//!
//! ```toml
//! vram_mb = 2          # AT3D VRAM: 1, 2 or 4 MB
//! voodoo_rush = true   # attach the SST-96 coprocessor
//! puma_mode = "8mb"    # PUMA aperture: "8mb" or "4mb"
//!
//! [window]
//! x = 0
//! y = 0
//! width = 640
//! height = 480
//! ```
//!
//! # Environment Overrides
//!
//! `AT3D_VRAM_MB`, `AT3D_VOODOO_RUSH` and `AT3D_PUMA_MODE` override the file
//! when [`DeviceConfig::apply_env`] is called. Binaries load a `.env` file
//! first, so overrides can live there during development.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{EmulatorError, Result, RushError};
use super::memory::PumaMode;
use super::rush::RenderWindow;

/// Environment variable overriding `vram_mb`
pub const ENV_VRAM_MB: &str = "AT3D_VRAM_MB";
/// Environment variable overriding `voodoo_rush`
pub const ENV_VOODOO_RUSH: &str = "AT3D_VOODOO_RUSH";
/// Environment variable overriding `puma_mode`
pub const ENV_PUMA_MODE: &str = "AT3D_PUMA_MODE";

/// Supported AT3D VRAM sizes in megabytes
pub const VRAM_SIZES_MB: [u32; 3] = [1, 2, 4];

/// Device pair configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// AT3D VRAM size in megabytes
    pub vram_mb: u32,

    /// Attach a Voodoo Rush coprocessor
    pub voodoo_rush: bool,

    /// PUMA aperture size of the coprocessor
    pub puma_mode: PumaMode,

    /// Windowed rendering origin and size
    pub window: RenderWindow,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vram_mb: 2,
            voodoo_rush: true,
            puma_mode: PumaMode::Mode8Mb,
            window: RenderWindow::default(),
        }
    }
}

impl DeviceConfig {
    /// Load and validate a configuration file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, has
    /// unknown keys or names an unsupported VRAM size.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded device configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    ///
    /// # Example
    ///
    /// ```
    /// use at3d_rush::core::config::DeviceConfig;
    /// use at3d_rush::core::memory::PumaMode;
    ///
    /// let config = DeviceConfig::from_toml_str("vram_mb = 4\npuma_mode = \"4mb\"").unwrap();
    /// assert_eq!(config.vram_mb, 4);
    /// assert_eq!(config.puma_mode, PumaMode::Mode4Mb);
    /// assert!(config.voodoo_rush);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DeviceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    ///
    /// Unset variables leave the field alone. The result is validated.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_VRAM_MB) {
            self.vram_mb = value.trim().parse().map_err(|_| {
                EmulatorError::InvalidConfig(format!("{}: not a number: {:?}", ENV_VRAM_MB, value))
            })?;
        }

        if let Some(value) = lookup(ENV_VOODOO_RUSH) {
            self.voodoo_rush = parse_bool(&value).ok_or_else(|| {
                EmulatorError::InvalidConfig(format!("{}: not a boolean: {:?}", ENV_VOODOO_RUSH, value))
            })?;
        }

        if let Some(value) = lookup(ENV_PUMA_MODE) {
            self.puma_mode = parse_puma_mode(&value).ok_or_else(|| {
                EmulatorError::InvalidConfig(format!(
                    "{}: expected \"8mb\" or \"4mb\", got {:?}",
                    ENV_PUMA_MODE, value
                ))
            })?;
        }

        self.validate()
    }

    /// Check the configuration for unsupported values
    pub fn validate(&self) -> Result<()> {
        if !VRAM_SIZES_MB.contains(&self.vram_mb) {
            return Err(RushError::InvalidVramSize(self.vram_mb).into());
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(EmulatorError::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }

    /// AT3D VRAM size in bytes
    pub fn vram_bytes(&self) -> usize {
        (self.vram_mb as usize) << 20
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_puma_mode(value: &str) -> Option<PumaMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "8mb" | "8" => Some(PumaMode::Mode8Mb),
        "4mb" | "4" => Some(PumaMode::Mode4Mb),
        _ => None,
    }
}
