// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Naming of framebuffer dumps.
//!
//! A dumped plane is written as raw bytes to
//! `plane-<id>-<width>x<height>-<fourcc>[-<modifier>].bin`, where the width
//! is recovered from the pitch so padding columns are part of the image.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::FormatInfo;
use crate::modifier::Modifier;

/// A framebuffer attached to a plane, as reported by `drmModeGetFB2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpTarget {
    pub plane_id: u32,
    pub pitch: u32,
    pub height: u32,
    /// Fourcc code as reported by the kernel, which may be outside the
    /// format table.
    pub format: u32,
    pub modifier: Modifier,
}

impl DumpTarget {
    /// Width in pixels covered by one pitch.
    pub fn width(&self) -> Result<u32> {
        let bpp = FormatInfo::lookup(self.format)?.nonzero_bits_per_pixel()?;
        Ok((self.pitch as u64 * 8 / bpp as u64) as u32)
    }

    /// Bytes to dump: plane 0 pitch times height.
    pub fn len(&self) -> u64 {
        self.pitch as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn file_name(&self) -> Result<String> {
        let width = self.width()?;
        let format = FormatInfo::lookup(self.format)?.format();
        let name = if self.modifier.as_u64() != 0 {
            format!(
                "plane-{}-{}x{}-{}-{}.bin",
                self.plane_id, width, self.height, format, self.modifier
            )
        } else {
            format!("plane-{}-{}x{}-{}.bin", self.plane_id, width, self.height, format)
        };
        Ok(name)
    }

    /// [`DumpTarget::file_name`] inside `dir`.
    pub fn path(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(dir.as_ref().join(self.file_name()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use drm_fourcc::DrmFourcc::{self, Argb8888, Nv12, Yuv420_10bit};
    use crate::modifier::afbc as flags;

    fn target(format: DrmFourcc, modifier: Modifier) -> DumpTarget {
        DumpTarget {
            plane_id: 31,
            pitch: 7680,
            height: 1080,
            format: format as u32,
            modifier,
        }
    }

    #[test]
    fn test_linear_file_name() {
        let dump = target(Argb8888, Modifier::LINEAR);
        assert_eq!(dump.width(), Ok(1920));
        assert_eq!(dump.file_name().unwrap(), "plane-31-1920x1080-AR24.bin");
        assert_eq!(dump.len(), 7680 * 1080);
    }

    #[test]
    fn test_afbc_file_name() {
        let dump = target(Argb8888, Modifier::afbc(flags::BLOCK_SIZE_16X16 | flags::SPARSE));
        assert_eq!(
            dump.path("/tmp").unwrap(),
            PathBuf::from("/tmp/plane-31-1920x1080-AR24-ARM_AFBC(BLOCK_SIZE=16x16,SPARSE).bin")
        );
    }

    #[test]
    fn test_width_uses_format_bpp() {
        assert_eq!(target(Nv12, Modifier::LINEAR).width(), Ok(7680));
        assert_eq!(target(Yuv420_10bit, Modifier::LINEAR).width(), Ok(4096));
    }

    #[test]
    fn test_unknown_format() {
        let dump = DumpTarget {
            format: 0,
            ..target(Argb8888, Modifier::LINEAR)
        };
        assert_eq!(dump.file_name(), Err(Error::UnknownFormat(0)));
        // Valid fourcc that has no table entry.
        let dump = DumpTarget {
            format: DrmFourcc::R8 as u32,
            ..dump
        };
        assert_eq!(dump.width(), Err(Error::UnknownFormat(DrmFourcc::R8 as u32)));
    }
}
