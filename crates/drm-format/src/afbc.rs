// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! AFBC buffer sizing.
//!
//! An AFBC buffer is a header region with one 16-byte entry per
//! superblock followed by the superblock payloads. [`min_size`] returns an
//! upper bound for any content: every payload is sized as if it were
//! uncompressed.

use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::format::{FormatCode, FormatInfo};
use crate::modifier::{afbc as flags, Modifier};

const HEADER_SIZE: u64 = 16;
const HEADER_ALIGNMENT: u64 = 64;
const SUPERBLOCK_PIXELS: u64 = 256;
const SUPERBLOCK_ALIGNMENT: u64 = 128;
const TILED_HEADER_LAYOUT_ALIGNMENT: u64 = 8;
const TILED_HEADER_BODY_START_ALIGNMENT: u64 = 4096;

/// Superblock geometries the size calculation supports.
///
/// Both cover 256 pixels. 64x4 and the 32x8/64x4 dual mode are rejected
/// when decoding a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSize {
    Block16x16,
    Block32x8,
}

impl BlockSize {
    pub fn width(self) -> u64 {
        match self {
            BlockSize::Block16x16 => 16,
            BlockSize::Block32x8 => 32,
        }
    }

    pub fn height(self) -> u64 {
        match self {
            BlockSize::Block16x16 => 16,
            BlockSize::Block32x8 => 8,
        }
    }

    /// Decodes the block-size field of AFBC modifier flags.
    pub fn from_flags(afbc_flags: u64) -> Result<Self> {
        match afbc_flags & flags::BLOCK_SIZE_MASK {
            flags::BLOCK_SIZE_16X16 => Ok(BlockSize::Block16x16),
            flags::BLOCK_SIZE_32X8 => Ok(BlockSize::Block32x8),
            other => {
                warn!("Invalid AFBC_FORMAT_MOD_BLOCK_SIZE: {other}");
                Err(Error::UnsupportedBlockGeometry(other))
            }
        }
    }
}

/// Compression layout of an AFBC buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AfbcLayout {
    pub block_size: BlockSize,
    /// Tiled-header layout: 8x coarser surface alignment and a
    /// page-aligned body.
    pub tiled_header: bool,
}

impl AfbcLayout {
    pub fn new(block_size: BlockSize, tiled_header: bool) -> Self {
        AfbcLayout {
            block_size,
            tiled_header,
        }
    }

    /// Decodes an ARM AFBC modifier.
    ///
    /// Non-AFBC modifiers are rejected with [`Error::UnsupportedModifier`].
    pub fn from_modifier(modifier: Modifier) -> Result<Self> {
        if !modifier.is_afbc() {
            return Err(Error::UnsupportedModifier(modifier));
        }
        let afbc_flags = modifier.afbc_flags();
        Ok(AfbcLayout {
            block_size: BlockSize::from_flags(afbc_flags)?,
            tiled_header: afbc_flags & flags::TILED != 0,
        })
    }

    /// Width and height alignment of the surface, in pixels.
    pub fn alignment(&self) -> (u64, u64) {
        let (w, h) = (self.block_size.width(), self.block_size.height());
        if self.tiled_header {
            (w * TILED_HEADER_LAYOUT_ALIGNMENT, h * TILED_HEADER_LAYOUT_ALIGNMENT)
        } else {
            (w, h)
        }
    }

    /// Alignment of the header region, which is also the body start.
    pub fn header_alignment(&self) -> u64 {
        if self.tiled_header {
            TILED_HEADER_BODY_START_ALIGNMENT
        } else {
            HEADER_ALIGNMENT
        }
    }
}

impl TryFrom<Modifier> for AfbcLayout {
    type Error = Error;

    fn try_from(modifier: Modifier) -> Result<Self> {
        AfbcLayout::from_modifier(modifier)
    }
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be non-zero.
pub const fn round_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) / alignment * alignment
}

/// [`round_up`] returning `None` instead of overflowing.
pub(crate) const fn checked_round_up(value: u64, alignment: u64) -> Option<u64> {
    match value.checked_add(alignment - 1) {
        Some(value) => Some(value / alignment * alignment),
        None => None,
    }
}

/// Minimum size in bytes of an AFBC buffer holding a `width` x `height`
/// surface of `format`.
///
/// Sizes that do not fit in a `u64` are reported as
/// [`Error::InvalidDimensions`].
pub fn min_size(
    format: impl FormatCode,
    width: u32,
    height: u32,
    layout: &AfbcLayout,
) -> Result<u64> {
    let info = FormatInfo::lookup(format).map_err(|err| {
        warn!("cannot size AFBC buffer: {err}");
        err
    })?;
    afbc_size(info, width, height, layout)
}

fn afbc_size(info: &FormatInfo, width: u32, height: u32, layout: &AfbcLayout) -> Result<u64> {
    let bpp = info.nonzero_bits_per_pixel()? as u64;
    let overflow = Error::InvalidDimensions { width, height };

    let (w_alignment, h_alignment) = layout.alignment();
    let aligned_width = round_up(width as u64, w_alignment);
    let aligned_height = round_up(height as u64, h_alignment);

    let n_blocks = aligned_width
        .checked_mul(aligned_height)
        .ok_or(overflow.clone())?
        / SUPERBLOCK_PIXELS;
    let header = n_blocks
        .checked_mul(HEADER_SIZE)
        .and_then(|header| checked_round_up(header, layout.header_alignment()))
        .ok_or(overflow.clone())?;
    let payload = round_up(bpp * SUPERBLOCK_PIXELS / 8, SUPERBLOCK_ALIGNMENT);
    let size = n_blocks
        .checked_mul(payload)
        .and_then(|body| body.checked_add(header))
        .ok_or(overflow)?;

    debug!(
        "afbc {} {width}x{height} -> {aligned_width}x{aligned_height} {:?}{}: \
         {n_blocks} superblocks, header {header}, payload {payload}, total {size}",
        info.format(),
        layout.block_size,
        if layout.tiled_header { " tiled" } else { "" },
    );

    Ok(size)
}

/// Smallest height, starting at `height`, whose linear size
/// `width * height * bpp / 8` can hold the AFBC buffer of the surface.
///
/// Dumb buffers are allocated from linear dimensions, so tools grow the
/// allocated height until the compressed layout fits.
pub fn virtual_height(
    format: impl FormatCode,
    width: u32,
    height: u32,
    layout: &AfbcLayout,
) -> Result<u32> {
    virtual_height_aligned(format, width, height, layout, 1)
}

/// [`virtual_height`] with the AFBC size first rounded up to
/// `size_alignment` bytes, e.g. 4096 to cover allocators that page-align
/// the buffer.
pub fn virtual_height_aligned(
    format: impl FormatCode,
    width: u32,
    height: u32,
    layout: &AfbcLayout,
    size_alignment: u64,
) -> Result<u32> {
    let info = FormatInfo::lookup(format)?;
    let bpp = info.nonzero_bits_per_pixel()? as u64;
    let size = afbc_size(info, width, height, layout)?;
    let size = checked_round_up(size, size_alignment.max(1))
        .ok_or(Error::InvalidDimensions { width, height })?;
    grow_height(size, width, height, bpp)
}

fn grow_height(afbc_size: u64, width: u32, height: u32, bpp: u64) -> Result<u32> {
    let invalid = Error::InvalidDimensions { width, height };
    if width == 0 {
        return Err(invalid);
    }

    let linear_size = |rows: u32| {
        (width as u64)
            .checked_mul(rows as u64)
            .and_then(|pixels| pixels.checked_mul(bpp))
            .map(|bits| bits / 8)
    };

    let mut virtual_height = height;
    while afbc_size > linear_size(virtual_height).ok_or(invalid.clone())? {
        virtual_height = virtual_height.checked_add(1).ok_or(invalid.clone())?;
        trace!("afbc size {afbc_size} does not fit {width}x{virtual_height} yet");
    }

    debug!("afbc virtual height for {width}x{height}: {virtual_height}");
    Ok(virtual_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drm_fourcc::DrmFourcc::{Abgr16161616f, Argb8888, Nv12, Rgb888};

    fn layout_16x16() -> AfbcLayout {
        AfbcLayout::new(BlockSize::Block16x16, false)
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(1000, 16), 1008);
        assert_eq!(round_up(1008, 16), 1008);
        assert_eq!(round_up(0, 64), 0);
        assert_eq!(round_up(1, 4096), 4096);
    }

    #[test]
    fn test_min_size_1080p_argb() {
        let size = min_size(Argb8888, 1920, 1080, &layout_16x16()).unwrap();
        assert_eq!(size, 8_428_800);
    }

    #[test]
    fn test_min_size_32x8() {
        // 1920x1080 is already 32x8 aligned: same superblock count as 16x16.
        let layout = AfbcLayout::new(BlockSize::Block32x8, false);
        assert_eq!(min_size(Argb8888, 1920, 1080, &layout).unwrap(), 8_428_800);
    }

    #[test]
    fn test_min_size_tiled_header() {
        // Alignment 128x128: 1920x1152 -> 8640 superblocks.
        // Header 138240 rounded to 4096 -> 139264.
        let layout = AfbcLayout::new(BlockSize::Block16x16, true);
        let size = min_size(Argb8888, 1920, 1080, &layout).unwrap();
        assert_eq!(size, 139_264 + 8640 * 1024);
    }

    #[test]
    fn test_min_size_rgb888_payload_alignment() {
        // 24 * 256 / 8 = 768, already 128-aligned.
        let size = min_size(Rgb888, 16, 16, &layout_16x16()).unwrap();
        assert_eq!(size, 64 + 768);
    }

    #[test]
    fn test_layout_from_modifier() {
        let modifier = Modifier::afbc(flags::BLOCK_SIZE_32X8 | flags::TILED | flags::SPARSE);
        let layout = AfbcLayout::from_modifier(modifier).unwrap();
        assert_eq!(layout.block_size, BlockSize::Block32x8);
        assert!(layout.tiled_header);
        assert_eq!(layout.alignment(), (256, 64));
        assert_eq!(layout.header_alignment(), 4096);
    }

    #[test]
    fn test_layout_rejects_other_geometries() {
        for block_size in [0, flags::BLOCK_SIZE_64X4, flags::BLOCK_SIZE_32X8_64X4, 0xf] {
            let result = AfbcLayout::try_from(Modifier::afbc(block_size));
            assert_eq!(result, Err(Error::UnsupportedBlockGeometry(block_size)));
        }
    }

    #[test]
    fn test_layout_rejects_non_afbc() {
        assert_eq!(
            AfbcLayout::from_modifier(Modifier::LINEAR),
            Err(Error::UnsupportedModifier(Modifier::LINEAR))
        );
    }

    #[test]
    fn test_virtual_height_nv12() {
        let layout = layout_16x16();
        let vh = virtual_height(Nv12, 1920, 1080, &layout).unwrap();
        // 8100 superblocks * (16 + 256) bytes = 2,203,200 bytes at 1920 B/row.
        assert_eq!(vh, 1148);
    }

    #[test]
    fn test_virtual_height_zero_width() {
        assert_eq!(
            virtual_height(Argb8888, 0, 16, &layout_16x16()),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn test_min_size_overflow() {
        let _ = env_logger::try_init();

        // u32::MAX rounds up to 2^32 columns and rows: 2^64 pixels.
        assert_eq!(
            min_size(Argb8888, u32::MAX, u32::MAX, &layout_16x16()),
            Err(Error::InvalidDimensions {
                width: u32::MAX,
                height: u32::MAX
            })
        );
        // 2^54 superblocks of 2048 bytes.
        assert_eq!(
            min_size(Abgr16161616f, 1 << 31, 1 << 31, &layout_16x16()),
            Err(Error::InvalidDimensions {
                width: 1 << 31,
                height: 1 << 31
            })
        );
    }

    #[test]
    fn test_virtual_height_overflow() {
        // The AFBC size fits but width * height * bpp does not.
        let layout = layout_16x16();
        assert!(min_size(Argb8888, 1 << 31, 1 << 29, &layout).is_ok());
        assert_eq!(
            virtual_height(Argb8888, 1 << 31, 1 << 29, &layout),
            Err(Error::InvalidDimensions {
                width: 1 << 31,
                height: 1 << 29
            })
        );
        assert_eq!(
            virtual_height_aligned(Argb8888, u32::MAX, u32::MAX, &layout, 4096),
            Err(Error::InvalidDimensions {
                width: u32::MAX,
                height: u32::MAX
            })
        );
    }
}
