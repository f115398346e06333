// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Linear plane layout and buffer sizing for any modifier.

use log::debug;

use drm_fourcc::DrmFourcc;

use crate::afbc::{self, AfbcLayout};
use crate::error::{Error, Result};
use crate::format::{FormatCode, FormatInfo};
use crate::modifier::Modifier;

/// Chroma subsampling of `plane`; plane 0 is never subsampled and a
/// factor recorded as 0 counts as 1.
fn subsampling(info: &FormatInfo, plane: usize) -> (u64, u64) {
    if plane == 0 {
        return (1, 1);
    }
    (info.hsub().max(1) as u64, info.vsub().max(1) as u64)
}

/// Minimum bytes per row of `plane` for a surface `width` pixels wide.
pub fn min_pitch(info: &FormatInfo, plane: usize, width: u32) -> u64 {
    if plane >= info.num_planes() {
        return 0;
    }
    let (hsub, _) = subsampling(info, plane);
    let plane_width = (width as u64).div_ceil(hsub);
    plane_width.div_ceil(info.block_width(plane) as u64) * info.char_per_block(plane) as u64
}

/// Rows of blocks in `plane` for a surface `height` pixels tall.
pub fn plane_rows(info: &FormatInfo, plane: usize, height: u32) -> u64 {
    if plane >= info.num_planes() {
        return 0;
    }
    let (_, vsub) = subsampling(info, plane);
    let plane_height = (height as u64).div_ceil(vsub);
    plane_height.div_ceil(info.block_height(plane) as u64)
}

/// Size in bytes of a tightly packed linear buffer.
pub fn linear_size(format: impl FormatCode, width: u32, height: u32) -> Result<u64> {
    let info = FormatInfo::lookup(format)?;
    let overflow = Error::InvalidDimensions { width, height };

    // Compressed-only formats have no per-plane layout; use the overall density.
    if info.char_per_block(0) == 0 {
        let bpp = info.nonzero_bits_per_pixel()? as u64;
        return (width as u64 * bpp)
            .div_ceil(8)
            .checked_mul(height as u64)
            .ok_or(overflow);
    }

    (0..info.num_planes()).try_fold(0u64, |size, plane| {
        min_pitch(info, plane, width)
            .checked_mul(plane_rows(info, plane, height))
            .and_then(|plane_size| size.checked_add(plane_size))
            .ok_or(overflow.clone())
    })
}

/// Minimum buffer size for a surface stored with `modifier`.
///
/// Linear and invalid modifiers give [`linear_size`], AFBC modifiers give
/// [`afbc::min_size`]. Any other modifier is rejected.
pub fn buffer_size(
    format: impl FormatCode,
    width: u32,
    height: u32,
    modifier: Modifier,
) -> Result<u64> {
    let size = if modifier.is_linear() {
        linear_size(format, width, height)?
    } else {
        let layout = AfbcLayout::from_modifier(modifier)?;
        afbc::min_size(format, width, height, &layout)?
    };
    debug!("buffer size 0x{:08x} {width}x{height} {modifier}: {size}", format.code());
    Ok(size)
}

/// Pitches and offsets of each plane inside a single buffer object, as
/// passed to `drmModeAddFB2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneLayout {
    pub num_planes: usize,
    pub pitches: [u32; 4],
    pub offsets: [u32; 4],
}

impl PlaneLayout {
    /// Lays the planes of `info` out back to back below plane 0.
    ///
    /// `pitch` is the plane 0 pitch reported by the allocator and
    /// `height` the visible height. The pitch of a chroma plane follows
    /// its bits-per-pixel relative to plane 0, so NV12 reuses the luma
    /// pitch, NV24 doubles it and YUV420 halves it.
    ///
    /// Offsets past 4 GiB cannot be expressed to the kernel and are
    /// reported as [`Error::InvalidDimensions`].
    pub fn for_format(info: &FormatInfo, pitch: u32, height: u32) -> Result<Self> {
        let overflow = Error::InvalidDimensions {
            width: pitch,
            height,
        };
        let mut layout = PlaneLayout {
            num_planes: info.num_planes(),
            ..Default::default()
        };
        layout.pitches[0] = pitch;

        let bpp0 = info.bpp(0) as u64;
        let mut offset = 0u64;
        let mut rows = height as u64;
        let mut prev_pitch = pitch as u64;
        for plane in 1..info.num_planes() {
            let (hsub, vsub) = subsampling(info, plane);
            let plane_pitch = if bpp0 == 0 {
                pitch as u64
            } else {
                pitch as u64 * info.bpp(plane) as u64 / (bpp0 * hsub)
            };
            offset += prev_pitch * rows;
            layout.pitches[plane] = u32::try_from(plane_pitch).map_err(|_| overflow.clone())?;
            layout.offsets[plane] = u32::try_from(offset).map_err(|_| overflow.clone())?;
            prev_pitch = plane_pitch;
            rows = height as u64 / vsub;
        }
        Ok(layout)
    }
}

/// Height of a single-plane allocation that can hold every plane of
/// `info`, in rows of plane 0.
///
/// NV12 needs 3/2 of the visible height, NV16 twice and NV24 three times.
/// The packed 4:2:0 formats are given 3/2 and Y210 twice the height, like
/// the planar formats they are converted from.
pub fn linear_virtual_height(info: &FormatInfo, height: u32) -> u64 {
    let height = height as u64;
    match info.format() {
        DrmFourcc::Yuv420_8bit | DrmFourcc::Yuv420_10bit => return height * 3 / 2,
        DrmFourcc::Y210 => return height * 2,
        _ => {}
    }

    let bpp0 = info.bpp(0) as u64;
    if bpp0 == 0 {
        return height;
    }
    // Per-plane share of a plane 0 row, in sixteenths.
    let sixteenths: u64 = (0..info.num_planes())
        .map(|plane| {
            let (hsub, vsub) = subsampling(info, plane);
            16 * info.bpp(plane) as u64 / (bpp0 * hsub * vsub)
        })
        .sum();
    height * sixteenths / 16
}
