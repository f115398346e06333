// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Pixel format table.
//!
//! Every format the display tools understand has one [`FormatInfo`] entry
//! describing its planes. Planes are described in block form: a block is
//! `block_width x block_height` pixels stored in `char_per_block` bytes.
//! Non-block formats leave the block size unset, which reads as 1x1, so
//! `char_per_block` is then simply bytes per pixel.

use drm_fourcc::DrmFourcc;

use crate::error::{Error, Result};

/// A DRM format code: either a raw `u32` as read back from the kernel or
/// a [`DrmFourcc`].
pub trait FormatCode: Copy {
    fn code(self) -> u32;
}

impl FormatCode for u32 {
    fn code(self) -> u32 {
        self
    }
}

impl FormatCode for DrmFourcc {
    fn code(self) -> u32 {
        self as u32
    }
}

/// Geometric description of a DRM pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    format: DrmFourcc,
    depth: u8,
    num_planes: u8,
    char_per_block: [u8; 3],
    block_w: [u8; 3],
    block_h: [u8; 3],
    hsub: u8,
    vsub: u8,
    has_alpha: bool,
    is_yuv: bool,
}

impl FormatInfo {
    const fn new(
        format: DrmFourcc,
        depth: u8,
        num_planes: u8,
        char_per_block: [u8; 3],
        hsub: u8,
        vsub: u8,
    ) -> Self {
        FormatInfo {
            format,
            depth,
            num_planes,
            char_per_block,
            block_w: [0; 3],
            block_h: [0; 3],
            hsub,
            vsub,
            has_alpha: false,
            is_yuv: false,
        }
    }

    const fn blocks(mut self, block_w: [u8; 3], block_h: [u8; 3]) -> Self {
        self.block_w = block_w;
        self.block_h = block_h;
        self
    }

    const fn alpha(mut self) -> Self {
        self.has_alpha = true;
        self
    }

    const fn yuv(mut self) -> Self {
        self.is_yuv = true;
        self
    }

    /// Looks up the description of `format`.
    ///
    /// Codes that are not fourccs at all, and fourccs missing from the
    /// table, are both reported as [`Error::UnknownFormat`] so a tool can
    /// skip the buffer and carry on.
    pub fn lookup(format: impl FormatCode) -> Result<&'static FormatInfo> {
        let code = format.code();
        let format = DrmFourcc::try_from(code).map_err(|_| Error::UnknownFormat(code))?;
        FORMATS
            .iter()
            .find(|info| info.format == format)
            .ok_or(Error::UnknownFormat(code))
    }

    /// All formats in the table.
    pub fn all() -> impl Iterator<Item = &'static FormatInfo> {
        FORMATS.iter()
    }

    pub fn format(&self) -> DrmFourcc {
        self.format
    }

    /// Legacy colour depth for RGB formats, 0 when not applicable.
    pub fn depth(&self) -> u32 {
        self.depth as u32
    }

    pub fn num_planes(&self) -> usize {
        self.num_planes as usize
    }

    /// Bytes per block of `plane`, 0 for a plane the format does not have.
    pub fn char_per_block(&self, plane: usize) -> u32 {
        if plane >= self.num_planes() {
            return 0;
        }
        self.char_per_block[plane] as u32
    }

    /// Block width in pixels of `plane`.
    ///
    /// Returns 0 for a plane the format does not have and 1 when the
    /// format is not a block format.
    pub fn block_width(&self, plane: usize) -> u32 {
        if plane >= self.num_planes() {
            return 0;
        }
        match self.block_w[plane] {
            0 => 1,
            w => w as u32,
        }
    }

    /// Block height in pixels of `plane`, see [`FormatInfo::block_width`].
    pub fn block_height(&self, plane: usize) -> u32 {
        if plane >= self.num_planes() {
            return 0;
        }
        match self.block_h[plane] {
            0 => 1,
            h => h as u32,
        }
    }

    /// Bits per pixel of `plane`, truncated to an integer.
    ///
    /// Returns 0 for a plane the format does not have.
    pub fn bpp(&self, plane: usize) -> u32 {
        if plane >= self.num_planes() {
            return 0;
        }
        self.char_per_block(plane) * 8 / (self.block_width(plane) * self.block_height(plane))
    }

    /// Bits per pixel used to size buffers of this format.
    ///
    /// This is the plane 0 value, except for the packed 4:2:0 and 10-bit
    /// formats whose table entries cannot express their density.
    pub fn bits_per_pixel(&self) -> u32 {
        match self.format {
            DrmFourcc::Yuv420_8bit => 12,
            DrmFourcc::Yuv420_10bit => 15,
            DrmFourcc::Vuy101010 => 30,
            _ => self.bpp(0),
        }
    }

    /// [`FormatInfo::bits_per_pixel`] for callers about to divide by it.
    pub(crate) fn nonzero_bits_per_pixel(&self) -> Result<u32> {
        match self.bits_per_pixel() {
            0 => Err(Error::ZeroBitsPerPixel(self.format)),
            bpp => Ok(bpp),
        }
    }

    pub fn hsub(&self) -> u32 {
        self.hsub as u32
    }

    pub fn vsub(&self) -> u32 {
        self.vsub as u32
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn is_yuv(&self) -> bool {
        self.is_yuv
    }
}

impl TryFrom<DrmFourcc> for &'static FormatInfo {
    type Error = Error;

    fn try_from(format: DrmFourcc) -> Result<Self> {
        FormatInfo::lookup(format)
    }
}

/// Bits per pixel of `format`, see [`FormatInfo::bits_per_pixel`].
pub fn bits_per_pixel(format: impl FormatCode) -> Result<u32> {
    Ok(FormatInfo::lookup(format)?.bits_per_pixel())
}

// =============================================================================
// Format table
// =============================================================================

use DrmFourcc::*;

#[rustfmt::skip]
static FORMATS: &[FormatInfo] = &[
    FormatInfo::new(C8,                   8,  1, [1, 0, 0], 1, 1),
    FormatInfo::new(Rgb332,               8,  1, [1, 0, 0], 1, 1),
    FormatInfo::new(Bgr233,               8,  1, [1, 0, 0], 1, 1),
    FormatInfo::new(Xrgb4444,             0,  1, [2, 0, 0], 1, 1),
    FormatInfo::new(Xbgr4444,             0,  1, [2, 0, 0], 1, 1),
    FormatInfo::new(Rgbx4444,             0,  1, [2, 0, 0], 1, 1),
    FormatInfo::new(Bgrx4444,             0,  1, [2, 0, 0], 1, 1),
    FormatInfo::new(Argb4444,             0,  1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Abgr4444,             0,  1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgba4444,             0,  1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Bgra4444,             0,  1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Xrgb1555,             15, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Xbgr1555,             15, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Rgbx5551,             15, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Bgrx5551,             15, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Argb1555,             15, 1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Abgr1555,             15, 1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgba5551,             15, 1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Bgra5551,             15, 1, [2, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgb565,               16, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Bgr565,               16, 1, [2, 0, 0], 1, 1),
    FormatInfo::new(Rgb888,               24, 1, [3, 0, 0], 1, 1),
    FormatInfo::new(Bgr888,               24, 1, [3, 0, 0], 1, 1),
    FormatInfo::new(Xrgb8888,             24, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Xbgr8888,             24, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Rgbx8888,             24, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Bgrx8888,             24, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Rgb565_a8,            24, 2, [2, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Bgr565_a8,            24, 2, [2, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Xrgb2101010,          30, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Xbgr2101010,          30, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Rgbx1010102,          30, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Bgrx1010102,          30, 1, [4, 0, 0], 1, 1),
    FormatInfo::new(Argb2101010,          30, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Abgr2101010,          30, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgba1010102,          30, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Bgra1010102,          30, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Argb8888,             32, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Abgr8888,             32, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgba8888,             32, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Bgra8888,             32, 1, [4, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Xrgb16161616f,        0,  1, [8, 0, 0], 1, 1),
    FormatInfo::new(Xbgr16161616f,        0,  1, [8, 0, 0], 1, 1),
    FormatInfo::new(Argb16161616f,        0,  1, [8, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Abgr16161616f,        0,  1, [8, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Axbxgxrx106106106106, 0,  1, [8, 0, 0], 1, 1).alpha(),
    FormatInfo::new(Rgb888_a8,            32, 2, [3, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Bgr888_a8,            32, 2, [3, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Xrgb8888_a8,          32, 2, [4, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Xbgr8888_a8,          32, 2, [4, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Rgbx8888_a8,          32, 2, [4, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Bgrx8888_a8,          32, 2, [4, 1, 0], 1, 1).alpha(),
    FormatInfo::new(Yuv410,               0,  3, [1, 1, 1], 4, 4).yuv(),
    FormatInfo::new(Yvu410,               0,  3, [1, 1, 1], 4, 4).yuv(),
    FormatInfo::new(Yuv411,               0,  3, [1, 1, 1], 4, 1).yuv(),
    FormatInfo::new(Yvu411,               0,  3, [1, 1, 1], 4, 1).yuv(),
    FormatInfo::new(Yuv420,               0,  3, [1, 1, 1], 2, 2).yuv(),
    FormatInfo::new(Yvu420,               0,  3, [1, 1, 1], 2, 2).yuv(),
    FormatInfo::new(Yuv422,               0,  3, [1, 1, 1], 2, 1).yuv(),
    FormatInfo::new(Yvu422,               0,  3, [1, 1, 1], 2, 1).yuv(),
    FormatInfo::new(Yuv444,               0,  3, [1, 1, 1], 1, 1).yuv(),
    FormatInfo::new(Yvu444,               0,  3, [1, 1, 1], 1, 1).yuv(),
    FormatInfo::new(Nv12,                 0,  2, [1, 2, 0], 2, 2).yuv(),
    FormatInfo::new(Nv21,                 0,  2, [1, 2, 0], 2, 2).yuv(),
    FormatInfo::new(Nv16,                 0,  2, [1, 2, 0], 2, 1).yuv(),
    FormatInfo::new(Nv61,                 0,  2, [1, 2, 0], 2, 1).yuv(),
    FormatInfo::new(Nv24,                 0,  2, [1, 2, 0], 1, 1).yuv(),
    FormatInfo::new(Nv42,                 0,  2, [1, 2, 0], 1, 1).yuv(),
    FormatInfo::new(Yuyv,                 0,  1, [2, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Yvyu,                 0,  1, [2, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Uyvy,                 0,  1, [2, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Vyuy,                 0,  1, [2, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Xyuv8888,             0,  1, [4, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Vuy888,               0,  1, [3, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Ayuv,                 0,  1, [4, 0, 0], 1, 1).alpha().yuv(),
    FormatInfo::new(Y210,                 0,  1, [4, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Y212,                 0,  1, [4, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Y216,                 0,  1, [4, 0, 0], 2, 1).yuv(),
    FormatInfo::new(Y410,                 0,  1, [4, 0, 0], 1, 1).alpha().yuv(),
    FormatInfo::new(Y412,                 0,  1, [8, 0, 0], 1, 1).alpha().yuv(),
    FormatInfo::new(Y416,                 0,  1, [8, 0, 0], 1, 1).alpha().yuv(),
    FormatInfo::new(Xvyu2101010,          0,  1, [4, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Xvyu12_16161616,      0,  1, [8, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Xvyu16161616,         0,  1, [8, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Y0l0,                 0,  1, [8, 0, 0], 2, 2).blocks([2, 0, 0], [2, 0, 0]).alpha().yuv(),
    FormatInfo::new(X0l0,                 0,  1, [8, 0, 0], 2, 2).blocks([2, 0, 0], [2, 0, 0]).yuv(),
    FormatInfo::new(Y0l2,                 0,  1, [8, 0, 0], 2, 2).blocks([2, 0, 0], [2, 0, 0]).alpha().yuv(),
    FormatInfo::new(X0l2,                 0,  1, [8, 0, 0], 2, 2).blocks([2, 0, 0], [2, 0, 0]).yuv(),
    FormatInfo::new(P010,                 0,  2, [2, 4, 0], 2, 2).blocks([1, 1, 0], [1, 1, 0]).yuv(),
    FormatInfo::new(P012,                 0,  2, [2, 4, 0], 2, 2).blocks([1, 1, 0], [1, 1, 0]).yuv(),
    FormatInfo::new(P016,                 0,  2, [2, 4, 0], 2, 2).blocks([1, 1, 0], [1, 1, 0]).yuv(),
    FormatInfo::new(P210,                 0,  2, [2, 4, 0], 2, 1).blocks([1, 1, 0], [1, 1, 0]).yuv(),
    // Compressed-only layouts: the zero entries are resolved by bits_per_pixel().
    FormatInfo::new(Vuy101010,            0,  1, [0, 0, 0], 1, 1).yuv(),
    FormatInfo::new(Yuv420_8bit,          0,  1, [0, 0, 0], 2, 2).yuv(),
    FormatInfo::new(Yuv420_10bit,         0,  1, [0, 0, 0], 2, 2).yuv(),
    FormatInfo::new(Nv15,                 0,  2, [5, 5, 0], 2, 2).blocks([4, 2, 0], [1, 1, 0]).yuv(),
    // Subsampling is recorded as 0 for the Q4xx formats.
    FormatInfo::new(Q410,                 0,  3, [2, 2, 2], 0, 0).blocks([1, 1, 1], [1, 1, 1]).yuv(),
    FormatInfo::new(Q401,                 0,  3, [2, 2, 2], 0, 0).blocks([1, 1, 1], [1, 1, 1]).yuv(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_format() {
        let info = FormatInfo::lookup(DrmFourcc::Xrgb8888).unwrap();
        assert_eq!(info.format(), DrmFourcc::Xrgb8888);
        assert_eq!(info.depth(), 24);
        assert_eq!(info.num_planes(), 1);
        assert_eq!(info.bpp(0), 32);
        assert!(!info.has_alpha());
        assert!(!info.is_yuv());
    }

    #[test]
    fn test_lookup_raw_code() {
        // 'X' | 'R' << 8 | '2' << 16 | '4' << 24
        let info = FormatInfo::lookup(0x3432_5258u32).unwrap();
        assert_eq!(info.format(), DrmFourcc::Xrgb8888);
    }

    #[test]
    fn test_lookup_unknown_format() {
        let unknown = u32::from_le_bytes(*b"XXXX");
        assert_eq!(FormatInfo::lookup(unknown), Err(Error::UnknownFormat(unknown)));
        assert_eq!(FormatInfo::lookup(0u32), Err(Error::UnknownFormat(0)));
    }

    #[test]
    fn test_lookup_fourcc_missing_from_table() {
        // A valid fourcc the display tools do not handle.
        assert_eq!(
            <&FormatInfo>::try_from(DrmFourcc::R8),
            Err(Error::UnknownFormat(DrmFourcc::R8 as u32))
        );
    }

    #[test]
    fn test_block_dimensions_default_to_one() {
        let nv12 = FormatInfo::lookup(DrmFourcc::Nv12).unwrap();
        assert_eq!(nv12.block_width(0), 1);
        assert_eq!(nv12.block_height(1), 1);
        assert_eq!(nv12.bpp(1), 16);

        let y0l0 = FormatInfo::lookup(DrmFourcc::Y0l0).unwrap();
        assert_eq!(y0l0.block_width(0), 2);
        assert_eq!(y0l0.block_height(0), 2);
        assert_eq!(y0l0.bpp(0), 16);
    }

    #[test]
    fn test_out_of_range_plane_is_zero() {
        let info = FormatInfo::lookup(DrmFourcc::Argb8888).unwrap();
        assert_eq!(info.block_width(1), 0);
        assert_eq!(info.block_height(3), 0);
        assert_eq!(info.char_per_block(2), 0);
        assert_eq!(info.bpp(1), 0);
    }

    #[test]
    fn test_nv15_block_bpp() {
        let info = FormatInfo::lookup(DrmFourcc::Nv15).unwrap();
        assert_eq!(info.bpp(0), 10);
        assert_eq!(info.bpp(1), 20);
    }

    #[test]
    fn test_bits_per_pixel_overrides() {
        assert_eq!(bits_per_pixel(DrmFourcc::Yuv420_8bit), Ok(12));
        assert_eq!(bits_per_pixel(DrmFourcc::Yuv420_10bit), Ok(15));
        assert_eq!(bits_per_pixel(DrmFourcc::Vuy101010), Ok(30));
        assert_eq!(bits_per_pixel(DrmFourcc::Rgb565), Ok(16));
        assert_eq!(bits_per_pixel(DrmFourcc::Nv12), Ok(8));
    }

    #[test]
    fn test_nonzero_bits_per_pixel() {
        let info = FormatInfo::lookup(DrmFourcc::Abgr8888).unwrap();
        assert_eq!(info.nonzero_bits_per_pixel(), Ok(32));
        assert_eq!(bits_per_pixel(0u32), Err(Error::UnknownFormat(0)));
    }
}
