// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Dumb buffer allocation.
//!
//! Dumb buffers are allocated from linear dimensions only: width, height
//! and bits per pixel. Multi-planar and AFBC surfaces are fitted into them
//! by growing the allocated height, see [`DumbRequest::for_format`].

use std::os::fd::{AsRawFd, BorrowedFd};

use log::{debug, warn};
use nix::errno::Errno;

use crate::afbc::{self, round_up, AfbcLayout};
use crate::error::{Error, Result};
use crate::format::{FormatCode, FormatInfo};
use crate::layout::{linear_virtual_height, PlaneLayout};
use crate::modifier::Modifier;

/// Allocators page-align buffers, so AFBC sizes are rounded to a page
/// before fitting them into the linear allocation.
pub const PAGE_SIZE: u64 = 4096;

// =============================================================================
// DRM ioctl bindings (drm.h / drm_mode.h)
// =============================================================================

mod ioctl {
    use nix::ioctl_readwrite;

    const DRM_IOCTL_BASE: u8 = b'd';

    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct DrmModeCreateDumb {
        pub height: u32,
        pub width: u32,
        pub bpp: u32,
        pub flags: u32,
        pub handle: u32,
        pub pitch: u32,
        pub size: u64,
    }

    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct DrmModeMapDumb {
        pub handle: u32,
        pub pad: u32,
        pub offset: u64,
    }

    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct DrmModeDestroyDumb {
        pub handle: u32,
    }

    ioctl_readwrite!(
        /// DRM_IOCTL_MODE_CREATE_DUMB
        drm_mode_create_dumb,
        DRM_IOCTL_BASE,
        0xb2,
        DrmModeCreateDumb
    );
    ioctl_readwrite!(
        /// DRM_IOCTL_MODE_MAP_DUMB
        drm_mode_map_dumb,
        DRM_IOCTL_BASE,
        0xb3,
        DrmModeMapDumb
    );
    ioctl_readwrite!(
        /// DRM_IOCTL_MODE_DESTROY_DUMB
        drm_mode_destroy_dumb,
        DRM_IOCTL_BASE,
        0xb4,
        DrmModeDestroyDumb
    );
}

use ioctl::*;

/// Runs an ioctl, restarting it when interrupted the way libdrm does.
fn retry_ioctl(mut op: impl FnMut() -> nix::Result<i32>) -> Result<i32> {
    loop {
        match op() {
            Err(Errno::EINTR) | Err(Errno::EAGAIN) => continue,
            result => return Ok(result?),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Input of `DRM_IOCTL_MODE_CREATE_DUMB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumbRequest {
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    pub flags: u32,
}

impl DumbRequest {
    /// Request large enough for a `width` x `height` surface of `format`
    /// stored with `modifier`.
    ///
    /// The bits per pixel are those of plane 0. Chroma planes of
    /// multi-planar formats are placed below plane 0, so the height is
    /// scaled to cover them. For AFBC modifiers the height then grows until
    /// the page-aligned compressed size fits.
    pub fn for_format(
        format: impl FormatCode,
        width: u32,
        height: u32,
        modifier: Modifier,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let info = FormatInfo::lookup(format)?;
        let bpp = info.nonzero_bits_per_pixel()?;
        let linear_height = linear_virtual_height(info, height);
        let mut virtual_height =
            u32::try_from(linear_height).map_err(|_| Error::InvalidDimensions { width, height })?;

        if !modifier.is_linear() {
            let layout = AfbcLayout::from_modifier(modifier)?;
            virtual_height =
                afbc::virtual_height_aligned(format, width, virtual_height, &layout, PAGE_SIZE)?;
        }

        debug!(
            "dumb request {} {width}x{height} {modifier}: bpp {bpp}, height {virtual_height}",
            info.format()
        );
        Ok(DumbRequest {
            width,
            height: virtual_height,
            bpp,
            flags: 0,
        })
    }

    /// Request for an untyped allocation of at least `len` bytes, rounded
    /// up to `align`, laid out as a single row of 8-bit pixels.
    pub fn for_byte_len(len: u32, align: u32) -> Result<Self> {
        let width = round_up(len as u64, align.max(1) as u64);
        let width = u32::try_from(width).map_err(|_| Error::InvalidDimensions {
            width: len,
            height: 1,
        })?;
        if width == 0 {
            return Err(Error::InvalidDimensions { width, height: 1 });
        }
        Ok(DumbRequest {
            width,
            height: 1,
            bpp: 8,
            flags: 0,
        })
    }

    /// Allocation heap flags, passed through to the driver.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }
}

// =============================================================================
// Buffers
// =============================================================================

/// A dumb buffer owned by a DRM device file descriptor.
///
/// The buffer is destroyed when dropped.
#[derive(Debug)]
pub struct DumbBuffer<'fd> {
    fd: BorrowedFd<'fd>,
    handle: u32,
    pitch: u32,
    size: u64,
    bpp: u32,
}

impl<'fd> DumbBuffer<'fd> {
    pub fn create(fd: BorrowedFd<'fd>, request: &DumbRequest) -> Result<Self> {
        let mut arg = DrmModeCreateDumb {
            height: request.height,
            width: request.width,
            bpp: request.bpp,
            flags: request.flags,
            ..Default::default()
        };
        // SAFETY: `arg` is a live, correctly laid out drm_mode_create_dumb.
        retry_ioctl(|| unsafe { drm_mode_create_dumb(fd.as_raw_fd(), &mut arg) })?;

        debug!(
            "created dumb buffer {} ({}x{}@{}): pitch {}, size {}",
            arg.handle, request.width, request.height, request.bpp, arg.pitch, arg.size
        );
        Ok(DumbBuffer {
            fd,
            handle: arg.handle,
            pitch: arg.pitch,
            size: arg.size,
            bpp: request.bpp,
        })
    }

    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Width in pixels implied by the pitch the driver chose.
    pub fn virtual_width(&self) -> u32 {
        (self.pitch as u64 * 8 / self.bpp.max(1) as u64) as u32
    }

    /// Plane pitches and offsets for a `height`-row surface of `info`
    /// stored in this buffer.
    pub fn plane_layout(&self, info: &FormatInfo, height: u32) -> Result<PlaneLayout> {
        PlaneLayout::for_format(info, self.pitch, height)
    }

    /// Offset to pass to `mmap` on the device to map this buffer.
    pub fn map_offset(&self) -> Result<u64> {
        let mut arg = DrmModeMapDumb {
            handle: self.handle,
            ..Default::default()
        };
        // SAFETY: `arg` is a live, correctly laid out drm_mode_map_dumb.
        retry_ioctl(|| unsafe { drm_mode_map_dumb(self.fd.as_raw_fd(), &mut arg) })?;
        Ok(arg.offset)
    }
}

impl Drop for DumbBuffer<'_> {
    fn drop(&mut self) {
        let mut arg = DrmModeDestroyDumb {
            handle: self.handle,
        };
        // SAFETY: `arg` is a live, correctly laid out drm_mode_destroy_dumb.
        let result =
            retry_ioctl(|| unsafe { drm_mode_destroy_dumb(self.fd.as_raw_fd(), &mut arg) });
        if let Err(err) = result {
            warn!("failed to destroy dumb buffer {}: {err}", self.handle);
        }
    }
}
