// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! DRM pixel format metadata and buffer sizing for display test tools.
//!
//! The crate answers the questions a KMS test tool asks before it allocates
//! or dumps a framebuffer:
//!
//! - what a fourcc format looks like ([`FormatInfo`], [`bits_per_pixel`]),
//! - how large an AFBC compressed buffer must be ([`afbc::min_size`]),
//! - how tall a linear dumb buffer must be to hold a multi-planar or
//!   compressed surface ([`DumbRequest::for_format`]),
//! - what to call a dumped plane ([`DumpTarget`]).
//!
//! Everything except [`DumbBuffer`] is pure computation over a static
//! table and may be called from any thread.
//!
//! ```
//! use drm_format::afbc::{self, AfbcLayout};
//! use drm_format::modifier::{afbc as flags, Modifier};
//! use drm_format::DrmFourcc;
//!
//! let layout = AfbcLayout::from_modifier(Modifier::afbc(flags::BLOCK_SIZE_16X16))?;
//! assert_eq!(afbc::min_size(DrmFourcc::Argb8888, 1920, 1080, &layout)?, 8_428_800);
//! # Ok::<(), drm_format::Error>(())
//! ```

pub mod afbc;
pub mod dump;
pub mod dumb;
mod error;
pub mod format;
pub mod layout;
pub mod modifier;

pub use afbc::{AfbcLayout, BlockSize};
pub use dump::DumpTarget;
pub use dumb::{DumbBuffer, DumbRequest};
pub use error::{Error, Result};
pub use drm_fourcc::{DrmFourcc, DrmModifier, DrmVendor};
pub use format::{bits_per_pixel, FormatCode, FormatInfo};
pub use layout::{buffer_size, PlaneLayout};
pub use modifier::Modifier;
