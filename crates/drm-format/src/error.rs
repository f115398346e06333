// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use drm_fourcc::DrmFourcc;

use crate::modifier::Modifier;

/// Result alias used by every fallible operation in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by format lookup, buffer sizing and dumb-buffer ioctls.
///
/// None of these are fatal to a diagnostic tool: the expected reaction is
/// to print the error and skip the affected buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The format code is not present in the format table. Carries the raw
    /// code, which need not be a recognised fourcc.
    UnknownFormat(u32),
    /// The AFBC block-size field of a modifier is not 16x16 or 32x8.
    UnsupportedBlockGeometry(u64),
    /// The format resolved to zero bits per pixel.
    ZeroBitsPerPixel(DrmFourcc),
    /// The modifier is neither linear nor AFBC.
    UnsupportedModifier(Modifier),
    /// A zero dimension, or dimensions whose sizes do not fit in 64 bits.
    InvalidDimensions { width: u32, height: u32 },
    /// An ioctl on the DRM device failed.
    Io(nix::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownFormat(code) => match DrmFourcc::try_from(*code) {
                Ok(format) => write!(f, "unsupported format {format} (0x{code:08x})"),
                Err(_) => write!(f, "unsupported format 0x{code:08x}"),
            },
            Error::UnsupportedBlockGeometry(block_size) => {
                write!(f, "invalid AFBC_FORMAT_MOD_BLOCK_SIZE: {block_size}")
            }
            Error::ZeroBitsPerPixel(format) => {
                write!(f, "format {format} has no bits-per-pixel value")
            }
            Error::UnsupportedModifier(modifier) => {
                write!(f, "unsupported modifier {modifier} (0x{:016x})", modifier.as_u64())
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "invalid buffer dimensions {width}x{height}")
            }
            Error::Io(err) => write!(f, "DRM ioctl failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<nix::Error> for Error {
    fn from(err: nix::Error) -> Self {
        Error::Io(err)
    }
}
