// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Shared benchmark matrices for the buffer sizing benchmarks.

#![allow(dead_code)]

use drm_format::DrmFourcc;
use drm_format::modifier::{afbc as flags, Modifier};

// =============================================================================
// Resolution and format matrices
// =============================================================================

pub const RESOLUTIONS: &[(u32, u32)] = &[
    (640, 480),
    (1280, 720),
    (1920, 1080),
    (2592, 1944),
    (3840, 2160),
];

pub const RGB_FORMATS: &[DrmFourcc] = &[DrmFourcc::Argb8888, DrmFourcc::Rgb888, DrmFourcc::Rgb565];

pub const YUV_FORMATS: &[DrmFourcc] = &[
    DrmFourcc::Nv12,
    DrmFourcc::Nv15,
    DrmFourcc::Yuv420_8bit,
    DrmFourcc::Yuv420_10bit,
];

/// Formats at the front, middle and end of the format table.
pub const LOOKUP_FORMATS: &[DrmFourcc] = &[
    DrmFourcc::C8,
    DrmFourcc::Argb8888,
    DrmFourcc::Nv12,
    DrmFourcc::Q401,
];

pub const AFBC_MODIFIERS: &[Modifier] = &[
    Modifier::afbc(flags::BLOCK_SIZE_16X16),
    Modifier::afbc(flags::BLOCK_SIZE_32X8 | flags::SPARSE),
    Modifier::afbc(flags::BLOCK_SIZE_16X16 | flags::TILED),
    Modifier::afbc(flags::BLOCK_SIZE_32X8 | flags::TILED | flags::SPARSE),
];

/// Formats benchmarked against every AFBC modifier.
pub fn afbc_formats() -> impl Iterator<Item = DrmFourcc> {
    RGB_FORMATS.iter().chain(YUV_FORMATS).copied()
}

// =============================================================================
// Benchmark configuration
// =============================================================================

#[derive(Clone, Copy)]
pub struct BenchConfig {
    pub width: u32,
    pub height: u32,
    pub format: DrmFourcc,
    pub modifier: Modifier,
}

impl BenchConfig {
    pub fn new(width: u32, height: u32, format: DrmFourcc, modifier: Modifier) -> Self {
        Self {
            width,
            height,
            format,
            modifier,
        }
    }

    pub fn id(&self) -> String {
        format!("{}x{}/{}", self.width, self.height, self.format)
    }

    /// Criterion group label for the modifier, e.g. `16x16-tiled`.
    pub fn modifier_name(&self) -> String {
        let afbc_flags = self.modifier.afbc_flags();
        let block = match afbc_flags & flags::BLOCK_SIZE_MASK {
            flags::BLOCK_SIZE_16X16 => "16x16",
            flags::BLOCK_SIZE_32X8 => "32x8",
            _ => "linear",
        };
        if afbc_flags & flags::TILED != 0 {
            format!("{block}-tiled")
        } else {
            block.to_string()
        }
    }
}
