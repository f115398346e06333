// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! DRM format modifiers.
//!
//! A modifier is a 64-bit value whose top byte names the vendor and whose
//! low 56 bits are vendor defined. Only the ARM AFBC family changes how
//! much memory a buffer needs; everything else is decoded for display only.

use std::fmt;

use drm_fourcc::{DrmModifier, DrmVendor};

/// AFBC flags carried in the low bits of an ARM AFBC modifier.
pub mod afbc {
    pub const BLOCK_SIZE_MASK: u64 = 0xf;
    pub const BLOCK_SIZE_16X16: u64 = 1;
    pub const BLOCK_SIZE_32X8: u64 = 2;
    pub const BLOCK_SIZE_64X4: u64 = 3;
    pub const BLOCK_SIZE_32X8_64X4: u64 = 4;

    pub const YTR: u64 = 1 << 4;
    pub const SPLIT: u64 = 1 << 5;
    pub const SPARSE: u64 = 1 << 6;
    pub const CBR: u64 = 1 << 7;
    pub const TILED: u64 = 1 << 8;
    pub const SC: u64 = 1 << 9;
    pub const DB: u64 = 1 << 10;
    pub const BCH: u64 = 1 << 11;
    pub const USM: u64 = 1 << 12;
}

const VALUE_MASK: u64 = 0x00ff_ffff_ffff_ffff;
const ARM_TYPE_AFBC: u64 = 0x00;
const ARM_TYPE_SHIFT: u32 = 52;
const ARM_VALUE_MASK: u64 = 0x000f_ffff_ffff_ffff;

/// A DRM format modifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifier(u64);

impl Modifier {
    /// Plain row-major layout.
    pub const LINEAR: Modifier = Modifier(0);
    /// No modifier was supplied.
    pub const INVALID: Modifier = Modifier(VALUE_MASK);

    pub const fn from_u64(value: u64) -> Self {
        Modifier(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Builds `fourcc_mod_code(vendor, value)`.
    pub const fn vendor_code(vendor: DrmVendor, value: u64) -> Self {
        Modifier(((vendor as u64) << 56) | (value & VALUE_MASK))
    }

    /// Builds `DRM_FORMAT_MOD_ARM_AFBC(flags)`.
    pub const fn afbc(flags: u64) -> Self {
        Self::vendor_code(
            DrmVendor::Arm,
            (ARM_TYPE_AFBC << ARM_TYPE_SHIFT) | (flags & ARM_VALUE_MASK),
        )
    }

    /// Raw vendor byte, bits 56..64.
    pub const fn vendor_id(self) -> u8 {
        (self.0 >> 56) as u8
    }

    /// The vendor-specific part of the modifier.
    pub const fn value(self) -> u64 {
        self.0 & VALUE_MASK
    }

    /// The vendor, `None` for vendor ids unknown to `drm-fourcc`.
    pub fn vendor(self) -> Option<DrmVendor> {
        DrmVendor::try_from(self.vendor_id()).ok()
    }

    /// True for modifiers that leave the buffer uncompressed and row-major.
    pub fn is_linear(self) -> bool {
        matches!(DrmModifier::from(self.0), DrmModifier::Linear | DrmModifier::Invalid)
    }

    pub fn is_afbc(self) -> bool {
        matches!(self.vendor(), Some(DrmVendor::Arm))
            && (self.value() >> ARM_TYPE_SHIFT) & 0xf == ARM_TYPE_AFBC
    }

    /// AFBC flag bits, 0 for non-AFBC modifiers.
    pub fn afbc_flags(self) -> u64 {
        if self.is_afbc() {
            self.0 & ARM_VALUE_MASK
        } else {
            0
        }
    }

    /// Modifier name without the vendor prefix, `None` when unknown.
    pub fn name(self) -> Option<String> {
        match DrmModifier::from(self.0) {
            DrmModifier::Invalid => return Some("INVALID".into()),
            DrmModifier::Linear => return Some("LINEAR".into()),
            _ => {}
        }
        if self.is_afbc() {
            return afbc_name(self.afbc_flags());
        }

        let value = self.value();
        let name = match (self.vendor()?, value) {
            (DrmVendor::Intel, 1) => "X_TILED",
            (DrmVendor::Intel, 2) => "Y_TILED",
            (DrmVendor::Intel, 3) => "Yf_TILED",
            (DrmVendor::Intel, 4) => "Y_TILED_CCS",
            (DrmVendor::Intel, 5) => "Yf_TILED_CCS",
            (DrmVendor::Samsung, 1) => "64_32_TILE",
            (DrmVendor::Vivante, 1) => "TILED",
            (DrmVendor::Vivante, 2) => "SUPER_TILED",
            (DrmVendor::Vivante, 3) => "SPLIT_TILED",
            (DrmVendor::Vivante, 4) => "SPLIT_SUPER_TILED",
            (DrmVendor::Nvidia, 1) => "TEGRA_TILED",
            (DrmVendor::Nvidia, 0x10..=0x15) => {
                return Some(format!("16BX2_BLOCK({})", value & 0xf));
            }
            (DrmVendor::Broadcom, 1) => "VC4_T_TILED",
            (DrmVendor::Qcom, 1) => "COMPRESSED",
            _ => return None,
        };
        Some(name.into())
    }
}

/// Upper-case vendor name as used in modifier strings.
fn vendor_name(modifier: Modifier) -> Option<&'static str> {
    if modifier.vendor_id() == 0 {
        return Some("NONE");
    }
    let name = match modifier.vendor()? {
        DrmVendor::Intel => "INTEL",
        DrmVendor::Amd => "AMD",
        DrmVendor::Nvidia => "NVIDIA",
        DrmVendor::Samsung => "SAMSUNG",
        DrmVendor::Qcom => "QCOM",
        DrmVendor::Vivante => "VIVANTE",
        DrmVendor::Broadcom => "BROADCOM",
        DrmVendor::Arm => "ARM",
        DrmVendor::Allwinner => "ALLWINNER",
        DrmVendor::Amlogic => "AMLOGIC",
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(name)
}

fn afbc_name(flags: u64) -> Option<String> {
    let block_size = match flags & afbc::BLOCK_SIZE_MASK {
        afbc::BLOCK_SIZE_16X16 => "16x16",
        afbc::BLOCK_SIZE_32X8 => "32x8",
        afbc::BLOCK_SIZE_64X4 => "64x4",
        afbc::BLOCK_SIZE_32X8_64X4 => "32x8_64x4",
        _ => return None,
    };

    let mut name = format!("AFBC(BLOCK_SIZE={block_size}");
    let named_flags = [
        (afbc::YTR, "YTR"),
        (afbc::SPLIT, "SPLIT"),
        (afbc::SPARSE, "SPARSE"),
        (afbc::CBR, "CBR"),
        (afbc::TILED, "TILED"),
        (afbc::SC, "SC"),
        (afbc::DB, "DB"),
        (afbc::BCH, "BCH"),
        (afbc::USM, "USM"),
    ];
    for (bit, flag) in named_flags {
        if flags & bit != 0 {
            name.push(',');
            name.push_str(flag);
        }
    }
    name.push(')');
    Some(name)
}

impl From<u64> for Modifier {
    fn from(value: u64) -> Self {
        Modifier(value)
    }
}

impl From<Modifier> for u64 {
    fn from(modifier: Modifier) -> Self {
        modifier.0
    }
}

impl From<DrmModifier> for Modifier {
    fn from(modifier: DrmModifier) -> Self {
        Modifier(modifier.into())
    }
}

impl From<Modifier> for DrmModifier {
    fn from(modifier: Modifier) -> Self {
        DrmModifier::from(modifier.0)
    }
}

/// Vendor and name joined the way the framebuffer dumper names files,
/// e.g. `LINEAR`, `NONE_INVALID` or `ARM_AFBC(BLOCK_SIZE=16x16,SPARSE)`.
/// Only the linear modifier is printed without a vendor.
impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::LINEAR {
            return write!(f, "LINEAR");
        }
        match (vendor_name(*self), self.name()) {
            (Some(vendor), Some(name)) => write!(f, "{vendor}_{name}"),
            (Some(vendor), None) => write!(f, "{vendor}_UNKNOWN_MODIFIER"),
            (None, _) => write!(f, "UNKNOWN_VENDOR_UNKNOWN_MODIFIER"),
        }
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifier({self} 0x{:016x})", self.0)
    }
}
