//! Broadcast display-mode presets.
//!
//! A closed set of the timing presets broadcast I/O hardware negotiates:
//! SD NTSC/PAL, HD 720p/1080i/1080p, 2K film, 2K/4K/8K DCI, UHD 4K/8K and
//! the common PC raster modes. Each preset carries its geometry, exact
//! rational frame rate and scan type. Vendor SDK codes are not part of this
//! type; they are mapped only at the device boundary.
//!
//! ```
//! use sdi_core::DisplayMode;
//!
//! let mode: DisplayMode = "HD1080p2997".parse().unwrap();
//! assert_eq!((mode.width(), mode.height()), (1920, 1080));
//! assert_eq!(mode.frame_rate().to_string(), "29.97");
//! assert!(DisplayMode::Pal.is_sd());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Exact frame rate as a rational number (frames per second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRate {
    /// Numerator
    pub num: u32,
    /// Denominator
    pub den: u32,
}

impl FrameRate {
    /// Creates a rate of `num / den` frames per second.
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Rate as floating-point frames per second.
    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration(self) -> std::time::Duration {
        std::time::Duration::from_nanos(1_000_000_000 * self.den as u64 / self.num as u64)
    }

    /// True for the 1000/1001 NTSC-family rates.
    pub const fn is_drop_rate(self) -> bool {
        self.den == 1001
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            let fps = self.as_f64();
            let s = format!("{fps:.2}");
            f.write_str(s.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}

const fn r(num: u32, den: u32) -> FrameRate {
    FrameRate::new(num, den)
}

macro_rules! display_modes {
    ($( $variant:ident => $name:literal, $w:expr, $h:expr, $rate:expr, $interlaced:expr; )*) => {
        /// Broadcast timing preset.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum DisplayMode {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl DisplayMode {
            /// Every preset, in table order.
            pub const ALL: &'static [DisplayMode] = &[$(DisplayMode::$variant),*];

            /// Canonical preset name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(DisplayMode::$variant => $name,)*
                }
            }

            /// Active picture width in pixels.
            pub const fn width(self) -> u32 {
                match self {
                    $(DisplayMode::$variant => $w,)*
                }
            }

            /// Active picture height in lines.
            pub const fn height(self) -> u32 {
                match self {
                    $(DisplayMode::$variant => $h,)*
                }
            }

            /// Frame rate (frames, not fields, per second).
            pub const fn frame_rate(self) -> FrameRate {
                match self {
                    $(DisplayMode::$variant => $rate,)*
                }
            }

            /// True for interlaced scan.
            pub const fn is_interlaced(self) -> bool {
                match self {
                    $(DisplayMode::$variant => $interlaced,)*
                }
            }
        }
    };
}

const P: bool = false;
const I: bool = true;

display_modes! {
    Ntsc => "NTSC", 720, 486, r(30000, 1001), I;
    Ntsc2398 => "NTSC2398", 720, 486, r(24000, 1001), I;
    Pal => "PAL", 720, 576, r(25, 1), I;
    NtscP => "NTSCp", 720, 486, r(60000, 1001), P;
    PalP => "PALp", 720, 576, r(50, 1), P;

    Hd1080p2398 => "HD1080p2398", 1920, 1080, r(24000, 1001), P;
    Hd1080p24 => "HD1080p24", 1920, 1080, r(24, 1), P;
    Hd1080p25 => "HD1080p25", 1920, 1080, r(25, 1), P;
    Hd1080p2997 => "HD1080p2997", 1920, 1080, r(30000, 1001), P;
    Hd1080p30 => "HD1080p30", 1920, 1080, r(30, 1), P;
    Hd1080p4795 => "HD1080p4795", 1920, 1080, r(48000, 1001), P;
    Hd1080p48 => "HD1080p48", 1920, 1080, r(48, 1), P;
    Hd1080p50 => "HD1080p50", 1920, 1080, r(50, 1), P;
    Hd1080p5994 => "HD1080p5994", 1920, 1080, r(60000, 1001), P;
    Hd1080p60 => "HD1080p60", 1920, 1080, r(60, 1), P;
    Hd1080p9590 => "HD1080p9590", 1920, 1080, r(96000, 1001), P;
    Hd1080p96 => "HD1080p96", 1920, 1080, r(96, 1), P;
    Hd1080p100 => "HD1080p100", 1920, 1080, r(100, 1), P;
    Hd1080p11988 => "HD1080p11988", 1920, 1080, r(120000, 1001), P;
    Hd1080p120 => "HD1080p120", 1920, 1080, r(120, 1), P;

    Hd1080i50 => "HD1080i50", 1920, 1080, r(25, 1), I;
    Hd1080i5994 => "HD1080i5994", 1920, 1080, r(30000, 1001), I;
    Hd1080i60 => "HD1080i60", 1920, 1080, r(30, 1), I;

    Hd720p50 => "HD720p50", 1280, 720, r(50, 1), P;
    Hd720p5994 => "HD720p5994", 1280, 720, r(60000, 1001), P;
    Hd720p60 => "HD720p60", 1280, 720, r(60, 1), P;

    Film2k2398 => "2k2398", 2048, 1556, r(24000, 1001), P;
    Film2k24 => "2k24", 2048, 1556, r(24, 1), P;
    Film2k25 => "2k25", 2048, 1556, r(25, 1), P;

    Dci2k2398 => "2kDCI2398", 2048, 1080, r(24000, 1001), P;
    Dci2k24 => "2kDCI24", 2048, 1080, r(24, 1), P;
    Dci2k25 => "2kDCI25", 2048, 1080, r(25, 1), P;
    Dci2k2997 => "2kDCI2997", 2048, 1080, r(30000, 1001), P;
    Dci2k30 => "2kDCI30", 2048, 1080, r(30, 1), P;
    Dci2k4795 => "2kDCI4795", 2048, 1080, r(48000, 1001), P;
    Dci2k48 => "2kDCI48", 2048, 1080, r(48, 1), P;
    Dci2k50 => "2kDCI50", 2048, 1080, r(50, 1), P;
    Dci2k5994 => "2kDCI5994", 2048, 1080, r(60000, 1001), P;
    Dci2k60 => "2kDCI60", 2048, 1080, r(60, 1), P;
    Dci2k9590 => "2kDCI9590", 2048, 1080, r(96000, 1001), P;
    Dci2k96 => "2kDCI96", 2048, 1080, r(96, 1), P;
    Dci2k100 => "2kDCI100", 2048, 1080, r(100, 1), P;
    Dci2k11988 => "2kDCI11988", 2048, 1080, r(120000, 1001), P;
    Dci2k120 => "2kDCI120", 2048, 1080, r(120, 1), P;

    Uhd2160p2398 => "4K2160p2398", 3840, 2160, r(24000, 1001), P;
    Uhd2160p24 => "4K2160p24", 3840, 2160, r(24, 1), P;
    Uhd2160p25 => "4K2160p25", 3840, 2160, r(25, 1), P;
    Uhd2160p2997 => "4K2160p2997", 3840, 2160, r(30000, 1001), P;
    Uhd2160p30 => "4K2160p30", 3840, 2160, r(30, 1), P;
    Uhd2160p4795 => "4K2160p4795", 3840, 2160, r(48000, 1001), P;
    Uhd2160p48 => "4K2160p48", 3840, 2160, r(48, 1), P;
    Uhd2160p50 => "4K2160p50", 3840, 2160, r(50, 1), P;
    Uhd2160p5994 => "4K2160p5994", 3840, 2160, r(60000, 1001), P;
    Uhd2160p60 => "4K2160p60", 3840, 2160, r(60, 1), P;
    Uhd2160p9590 => "4K2160p9590", 3840, 2160, r(96000, 1001), P;
    Uhd2160p96 => "4K2160p96", 3840, 2160, r(96, 1), P;
    Uhd2160p100 => "4K2160p100", 3840, 2160, r(100, 1), P;
    Uhd2160p11988 => "4K2160p11988", 3840, 2160, r(120000, 1001), P;
    Uhd2160p120 => "4K2160p120", 3840, 2160, r(120, 1), P;

    Dci4k2398 => "4kDCI2398", 4096, 2160, r(24000, 1001), P;
    Dci4k24 => "4kDCI24", 4096, 2160, r(24, 1), P;
    Dci4k25 => "4kDCI25", 4096, 2160, r(25, 1), P;
    Dci4k2997 => "4kDCI2997", 4096, 2160, r(30000, 1001), P;
    Dci4k30 => "4kDCI30", 4096, 2160, r(30, 1), P;
    Dci4k4795 => "4kDCI4795", 4096, 2160, r(48000, 1001), P;
    Dci4k48 => "4kDCI48", 4096, 2160, r(48, 1), P;
    Dci4k50 => "4kDCI50", 4096, 2160, r(50, 1), P;
    Dci4k5994 => "4kDCI5994", 4096, 2160, r(60000, 1001), P;
    Dci4k60 => "4kDCI60", 4096, 2160, r(60, 1), P;
    Dci4k9590 => "4kDCI9590", 4096, 2160, r(96000, 1001), P;
    Dci4k96 => "4kDCI96", 4096, 2160, r(96, 1), P;
    Dci4k100 => "4kDCI100", 4096, 2160, r(100, 1), P;
    Dci4k11988 => "4kDCI11988", 4096, 2160, r(120000, 1001), P;
    Dci4k120 => "4kDCI120", 4096, 2160, r(120, 1), P;

    Uhd4320p2398 => "8K4320p2398", 7680, 4320, r(24000, 1001), P;
    Uhd4320p24 => "8K4320p24", 7680, 4320, r(24, 1), P;
    Uhd4320p25 => "8K4320p25", 7680, 4320, r(25, 1), P;
    Uhd4320p2997 => "8K4320p2997", 7680, 4320, r(30000, 1001), P;
    Uhd4320p30 => "8K4320p30", 7680, 4320, r(30, 1), P;
    Uhd4320p4795 => "8K4320p4795", 7680, 4320, r(48000, 1001), P;
    Uhd4320p48 => "8K4320p48", 7680, 4320, r(48, 1), P;
    Uhd4320p50 => "8K4320p50", 7680, 4320, r(50, 1), P;
    Uhd4320p5994 => "8K4320p5994", 7680, 4320, r(60000, 1001), P;
    Uhd4320p60 => "8K4320p60", 7680, 4320, r(60, 1), P;

    Dci8k2398 => "8kDCI2398", 8192, 4320, r(24000, 1001), P;
    Dci8k24 => "8kDCI24", 8192, 4320, r(24, 1), P;
    Dci8k25 => "8kDCI25", 8192, 4320, r(25, 1), P;
    Dci8k2997 => "8kDCI2997", 8192, 4320, r(30000, 1001), P;
    Dci8k30 => "8kDCI30", 8192, 4320, r(30, 1), P;
    Dci8k4795 => "8kDCI4795", 8192, 4320, r(48000, 1001), P;
    Dci8k48 => "8kDCI48", 8192, 4320, r(48, 1), P;
    Dci8k50 => "8kDCI50", 8192, 4320, r(50, 1), P;
    Dci8k5994 => "8kDCI5994", 8192, 4320, r(60000, 1001), P;
    Dci8k60 => "8kDCI60", 8192, 4320, r(60, 1), P;

    Pc640x480p60 => "640x480p60", 640, 480, r(60, 1), P;
    Pc800x600p60 => "800x600p60", 800, 600, r(60, 1), P;
    Pc1440x900p50 => "1440x900p50", 1440, 900, r(50, 1), P;
    Pc1440x900p60 => "1440x900p60", 1440, 900, r(60, 1), P;
    Pc1440x1080p50 => "1440x1080p50", 1440, 1080, r(50, 1), P;
    Pc1440x1080p60 => "1440x1080p60", 1440, 1080, r(60, 1), P;
    Pc1600x1200p50 => "1600x1200p50", 1600, 1200, r(50, 1), P;
    Pc1600x1200p60 => "1600x1200p60", 1600, 1200, r(60, 1), P;
    Pc1920x1200p50 => "1920x1200p50", 1920, 1200, r(50, 1), P;
    Pc1920x1200p60 => "1920x1200p60", 1920, 1200, r(60, 1), P;
    Pc1920x1440p50 => "1920x1440p50", 1920, 1440, r(50, 1), P;
    Pc1920x1440p60 => "1920x1440p60", 1920, 1440, r(60, 1), P;
    Pc2560x1440p50 => "2560x1440p50", 2560, 1440, r(50, 1), P;
    Pc2560x1440p60 => "2560x1440p60", 2560, 1440, r(60, 1), P;
    Pc2560x1600p50 => "2560x1600p50", 2560, 1600, r(50, 1), P;
    Pc2560x1600p60 => "2560x1600p60", 2560, 1600, r(60, 1), P;
}

impl DisplayMode {
    /// True for the standard-definition NTSC and PAL presets.
    pub const fn is_sd(self) -> bool {
        matches!(
            self,
            DisplayMode::Ntsc
                | DisplayMode::Ntsc2398
                | DisplayMode::Pal
                | DisplayMode::NtscP
                | DisplayMode::PalP
        )
    }

    /// (width, height) of the active picture.
    pub const fn dimensions(self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Looks up a preset by geometry, rate and scan.
    pub fn find(width: u32, height: u32, rate: FrameRate, interlaced: bool) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| {
            m.width() == width
                && m.height() == height
                && m.frame_rate() == rate
                && m.is_interlaced() == interlaced
        })
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Hd1080p25
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.strip_prefix("Mode").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| Error::parse("display mode", s))
    }
}
