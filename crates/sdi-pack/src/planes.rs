//! Raw code planes for inspection and analysis.
//!
//! [`unpack_planes`] splits a wire buffer into three planes of raw codes
//! without any range or matrix conversion. For the 4:2:2 formats the
//! chroma planes keep their native half horizontal resolution, one entry
//! per stored chroma pair.

use crate::{Triple, check_wire_len, unpack_frame};
use sdi_core::{Result, WireFormat};

/// Three planes of raw wire codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePlanes {
    /// Source format
    pub format: WireFormat,
    /// Luma / first-plane width
    pub width: u32,
    /// Height of every plane
    pub height: u32,
    /// Width of the second and third planes
    pub chroma_width: u32,
    /// Y' (or R) codes, `width * height`
    pub c0: Vec<u16>,
    /// Cb (or G) codes, `chroma_width * height`
    pub c1: Vec<u16>,
    /// Cr (or B) codes, `chroma_width * height`
    pub c2: Vec<u16>,
}

impl CodePlanes {
    /// Code triple at (x, y); chroma is looked up at `x / 2` for 4:2:2.
    pub fn get(&self, x: u32, y: u32) -> Triple {
        let cx = if self.format.is_subsampled() { x / 2 } else { x };
        let l = (y * self.width + x) as usize;
        let c = (y * self.chroma_width + cx) as usize;
        [self.c0[l], self.c1[c], self.c2[c]]
    }
}

/// Splits a wire buffer into raw code planes.
pub fn unpack_planes(format: WireFormat, bytes: &[u8], width: u32, height: u32) -> Result<CodePlanes> {
    check_wire_len(format, width, height, bytes.len())?;
    let mut triples = vec![[0u16; 3]; width as usize * height as usize];
    unpack_frame::<u16, _, 3>(format, width, height, bytes, triples.as_flattened_mut(), |t| t)?;

    let chroma_width = if format.is_subsampled() {
        width.div_ceil(2)
    } else {
        width
    };
    let c0 = triples.iter().map(|t| t[0]).collect();
    let chroma: Vec<Triple> = if format.is_subsampled() {
        // pixels 2k and 2k+1 carry the same pair; keep the even one
        triples
            .chunks(width as usize)
            .flat_map(|row| row.iter().step_by(2).copied())
            .collect()
    } else {
        triples
    };

    Ok(CodePlanes {
        format,
        width,
        height,
        chroma_width,
        c0,
        c1: chroma.iter().map(|t| t[1]).collect(),
        c2: chroma.iter().map(|t| t[2]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    #[test]
    fn test_v210_planes_half_width_chroma() {
        let codes: Vec<Triple> = (0..7u16).map(|x| [64 + x * 100, 500, 500 + x]).collect();
        let bytes = encode(WireFormat::Yuv10, &codes, 7, 1).unwrap();
        let planes = unpack_planes(WireFormat::Yuv10, &bytes, 7, 1).unwrap();

        assert_eq!(planes.chroma_width, 4);
        assert_eq!(planes.c0, codes.iter().map(|t| t[0]).collect::<Vec<_>>());
        assert_eq!(planes.c1, vec![500; 4]);
        // pairs (500,501) (502,503) (504,505) and the lone last pixel 506
        assert_eq!(planes.c2, vec![501, 503, 505, 506]);
        assert_eq!(planes.get(5, 0), [564, 500, 505]);
    }

    #[test]
    fn test_rgb_planes_full_width() {
        let codes = vec![[1u16, 2, 3], [4, 5, 6]];
        let bytes = encode(WireFormat::Rgb12, &codes, 2, 1).unwrap();
        let planes = unpack_planes(WireFormat::Rgb12, &bytes, 2, 1).unwrap();
        assert_eq!(planes.chroma_width, 2);
        assert_eq!(planes.c0, vec![1, 4]);
        assert_eq!(planes.c1, vec![2, 5]);
        assert_eq!(planes.c2, vec![3, 6]);
    }
}
