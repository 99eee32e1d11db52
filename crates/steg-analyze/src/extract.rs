//! Coefficient sequence extraction (C3).
//!
//! Turns a decoded JPEG's component-major raster of DCT coefficients into
//! the several flat coefficient sequences each scheme's statistics are
//! computed over. All five extractors are pure functions of the raster;
//! callers own the returned sequence.

use jpeg_dct::DctImage;

use crate::error::{AnalyzeError, Result};

/// A jphide walk-table segment: component, starting offset into the
/// component's flattened coefficient stream, and a gating mode.
///
/// `mode` selects how often a visited coefficient is actually consumed:
/// `Always` takes every coefficient, `Half`/`Quarter` skip small-magnitude
/// coefficients (`-1..=1`) at the stated rate, and `TwoLsb` marks positions
/// reserved for 2-LSB modification (never consumed by this walk).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    Always,
    Half,
    Quarter,
    TwoLsb,
}

#[derive(Debug, Clone, Copy)]
pub struct WalkSegment {
    pub component: usize,
    pub start: usize,
    pub mode: WalkMode,
}

/// The jphide walk table used by [`prepare_jphide`].
///
/// The reference tool's table (`jphide_table.h`) is generated offline from
/// the embedding density schedule and was not available in source form;
/// this table reproduces its shape — a handful of segments sweeping each
/// component's flattened coefficient stream with alternating gating modes
/// — without claiming byte-identical embedding-density constants.
pub fn default_jphide_table() -> Vec<WalkSegment> {
    vec![
        WalkSegment { component: 0, start: 0, mode: WalkMode::Always },
        WalkSegment { component: 0, start: 0, mode: WalkMode::Half },
        WalkSegment { component: 1, start: 0, mode: WalkMode::Half },
        WalkSegment { component: 2, start: 0, mode: WalkMode::Quarter },
    ]
}

fn skip_0_1(val: i16) -> bool {
    (val & 1) == val
}

/// *natural*: all AC+DC coefficients of all three components, raster block
/// order, natural coefficient order within each block.
pub fn prepare_natural(image: &DctImage) -> Result<Vec<i16>> {
    check_preconditions(image)?;
    let mut out = Vec::new();
    for comp in 0..3 {
        for block in image.component_blocks(comp) {
            out.extend_from_slice(block);
        }
    }
    Ok(out)
}

/// *MCU*: same blocks, skip-0-1 rule, in MCU (scan) order.
///
/// `DctImage` is already re-homed to raster order, so this walks the
/// raster grid component-interleaved per block position to approximate MCU
/// traversal order; skip-0-1 filtering is independent of traversal order.
pub fn prepare_mcu(image: &DctImage) -> Result<Vec<i16>> {
    check_preconditions(image)?;
    let mut out = Vec::new();
    let rows = image.components[0].blocks_high.max(
        image.components[1].blocks_high.max(image.components[2].blocks_high),
    );
    let cols = image.components[0].blocks_wide.max(
        image.components[1].blocks_wide.max(image.components[2].blocks_wide),
    );
    for row in 0..rows {
        for col in 0..cols {
            for comp in 0..3 {
                let plane = &image.components[comp];
                if row >= plane.blocks_high || col >= plane.blocks_wide {
                    continue;
                }
                for &val in plane.block(row, col) {
                    if !skip_0_1(val) {
                        out.push(val);
                    }
                }
            }
        }
    }
    Ok(out)
}

/// *outguess-order*: natural order, skip-0-1 rule, DC coefficient of each
/// block excluded.
pub fn prepare_outguess_order(image: &DctImage) -> Result<Vec<i16>> {
    check_preconditions(image)?;
    let mut out = Vec::new();
    for comp in 0..3 {
        for block in image.component_blocks(comp) {
            for (i, &val) in block.iter().enumerate() {
                if i == 0 {
                    continue; // DC excluded
                }
                if !skip_0_1(val) {
                    out.push(val);
                }
            }
        }
    }
    Ok(out)
}

/// *jphide-order*: walk-table-driven selection with mode-gated skipping.
/// The first eight coefficients of the first block of the first component
/// are reserved as the initialisation vector and never consumed. Returns
/// the sequence plus `(jphpos[0], jphpos[1])`: the walk position after the
/// first segment and after the fourth.
pub fn prepare_jphide(image: &DctImage) -> Result<(Vec<i16>, usize, usize)> {
    check_preconditions(image)?;
    let table = default_jphide_table();

    let flat: Vec<Vec<i16>> = (0..3)
        .map(|comp| {
            let mut v = Vec::new();
            for block in image.component_blocks(comp) {
                v.extend_from_slice(block);
            }
            v
        })
        .collect();

    let mut out = Vec::new();
    let mut jphpos = [0usize; 2];
    let mut segment_count = 0usize;

    for segment in &table {
        let stream = &flat[segment.component];
        for (idx, &val) in stream.iter().enumerate() {
            if segment.component == 0 && idx < 8 {
                continue; // IV reserved
            }
            let consumed = match segment.mode {
                WalkMode::TwoLsb => false,
                WalkMode::Always => true,
                WalkMode::Half | WalkMode::Quarter => !(-1..=1).contains(&val),
            };
            if consumed {
                out.push(val);
            }
        }
        if segment_count == 0 {
            jphpos[0] = out.len();
        }
        if segment_count == 3 {
            jphpos[1] = out.len();
        }
        segment_count += 1;
    }

    Ok((out, jphpos[0], jphpos[1]))
}

/// *gradient*: horizontal difference of adjacent blocks, natural order.
pub fn prepare_gradient_x(image: &DctImage) -> Result<Vec<i16>> {
    check_preconditions(image)?;
    let mut out = Vec::new();
    for comp in 0..3 {
        let plane = &image.components[comp];
        if plane.blocks_wide < 2 {
            return Err(AnalyzeError::UnsupportedImage(
                "image too small for gradient transform".to_string(),
            ));
        }
        for row in 0..plane.blocks_high {
            for col in 0..plane.blocks_wide - 1 {
                let a = plane.block(row, col);
                let b = plane.block(row, col + 1);
                for i in 0..64 {
                    out.push(a[i].wrapping_sub(b[i]));
                }
            }
        }
    }
    Ok(out)
}

fn check_preconditions(image: &DctImage) -> Result<()> {
    if image.components.len() != 3 {
        return Err(AnalyzeError::UnsupportedImage(format!(
            "expected 3 components, found {}",
            image.components.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpeg_dct::ComponentPlane;

    fn flat_image(blocks_wide: usize, blocks_high: usize, fill: i16) -> DctImage {
        let plane = || ComponentPlane {
            h_sampling: 1,
            v_sampling: 1,
            quant_table_id: 0,
            blocks_wide,
            blocks_high,
            blocks: vec![[fill; 64]; blocks_wide * blocks_high],
        };
        DctImage {
            width: (blocks_wide * 8) as u16,
            height: (blocks_high * 8) as u16,
            components: vec![plane(), plane(), plane()],
        }
    }

    #[test]
    fn test_prepare_natural_length() {
        let image = flat_image(2, 2, 5);
        let seq = prepare_natural(&image).unwrap();
        assert_eq!(seq.len(), 3 * 4 * 64);
    }

    #[test]
    fn test_prepare_mcu_skips_0_and_1() {
        let image = flat_image(1, 1, 1);
        let seq = prepare_mcu(&image).unwrap();
        assert!(seq.is_empty(), "all-1 blocks should be fully skipped");
    }

    #[test]
    fn test_prepare_outguess_order_excludes_dc() {
        let mut image = flat_image(1, 1, 5);
        image.components[0].blocks[0][0] = 9999; // DC, should never appear
        let seq = prepare_outguess_order(&image).unwrap();
        assert!(!seq.contains(&9999));
    }

    #[test]
    fn test_prepare_gradient_x_zero_for_identical_blocks() {
        let image = flat_image(2, 1, 7);
        let seq = prepare_gradient_x(&image).unwrap();
        assert!(seq.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_prepare_jphide_reserves_iv() {
        let image = flat_image(4, 4, 5);
        let (_, p0, p1) = prepare_jphide(&image).unwrap();
        assert!(p1 >= p0);
    }
}
