//! Baseline (sequential) JPEG scan decoding.
//!
//! This module handles the standard sequential JPEG format (SOF0).
//! Coefficients are decoded from a single scan with full spectral range.

use super::ScanCoefficients;
use crate::error::{DctError, Result};
use crate::jpeg::huffman::{BitReader, HuffmanLookup};
use crate::jpeg::parser::{FrameInfo, JpegSegments};

/// Decode scan data from a baseline JPEG.
///
/// Extracts all DCT coefficients from the entropy-coded scan data.
///
/// # Arguments
/// * `segments` - Parsed JPEG segments containing Huffman tables and scan data
///
/// # Returns
/// Decoded DCT coefficients in scan order.
pub fn decode_scan_baseline(segments: &JpegSegments) -> Result<ScanCoefficients> {
    let frame = segments.frame.as_ref().ok_or_else(|| DctError::InvalidCoefficients {
        reason: "missing frame info (SOF)".to_string(),
    })?;

    // Build Huffman lookup tables
    let mut dc_tables: [Option<HuffmanLookup>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<HuffmanLookup>; 4] = [None, None, None, None];

    for (i, table) in segments.dc_huff_tables.iter().enumerate() {
        if let Some(t) = table {
            dc_tables[i] = Some(HuffmanLookup::from_table(t)?);
        }
    }
    for (i, table) in segments.ac_huff_tables.iter().enumerate() {
        if let Some(t) = table {
            ac_tables[i] = Some(HuffmanLookup::from_table(t)?);
        }
    }

    // Calculate block dimensions
    let (mcu_width, mcu_height, _blocks_per_mcu, blocks_per_component) =
        calculate_mcu_info(frame)?;

    let mcu_cols = (frame.width as usize + mcu_width - 1) / mcu_width;
    let mcu_rows = (frame.height as usize + mcu_height - 1) / mcu_height;
    let total_mcus = mcu_cols * mcu_rows;

    // blocks_per_component already accounts for all MCUs, so sum gives total blocks
    let total_blocks: usize = blocks_per_component.iter().sum();

    // Allocate coefficient storage
    let mut coefficients = ScanCoefficients {
        data: vec![0i16; total_blocks * 64],
        blocks_per_component: blocks_per_component.clone(),
        total_blocks,
        width: frame.width,
        height: frame.height,
    };

    // Decode scan data
    let mut reader = BitReader::new(&segments.scan_data);
    let mut dc_predictors = vec![0i16; frame.components.len()];
    let mut block_idx = 0;

    let restart_interval = segments.restart_interval as usize;
    let mut restart_count = 0;

    for _mcu in 0..total_mcus {
        // Check for restart interval
        if restart_interval > 0 && restart_count == restart_interval {
            // Reset DC predictors at restart marker
            dc_predictors.fill(0);
            restart_count = 0;
        }

        // Decode each component's blocks in the MCU
        for (comp_idx, component) in frame.components.iter().enumerate() {
            let h_blocks = component.h_sampling as usize;
            let v_blocks = component.v_sampling as usize;
            let num_blocks = h_blocks * v_blocks;

            let dc_table = dc_tables[component.dc_table_id as usize]
                .as_ref()
                .ok_or_else(|| DctError::InvalidCoefficients {
                    reason: format!("missing DC Huffman table {}", component.dc_table_id),
                })?;

            let ac_table = ac_tables[component.ac_table_id as usize]
                .as_ref()
                .ok_or_else(|| DctError::InvalidCoefficients {
                    reason: format!("missing AC Huffman table {}", component.ac_table_id),
                })?;

            for _ in 0..num_blocks {
                if block_idx >= coefficients.total_blocks {
                    break;
                }

                let block = coefficients.block_mut(block_idx);
                decode_block(
                    &mut reader,
                    block,
                    dc_table,
                    ac_table,
                    &mut dc_predictors[comp_idx],
                )?;
                block_idx += 1;
            }
        }

        restart_count += 1;
    }

    Ok(coefficients)
}

/// Decode a single 8x8 block of DCT coefficients.
fn decode_block(
    reader: &mut BitReader,
    block: &mut [i16],
    dc_table: &HuffmanLookup,
    ac_table: &HuffmanLookup,
    dc_predictor: &mut i16,
) -> Result<()> {
    // Clear block
    block.fill(0);

    // Decode DC coefficient
    let dc_size = reader.decode_huffman(dc_table)?;
    if dc_size > 11 {
        return Err(DctError::InvalidCoefficients {
            reason: format!("invalid DC coefficient size: {}", dc_size),
        });
    }

    let dc_diff = reader.receive_extend(dc_size)?;
    *dc_predictor = dc_predictor.wrapping_add(dc_diff);
    block[0] = *dc_predictor;

    // Decode AC coefficients
    let mut k = 1;
    while k < 64 {
        let symbol = reader.decode_huffman(ac_table)?;
        let run = symbol >> 4; // Number of zeros before this coefficient
        let size = symbol & 0x0F; // Bit size of coefficient

        if size == 0 {
            if run == 0 {
                // EOB (End of Block) - remaining coefficients are zero
                break;
            } else if run == 0x0F {
                // ZRL (Zero Run Length) - 16 zeros
                k += 16;
            } else {
                // Invalid
                return Err(DctError::InvalidCoefficients {
                    reason: format!("invalid AC run/size: {:02X}", symbol),
                });
            }
        } else {
            // Skip `run` zeros, then decode coefficient
            k += run as usize;
            if k >= 64 {
                return Err(DctError::InvalidCoefficients {
                    reason: "AC coefficient index out of bounds".to_string(),
                });
            }

            let value = reader.receive_extend(size)?;
            block[k] = value;
            k += 1;
        }
    }

    Ok(())
}

/// Calculate MCU (Minimum Coded Unit) information.
pub(crate) fn calculate_mcu_info(frame: &FrameInfo) -> Result<(usize, usize, Vec<usize>, Vec<usize>)> {
    // Find maximum sampling factors
    let h_max = frame
        .components
        .iter()
        .map(|c| c.h_sampling as usize)
        .max()
        .unwrap_or(1);
    let v_max = frame
        .components
        .iter()
        .map(|c| c.v_sampling as usize)
        .max()
        .unwrap_or(1);

    // MCU dimensions in pixels
    let mcu_width = h_max * 8;
    let mcu_height = v_max * 8;

    // Blocks per MCU for each component
    let blocks_per_mcu: Vec<usize> = frame
        .components
        .iter()
        .map(|c| (c.h_sampling as usize) * (c.v_sampling as usize))
        .collect();

    // Total blocks per component (over entire image)
    let mcu_cols = (frame.width as usize + mcu_width - 1) / mcu_width;
    let mcu_rows = (frame.height as usize + mcu_height - 1) / mcu_height;
    let total_mcus = mcu_cols * mcu_rows;

    let blocks_per_component: Vec<usize> = blocks_per_mcu
        .iter()
        .map(|&blocks| blocks * total_mcus)
        .collect();

    Ok((mcu_width, mcu_height, blocks_per_mcu, blocks_per_component))
}
