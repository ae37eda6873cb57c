//! Merkle–Damgård message padding

use crate::Result;
use crate::hashing::accumulator::BlockAccumulator;
use crate::hashing::traits::BlockTransform;

/// Byte order of the trailing length field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthEndian {
    Big,
    Little,
}

/// Append the padding byte, zero fill and the message bit length.
///
/// The length is captured before any padding is fed. The padding then goes
/// through [`BlockAccumulator::update_padding`], which transforms the final
/// block or two like message data but leaves the bit counter alone. `length_width` is the size of the
/// length field in bytes and must be smaller than the block size.
pub fn merkle_damgard_pad<T>(
    accumulator: &mut BlockAccumulator,
    transform: &mut T,
    length_width: usize,
    endian: LengthEndian,
) -> Result<()>
where
    T: BlockTransform + ?Sized,
{
    let length = match endian {
        LengthEndian::Big => accumulator.bit_count().length_be(length_width),
        LengthEndian::Little => accumulator.bit_count().length_le(length_width),
    };

    let block_size = accumulator.block_size();
    let used = accumulator.buffered();
    let room = block_size - length_width;

    let zeros = if used < room {
        room - used - 1
    } else {
        block_size + room - used - 1
    };

    let mut padding = Vec::with_capacity(1 + zeros + length_width);
    padding.push(accumulator.padding_byte());
    padding.resize(1 + zeros, 0);
    padding.extend_from_slice(&length);

    accumulator.update_padding(transform, &padding)?;
    debug_assert_eq!(accumulator.buffered(), 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collect {
        blocks: Vec<Vec<u8>>,
    }

    impl BlockTransform for Collect {
        fn block_size(&self) -> usize {
            16
        }

        fn transform_block(&mut self, block: &[u8]) {
            self.blocks.push(block.to_vec());
        }
    }

    fn padded(message: &[u8], endian: LengthEndian) -> Vec<Vec<u8>> {
        let mut acc = BlockAccumulator::new(0x80);
        let mut collect = Collect { blocks: Vec::new() };
        acc.reset(16);
        acc.update(&mut collect, message).unwrap();
        merkle_damgard_pad(&mut acc, &mut collect, 4, endian).unwrap();
        assert_eq!(acc.bit_count().low_u64(), message.len() as u64 * 8);
        collect.blocks
    }

    #[test]
    fn test_padding_fits_in_current_block() {
        let blocks = padded(b"abc", LengthEndian::Big);
        assert_eq!(blocks.len(), 1);
        assert_eq!(&blocks[0][..4], b"abc\x80");
        assert!(blocks[0][4..12].iter().all(|&b| b == 0));
        assert_eq!(&blocks[0][12..], &[0, 0, 0, 24]);
    }

    #[test]
    fn test_padding_spills_into_extra_block() {
        // 12 bytes leave no room for the marker and a 4-byte length
        let blocks = padded(&[0x11; 12], LengthEndian::Little);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0][12], 0x80);
        assert!(blocks[1][..12].iter().all(|&b| b == 0));
        assert_eq!(&blocks[1][12..], &[96, 0, 0, 0]);
    }

    #[test]
    fn test_boundary_just_fits() {
        let blocks = padded(&[0x22; 11], LengthEndian::Big);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0][11], 0x80);
        assert_eq!(&blocks[0][12..], &[0, 0, 0, 88]);
    }

    #[test]
    fn test_empty_message_pads_one_block() {
        let blocks = padded(b"", LengthEndian::Big);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0][0], 0x80);
        assert!(blocks[0][1..].iter().all(|&b| b == 0));
    }
}
