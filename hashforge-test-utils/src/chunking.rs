//! Helpers for splitting a message into update-sized pieces

/// Split `data` at the given offsets
///
/// Offsets are sorted, clamped to the data length and may repeat, which
/// yields empty pieces.
pub fn split_at_points<'a>(data: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut cuts: Vec<usize> = points.iter().map(|&p| p.min(data.len())).collect();
    cuts.sort_unstable();

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        pieces.push(&data[start..cut]);
        start = cut;
    }
    pieces.push(&data[start..]);
    pieces
}

/// Split `data` into pieces of `size` bytes, the last one possibly shorter
pub fn split_evenly(data: &[u8], size: usize) -> Vec<&[u8]> {
    data.chunks(size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_points_keeps_every_byte() {
        let data = b"abcdefghij";
        let pieces = split_at_points(data, &[7, 3, 3, 50]);
        assert_eq!(pieces, vec![&b"abc"[..], b"", b"defg", b"hij", b""]);
        assert_eq!(pieces.concat(), data.to_vec());
    }

    #[test]
    fn test_split_evenly() {
        let pieces = split_evenly(b"abcdefg", 3);
        assert_eq!(pieces, vec![&b"abc"[..], b"def", b"g"]);
    }
}
