//! Bit-vector reading shared by truth tables and test vectors.

use std::collections::VecDeque;

use super::lexer::Lexer;
use crate::error::Result;

/// Reads fixed-width groups of `0`/`1` characters from a token stream.
///
/// Bits may be split across any number of tokens, and characters other than
/// `0` and `1` are skipped. Bits left over in a token after a group is full are
/// kept for the next group, so `011` followed by a 2+1 bit read yields `01`
/// and `1`.
#[derive(Debug, Default)]
pub struct BitReader {
    pending: VecDeque<u8>,
}

impl BitReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read up to `count` bits.
    ///
    /// Stops early at end of input or at a token for which `is_stop` returns
    /// true; that token is pushed back. The returned vector is shorter than
    /// `count` exactly when the group is incomplete.
    pub fn read(
        &mut self,
        lexer: &mut Lexer<'_>,
        count: usize,
        is_stop: impl Fn(&str) -> bool,
    ) -> Result<Vec<u8>> {
        let mut bits = Vec::with_capacity(count);

        while bits.len() < count {
            if let Some(bit) = self.pending.pop_front() {
                bits.push(bit);
                continue;
            }

            let Some(token) = lexer.next_token()? else {
                break;
            };
            if is_stop(&token.text) {
                lexer.unget(token);
                break;
            }
            self.pending.extend(token.text.chars().filter_map(|c| match c {
                '0' => Some(0),
                '1' => Some(1),
                _ => None,
            }));
        }

        Ok(bits)
    }

    /// Whether bits from the last token have not been consumed yet.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Pack bits into an integer, bit `i` taken from `bits[i]`.
pub fn pack(bits: &[u8]) -> u32 {
    bits.iter()
        .enumerate()
        .fold(0, |acc, (i, &bit)| acc | (u32::from(bit & 1) << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(text: &str) -> bool {
        text == "}"
    }

    #[test]
    fn test_bits_split_across_tokens() {
        let mut lexer = Lexer::new("0 1 10 }", "bits");
        let mut reader = BitReader::new();
        assert_eq!(reader.read(&mut lexer, 4, close).unwrap(), vec![0, 1, 1, 0]);
        assert!(!reader.has_pending());
        assert!(lexer.next_token().unwrap().unwrap().is_close());
    }

    #[test]
    fn test_surplus_bits_carry_over() {
        let mut lexer = Lexer::new("011 x1", "bits");
        let mut reader = BitReader::new();
        assert_eq!(reader.read(&mut lexer, 2, close).unwrap(), vec![0, 1]);
        assert!(reader.has_pending());
        assert_eq!(reader.read(&mut lexer, 2, close).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_stop_token_is_pushed_back() {
        let mut lexer = Lexer::new("01 } 1", "bits");
        let mut reader = BitReader::new();
        assert_eq!(reader.read(&mut lexer, 3, close).unwrap(), vec![0, 1]);
        assert!(lexer.next_token().unwrap().unwrap().is_close());
    }

    #[test]
    fn test_pack() {
        assert_eq!(pack(&[1, 0, 1]), 0b101);
        assert_eq!(pack(&[0, 1]), 0b10);
        assert_eq!(pack(&[]), 0);
    }
}
