//! Bencode decoding and canonical encoding.
//!
//! Implements the four bencode kinds (integer, byte string, list, dictionary)
//! with strict single-document decoding and canonical re-encoding. Dictionary
//! keys are held in a `BTreeMap`, so byte-lexicographic key order is structural
//! and two semantically-equal dictionaries always re-encode identically. This
//! canonical form is what content hashes are derived from.

use std::collections::BTreeMap;

/// Maximum nesting depth accepted by the decoder.
///
/// Uploaded metadata is untrusted input; deeply nested documents are rejected
/// instead of recursing without bound.
pub const MAX_DEPTH: usize = 64;

/// A decoded bencode document node.
///
/// Dictionary keys are raw byte strings ordered byte-lexicographically by the
/// backing `BTreeMap`, which makes `encode` canonical by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dictionary(BTreeMap<Vec<u8>, Value>),
}

impl Value {
    /// Returns the integer payload, if this node is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the byte-string payload, if this node is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the list payload, if this node is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the dictionary payload, if this node is a dictionary.
    pub fn as_dictionary(&self) -> Option<&BTreeMap<Vec<u8>, Value>> {
        match self {
            Value::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a dictionary key, returning `None` for missing keys and
    /// non-dictionary nodes alike.
    pub fn lookup(&self, key: &[u8]) -> Option<&Value> {
        self.as_dictionary().and_then(|entries| entries.get(key))
    }
}

/// Errors that can occur while decoding a bencode document.
///
/// Decoding is all-or-nothing: any failure discards partial results and
/// reports the byte offset where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("Unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { offset: usize, byte: u8 },

    #[error("Malformed integer at offset {offset}")]
    InvalidInteger { offset: usize },

    #[error("Invalid string length prefix at offset {offset}")]
    InvalidLength { offset: usize },

    #[error("Trailing bytes after document: {remaining} remaining")]
    TrailingBytes { remaining: usize },

    #[error("Nesting exceeds maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Decodes a single bencode document.
///
/// Input must contain exactly one document; trailing bytes are rejected.
/// Dictionary keys may arrive unsorted (they are canonicalized on re-encode)
/// and duplicate keys resolve to the last occurrence.
///
/// # Errors
///
/// - `DecodeError::UnexpectedEnd` - Truncated document
/// - `DecodeError::UnexpectedByte` - Byte that opens no bencode kind
/// - `DecodeError::InvalidInteger` - Empty, non-decimal, or zero-padded integer
/// - `DecodeError::InvalidLength` - Malformed byte-string length prefix
/// - `DecodeError::TrailingBytes` - Data after the end of the document
/// - `DecodeError::DepthLimitExceeded` - Nesting deeper than `MAX_DEPTH`
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    let mut decoder = Decoder {
        input,
        position: 0,
    };
    let value = decoder.value(0)?;

    if decoder.position != input.len() {
        return Err(DecodeError::TrailingBytes {
            remaining: input.len() - decoder.position,
        });
    }

    Ok(value)
}

/// Encodes a value to its canonical byte form.
///
/// Dictionary keys are emitted in byte-lexicographic order, so any two equal
/// values produce identical bytes. Encoding cannot fail.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut output = Vec::new();
    encode_into(value, &mut output);
    output
}

fn encode_into(value: &Value, output: &mut Vec<u8>) {
    match value {
        Value::Integer(number) => {
            output.push(b'i');
            output.extend_from_slice(number.to_string().as_bytes());
            output.push(b'e');
        }
        Value::Bytes(bytes) => {
            output.extend_from_slice(bytes.len().to_string().as_bytes());
            output.push(b':');
            output.extend_from_slice(bytes);
        }
        Value::List(items) => {
            output.push(b'l');
            for item in items {
                encode_into(item, output);
            }
            output.push(b'e');
        }
        Value::Dictionary(entries) => {
            output.push(b'd');
            for (key, entry) in entries {
                output.extend_from_slice(key.len().to_string().as_bytes());
                output.push(b':');
                output.extend_from_slice(key);
                encode_into(entry, output);
            }
            output.push(b'e');
        }
    }
}

struct Decoder<'a> {
    input: &'a [u8],
    position: usize,
}

impl Decoder<'_> {
    fn value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded { limit: MAX_DEPTH });
        }

        match self.peek()? {
            b'i' => self.integer(),
            b'l' => self.list(depth),
            b'd' => self.dictionary(depth),
            b'0'..=b'9' => self.byte_string().map(Value::Bytes),
            byte => Err(DecodeError::UnexpectedByte {
                offset: self.position,
                byte,
            }),
        }
    }

    fn integer(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        self.position += 1; // consume 'i'

        let digits_start = self.position;
        if self.peek()? == b'-' {
            self.position += 1;
        }
        while self.position < self.input.len() && self.input[self.position].is_ascii_digit() {
            self.position += 1;
        }

        if self.position >= self.input.len() {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.position,
            });
        }
        if self.input[self.position] != b'e' {
            return Err(DecodeError::InvalidInteger { offset: start });
        }

        let digits = &self.input[digits_start..self.position];
        self.position += 1; // consume 'e'

        if !integer_digits_valid(digits) {
            return Err(DecodeError::InvalidInteger { offset: start });
        }

        let text = std::str::from_utf8(digits)
            .map_err(|_| DecodeError::InvalidInteger { offset: start })?;
        let number = text
            .parse::<i64>()
            .map_err(|_| DecodeError::InvalidInteger { offset: start })?;

        Ok(Value::Integer(number))
    }

    fn byte_string(&mut self) -> Result<Vec<u8>, DecodeError> {
        let start = self.position;
        while self.position < self.input.len() && self.input[self.position].is_ascii_digit() {
            self.position += 1;
        }

        if self.position >= self.input.len() {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.position,
            });
        }
        if self.input[self.position] != b':' {
            return Err(DecodeError::InvalidLength { offset: start });
        }

        let length_digits = &self.input[start..self.position];
        // "01:" style zero-padded lengths would break canonical round-trips.
        if length_digits.len() > 1 && length_digits[0] == b'0' {
            return Err(DecodeError::InvalidLength { offset: start });
        }

        let text = std::str::from_utf8(length_digits)
            .map_err(|_| DecodeError::InvalidLength { offset: start })?;
        let length = text
            .parse::<usize>()
            .map_err(|_| DecodeError::InvalidLength { offset: start })?;

        self.position += 1; // consume ':'
        let end = self
            .position
            .checked_add(length)
            .filter(|end| *end <= self.input.len())
            .ok_or(DecodeError::UnexpectedEnd {
                offset: self.input.len(),
            })?;

        let bytes = self.input[self.position..end].to_vec();
        self.position = end;

        Ok(bytes)
    }

    fn list(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.position += 1; // consume 'l'
        let mut items = Vec::new();

        loop {
            if self.peek()? == b'e' {
                self.position += 1;
                return Ok(Value::List(items));
            }
            items.push(self.value(depth + 1)?);
        }
    }

    fn dictionary(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.position += 1; // consume 'd'
        let mut entries = BTreeMap::new();

        loop {
            match self.peek()? {
                b'e' => {
                    self.position += 1;
                    return Ok(Value::Dictionary(entries));
                }
                b'0'..=b'9' => {
                    let key = self.byte_string()?;
                    let value = self.value(depth + 1)?;
                    // Last occurrence wins for duplicate keys.
                    entries.insert(key, value);
                }
                byte => {
                    return Err(DecodeError::UnexpectedByte {
                        offset: self.position,
                        byte,
                    });
                }
            }
        }
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.position)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd {
                offset: self.position,
            })
    }
}

/// Validates integer digit sequences: non-empty, no "-0", no leading zeros.
fn integer_digits_valid(digits: &[u8]) -> bool {
    let unsigned = match digits.split_first() {
        Some((b'-', rest)) => rest,
        _ => digits,
    };

    match unsigned {
        [] => false,
        [b'0'] => digits == b"0",
        [b'0', ..] => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn dict(entries: Vec<(&[u8], Value)>) -> Value {
        Value::Dictionary(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_vec(), value))
                .collect(),
        )
    }

    #[test]
    fn decodes_primitive_kinds() {
        assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
        assert_eq!(decode(b"i-17e").unwrap(), Value::Integer(-17));
        assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
        assert_eq!(decode(b"4:spam").unwrap(), Value::Bytes(b"spam".to_vec()));
        assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Vec::new()));
        assert_eq!(
            decode(b"l4:spami42ee").unwrap(),
            Value::List(vec![
                Value::Bytes(b"spam".to_vec()),
                Value::Integer(42)
            ])
        );
    }

    #[test]
    fn decodes_nested_dictionary() {
        let document = b"d4:infod6:lengthi1000e4:name8:test.txtee";
        let decoded = decode(document).unwrap();

        let info = decoded.lookup(b"info").unwrap();
        assert_eq!(info.lookup(b"length").unwrap().as_integer(), Some(1000));
        assert_eq!(
            info.lookup(b"name").unwrap().as_bytes(),
            Some(b"test.txt".as_slice())
        );
    }

    #[test]
    fn unsorted_keys_decode_equal_and_reencode_canonically() {
        let sorted = decode(b"d1:ai1e1:bi2ee").unwrap();
        let unsorted = decode(b"d1:bi2e1:ai1ee").unwrap();

        assert_eq!(sorted, unsorted);
        assert_eq!(encode(&unsorted), b"d1:ai1e1:bi2ee".to_vec());
    }

    #[test]
    fn duplicate_keys_resolve_to_last_occurrence() {
        let decoded = decode(b"d1:ai1e1:ai2ee").unwrap();
        assert_eq!(decoded.lookup(b"a").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn canonical_input_round_trips_byte_exact() {
        let documents: [&[u8]; 4] = [
            b"i42e",
            b"4:spam",
            b"l4:spami42ee",
            b"d4:infod6:lengthi1000e4:name8:test.txtee",
        ];

        for document in documents {
            let decoded = decode(document).unwrap();
            assert_eq!(encode(&decoded), document.to_vec());
        }
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(matches!(
            decode(b"i42").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            decode(b"4:spa").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            decode(b"l4:spam").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            decode(b"d4:spam").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(
            decode(b"i42etrailing").unwrap_err(),
            DecodeError::TrailingBytes { remaining: 8 }
        );
    }

    #[test]
    fn rejects_malformed_integers() {
        for document in [&b"ie"[..], b"i-e", b"i-0e", b"i042e", b"i4.2e", b"i 42e"] {
            assert!(
                matches!(
                    decode(document).unwrap_err(),
                    DecodeError::InvalidInteger { .. } | DecodeError::UnexpectedByte { .. }
                ),
                "expected rejection for {document:?}"
            );
        }
    }

    #[test]
    fn rejects_invalid_length_prefixes() {
        assert!(matches!(
            decode(b"01:a").unwrap_err(),
            DecodeError::InvalidLength { .. }
        ));
        assert!(matches!(
            decode(b"100:short").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn rejects_length_prefixes_past_address_space() {
        // usize::MAX: adding the length to the cursor must not wrap.
        assert!(matches!(
            decode(b"18446744073709551615:").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
        // One past usize::MAX fails the prefix parse itself.
        assert!(matches!(
            decode(b"18446744073709551616:").unwrap_err(),
            DecodeError::InvalidLength { .. }
        ));
        // Same guard inside a dictionary key position.
        assert!(matches!(
            decode(b"d18446744073709551615:").unwrap_err(),
            DecodeError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn rejects_non_string_dictionary_keys() {
        assert!(matches!(
            decode(b"di1ei2ee").unwrap_err(),
            DecodeError::UnexpectedByte { .. }
        ));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut document = Vec::new();
        document.extend(std::iter::repeat_n(b'l', MAX_DEPTH + 2));
        document.extend(std::iter::repeat_n(b'e', MAX_DEPTH + 2));

        assert_eq!(
            decode(&document).unwrap_err(),
            DecodeError::DepthLimitExceeded { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn encode_sorts_keys_built_out_of_order() {
        let value = dict(vec![
            (b"zebra", Value::Integer(1)),
            (b"apple", Value::Integer(2)),
        ]);

        assert_eq!(encode(&value), b"d5:applei2e5:zebrai1ee".to_vec());
    }

    fn arbitrary_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::Integer),
            prop::collection::vec(any::<u8>(), 0..24).prop_map(Value::Bytes),
        ];

        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
                prop::collection::btree_map(
                    prop::collection::vec(any::<u8>(), 0..12),
                    inner,
                    0..6
                )
                .prop_map(Value::Dictionary),
            ]
        })
    }

    proptest! {
        #[test]
        fn encode_decode_round_trips(value in arbitrary_value()) {
            let encoded = encode(&value);
            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(&decoded, &value);
            // Canonical form is a fixed point.
            prop_assert_eq!(encode(&decoded), encoded);
        }
    }
}
