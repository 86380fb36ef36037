// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical binary encoding for key material.
//!
//! Every key is written as a self-describing record:
//!
//! ```text
//! [version:u8][tag:u8][field_count:u16 BE]
//!   for each field:
//!     [len:u32 BE][field bytes]
//! ```
//!
//! Field order is fixed per key type. Integers are fixed-width big-endian,
//! big integers are minimal big-endian, strings are UTF-8. Decoding runs the
//! key's own constructor, so anything that decodes satisfies the same
//! invariants as a directly built key.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use num_bigint_dig::BigUint;
use zeroize::Zeroizing;

use crate::key::{
    AffineKey, Key, MonoalphabetKey, PermutationKey, RailfenceKey, RawSecretKey, RsaPrivateKey,
    RsaPublicKey, ShiftKey,
};
use crate::{Error, Result};

/// Record layout version.
pub const VERSION: u8 = 1;

const HEADER_LEN: usize = 4;

/// Longest field a record can carry, since field lengths are written as
/// `u32`. Key constructors reject material beyond it.
pub const MAX_FIELD_LEN: usize = u32::MAX as usize;

/// Fails with [`Error::KeyValidation`] when `len` bytes of `what` would not
/// fit in one record field.
pub(crate) fn check_field_len(len: usize, what: &str) -> Result<()> {
    if len > MAX_FIELD_LEN {
        return Err(Error::KeyValidation(format!(
            "{what} of {len} bytes exceeds the {MAX_FIELD_LEN}-byte record field limit"
        )));
    }
    Ok(())
}

/// Type tags written after the version byte.
pub mod tag {
    pub const RAW_SECRET: u8 = 1;
    pub const SHIFT: u8 = 2;
    pub const AFFINE: u8 = 3;
    pub const PERMUTATION: u8 = 4;
    pub const RAILFENCE: u8 = 5;
    pub const MONOALPHABET: u8 = 6;
    pub const RSA_PUBLIC: u8 = 7;
    pub const RSA_PRIVATE: u8 = 8;
}

/// A key type with a fixed record layout.
pub trait KeyRecord: Sized {
    const TAG: u8;

    fn write_fields(&self, record: &mut RecordWriter);

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self>;
}

/// Accumulates length-prefixed fields. Field buffers are wiped on drop
/// since private keys pass through here.
#[derive(Debug, Default)]
pub struct RecordWriter {
    fields: Vec<Zeroizing<Vec<u8>>>,
}

impl RecordWriter {
    pub fn bytes(&mut self, data: &[u8]) {
        self.fields.push(Zeroizing::new(data.to_vec()));
    }

    pub fn i64(&mut self, value: i64) {
        self.fields.push(Zeroizing::new(value.to_be_bytes().to_vec()));
    }

    pub fn u64(&mut self, value: u64) {
        self.fields.push(Zeroizing::new(value.to_be_bytes().to_vec()));
    }

    pub fn biguint(&mut self, value: &BigUint) {
        self.fields.push(Zeroizing::new(value.to_bytes_be()));
    }

    pub fn str(&mut self, value: &str) {
        self.fields.push(Zeroizing::new(value.as_bytes().to_vec()));
    }

    fn finish(self, tag: u8) -> Vec<u8> {
        let body: usize = self.fields.iter().map(|f| 4 + f.len()).sum();
        let mut out = Vec::with_capacity(HEADER_LEN + body);

        out.push(VERSION);
        out.push(tag);
        // Layouts have at most eight fields and constructors bound each one
        // by MAX_FIELD_LEN, so neither cast truncates.
        debug_assert!(self.fields.len() <= usize::from(u16::MAX));
        out.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for field in &self.fields {
            debug_assert!(field.len() <= MAX_FIELD_LEN);
            out.extend_from_slice(&(field.len() as u32).to_be_bytes());
            out.extend_from_slice(field);
        }

        out
    }
}

/// Yields the fields of a record in order.
#[derive(Debug)]
pub struct RecordReader<'a> {
    fields: std::vec::IntoIter<&'a [u8]>,
}

impl<'a> RecordReader<'a> {
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        self.fields.next().ok_or_else(|| malformed("record has too few fields"))
    }

    pub fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.fixed::<8>()?))
    }

    pub fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.fixed::<8>()?))
    }

    pub fn biguint(&mut self) -> Result<BigUint> {
        Ok(BigUint::from_bytes_be(self.bytes()?))
    }

    pub fn string(&mut self) -> Result<String> {
        let raw = self.bytes()?;
        String::from_utf8(raw.to_vec()).map_err(|_| malformed("string field is not UTF-8"))
    }

    fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let raw = self.bytes()?;
        raw.try_into().map_err(|_| malformed(format!("expected {N}-byte field, got {}", raw.len())))
    }
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedEncoding(msg.into())
}

/// Split a record into its tag and field slices.
fn parse(bytes: &[u8]) -> Result<(u8, Vec<&[u8]>)> {
    if bytes.len() < HEADER_LEN {
        return Err(malformed("record shorter than header"));
    }
    if bytes[0] != VERSION {
        return Err(malformed(format!("unsupported version {}", bytes[0])));
    }

    let tag = bytes[1];
    let count = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;

    let mut fields = Vec::with_capacity(count);
    let mut offset = HEADER_LEN;
    for _ in 0..count {
        let len_bytes = bytes
            .get(offset..offset + 4)
            .ok_or_else(|| malformed("truncated field length"))?;
        let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        offset += 4;

        let end = offset.checked_add(len).ok_or_else(|| malformed("field length overflow"))?;
        let field = bytes.get(offset..end).ok_or_else(|| malformed("truncated field"))?;
        fields.push(field);
        offset = end;
    }

    if offset != bytes.len() {
        return Err(malformed(format!("{} trailing bytes", bytes.len() - offset)));
    }

    Ok((tag, fields))
}

fn read_record<K: KeyRecord>(fields: Vec<&[u8]>) -> Result<K> {
    let mut reader = RecordReader { fields: fields.into_iter() };
    let key = K::read_fields(&mut reader)?;
    if reader.fields.next().is_some() {
        return Err(malformed("record has too many fields"));
    }
    Ok(key)
}

/// Encode a concrete key.
pub fn encode<K: KeyRecord>(key: &K) -> Vec<u8> {
    let mut writer = RecordWriter::default();
    key.write_fields(&mut writer);
    writer.finish(K::TAG)
}

/// Decode a concrete key, failing if the record holds a different type.
pub fn decode<K: KeyRecord>(bytes: &[u8]) -> Result<K> {
    let (found, fields) = parse(bytes)?;
    if found != K::TAG {
        return Err(malformed(format!("expected tag {}, found {found}", K::TAG)));
    }
    read_record(fields)
}

/// Encode any key.
pub fn encode_key(key: &Key) -> Vec<u8> {
    match key {
        Key::RawSecret(k) => encode(k),
        Key::Shift(k) => encode(k),
        Key::Affine(k) => encode(k),
        Key::Permutation(k) => encode(k),
        Key::Railfence(k) => encode(k),
        Key::Monoalphabet(k) => encode(k),
        Key::RsaPublic(k) => encode(k),
        Key::RsaPrivate(k) => encode(k),
    }
}

/// Decode any key, dispatching on the record tag.
pub fn decode_key(bytes: &[u8]) -> Result<Key> {
    let (found, fields) = parse(bytes)?;
    let key = match found {
        tag::RAW_SECRET => Key::RawSecret(read_record(fields)?),
        tag::SHIFT => Key::Shift(read_record(fields)?),
        tag::AFFINE => Key::Affine(read_record(fields)?),
        tag::PERMUTATION => Key::Permutation(read_record(fields)?),
        tag::RAILFENCE => Key::Railfence(read_record(fields)?),
        tag::MONOALPHABET => Key::Monoalphabet(read_record(fields)?),
        tag::RSA_PUBLIC => Key::RsaPublic(read_record(fields)?),
        tag::RSA_PRIVATE => Key::RsaPrivate(read_record(fields)?),
        other => return Err(malformed(format!("unknown key tag {other}"))),
    };
    Ok(key)
}

/// Stateless codec bound to one key type.
///
/// Holds no data, so a single instance can be shared freely between threads.
#[derive(Debug)]
pub struct KeyCodec<K>(PhantomData<fn() -> K>);

impl<K: KeyRecord> KeyCodec<K> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    pub fn encode(&self, key: &K) -> Vec<u8> {
        encode(key)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<K> {
        decode(bytes)
    }
}

impl<K: KeyRecord> Default for KeyCodec<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for KeyCodec<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for KeyCodec<K> {}

impl KeyRecord for RawSecretKey {
    const TAG: u8 = tag::RAW_SECRET;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.str(self.algorithm());
        record.bytes(self.as_bytes());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let algorithm = fields.string()?;
        RawSecretKey::new(algorithm, fields.bytes()?)
    }
}

impl KeyRecord for ShiftKey {
    const TAG: u8 = tag::SHIFT;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.i64(self.shift());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        Ok(ShiftKey::new(fields.i64()?))
    }
}

impl KeyRecord for AffineKey {
    const TAG: u8 = tag::AFFINE;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.i64(self.a());
        record.i64(self.b());
        record.u64(self.m());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let a = fields.i64()?;
        let b = fields.i64()?;
        let m = fields.u64()?;
        AffineKey::new(a, b, m)
    }
}

impl KeyRecord for PermutationKey {
    const TAG: u8 = tag::PERMUTATION;

    fn write_fields(&self, record: &mut RecordWriter) {
        let packed: Vec<u8> = self.order().iter().flat_map(|i| i.to_be_bytes()).collect();
        record.bytes(&packed);
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let packed = fields.bytes()?;
        if packed.len() % 4 != 0 {
            return Err(malformed("permutation field is not a u32 array"));
        }

        let order: Vec<u32> = packed
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        PermutationKey::new(&order)
    }
}

impl KeyRecord for RailfenceKey {
    const TAG: u8 = tag::RAILFENCE;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.u64(self.rails());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        RailfenceKey::new(fields.u64()?)
    }
}

impl KeyRecord for MonoalphabetKey {
    const TAG: u8 = tag::MONOALPHABET;

    fn write_fields(&self, record: &mut RecordWriter) {
        // BTreeMap iteration is ordered, which keeps the encoding canonical
        let packed: Vec<u8> = self.mapping().iter().flat_map(|(&k, &v)| [k, v]).collect();
        record.bytes(&packed);
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let packed = fields.bytes()?;
        if packed.len() % 2 != 0 {
            return Err(malformed("substitution field has an odd length"));
        }

        let mut mapping = BTreeMap::new();
        for pair in packed.chunks_exact(2) {
            if mapping.insert(pair[0], pair[1]).is_some() {
                return Err(malformed(format!("duplicate substitution for byte {}", pair[0])));
            }
        }
        MonoalphabetKey::new(mapping)
    }
}

impl KeyRecord for RsaPublicKey {
    const TAG: u8 = tag::RSA_PUBLIC;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.biguint(self.n());
        record.biguint(self.e());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let n = fields.biguint()?;
        let e = fields.biguint()?;
        RsaPublicKey::new(n, e)
    }
}

impl KeyRecord for RsaPrivateKey {
    const TAG: u8 = tag::RSA_PRIVATE;

    fn write_fields(&self, record: &mut RecordWriter) {
        record.biguint(self.n());
        record.biguint(self.p());
        record.biguint(self.q());
        record.biguint(self.e());
        record.biguint(self.d());
        record.biguint(self.dp());
        record.biguint(self.dq());
        record.biguint(self.qinv());
    }

    fn read_fields(fields: &mut RecordReader<'_>) -> Result<Self> {
        let n = fields.biguint()?;
        let p = fields.biguint()?;
        let q = fields.biguint()?;
        let e = fields.biguint()?;
        let d = fields.biguint()?;
        let dp = fields.biguint()?;
        let dq = fields.biguint()?;
        let qinv = fields.biguint()?;
        RsaPrivateKey::from_components(n, p, q, e, d, dp, dq, qinv)
    }
}
