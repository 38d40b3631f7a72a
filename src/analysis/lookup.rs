use crate::error::MfccError;

/// Number of entries in a byte-indexed decode table.
pub const LOOKUP_TABLE_LEN: usize = 256;

const PCM16_FULL_SCALE: f32 = 32_767.0;

/// Byte-to-amplitude mapping (e.g. u-law to linear) applied per sample while framing.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    entries: Box<[f32; LOOKUP_TABLE_LEN]>,
}

impl LookupTable {
    /// Build a table from exactly 256 finite amplitudes.
    pub fn new(entries: Vec<f32>) -> Result<Self, MfccError> {
        let len = entries.len();
        let entries: Box<[f32; LOOKUP_TABLE_LEN]> =
            entries
                .into_boxed_slice()
                .try_into()
                .map_err(|_| MfccError::LengthMismatch {
                    what: "lookup table",
                    expected: LOOKUP_TABLE_LEN,
                    actual: len,
                })?;
        crate::error::ensure_finite("lookup table", entries.as_slice())?;
        Ok(Self { entries })
    }

    /// Build a table from 16-bit PCM values, normalized to roughly `[-1, 1]`.
    pub fn from_pcm16(values: &[i16; LOOKUP_TABLE_LEN]) -> Self {
        let mut entries = Box::new([0.0_f32; LOOKUP_TABLE_LEN]);
        for (slot, &value) in entries.iter_mut().zip(values.iter()) {
            *slot = value as f32 / PCM16_FULL_SCALE;
        }
        Self { entries }
    }

    pub fn decode(&self, byte: u8) -> f32 {
        self.entries[byte as usize]
    }

    pub fn entries(&self) -> &[f32] {
        self.entries.as_slice()
    }
}
