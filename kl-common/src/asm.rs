//! Per-unit tagged envelope for mode basis records.

use crate::{KarhunenLoeve, ModeError, Result};
use serde::{Deserialize, Serialize};

/// A mode basis record tagged with the mirror unit it belongs to.
///
/// The envelope adds nothing but the unit discriminant: on the wire it is
/// the discriminant followed by the plain [`KarhunenLoeve`] encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Asm {
    S1(KarhunenLoeve),
    S2(KarhunenLoeve),
    S3(KarhunenLoeve),
    S4(KarhunenLoeve),
    S5(KarhunenLoeve),
    S6(KarhunenLoeve),
    S7(KarhunenLoeve),
}

impl Asm {
    /// Number of mirror units
    pub const N_UNITS: usize = 7;

    /// Wraps a record in the envelope of unit `sid` (1-based).
    pub fn new(sid: usize, kl: KarhunenLoeve) -> Result<Self> {
        match sid {
            1 => Ok(Asm::S1(kl)),
            2 => Ok(Asm::S2(kl)),
            3 => Ok(Asm::S3(kl)),
            4 => Ok(Asm::S4(kl)),
            5 => Ok(Asm::S5(kl)),
            6 => Ok(Asm::S6(kl)),
            7 => Ok(Asm::S7(kl)),
            _ => Err(ModeError::UnitId(sid)),
        }
    }

    /// Returns the 1-based unit id
    pub fn sid(&self) -> usize {
        match self {
            Asm::S1(_) => 1,
            Asm::S2(_) => 2,
            Asm::S3(_) => 3,
            Asm::S4(_) => 4,
            Asm::S5(_) => 5,
            Asm::S6(_) => 6,
            Asm::S7(_) => 7,
        }
    }

    /// Returns the unit label, also the stem of the unit's data file name
    pub fn tag(&self) -> String {
        format!("M2S{}", self.sid())
    }

    /// Returns the wrapped record
    pub fn segment(&self) -> &KarhunenLoeve {
        match self {
            Asm::S1(kl) | Asm::S2(kl) | Asm::S3(kl) | Asm::S4(kl) | Asm::S5(kl) | Asm::S6(kl)
            | Asm::S7(kl) => kl,
        }
    }

    /// Unwraps the record
    pub fn into_segment(self) -> KarhunenLoeve {
        match self {
            Asm::S1(kl) | Asm::S2(kl) | Asm::S3(kl) | Asm::S4(kl) | Asm::S5(kl) | Asm::S6(kl)
            | Asm::S7(kl) => kl,
        }
    }

    /// Encodes the tagged record to its wire format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.segment().validate()?;
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a tagged record and re-checks the shape invariants.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let asm: Self = bincode::deserialize(bytes)?;
        asm.segment().validate()?;
        Ok(asm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KarhunenLoeve {
        KarhunenLoeve::new(2, vec![1.0, 2.0, 3.0, 4.0], vec![true, false]).unwrap()
    }

    #[test]
    fn roundtrip() {
        let asm = Asm::new(5, sample()).unwrap();
        let bytes = asm.encode().unwrap();
        assert_eq!(Asm::decode(&bytes).unwrap(), asm);
    }

    #[test]
    fn envelope_wraps_plain_encoding() {
        let kl = sample();
        let plain = kl.encode().unwrap();
        for sid in 1..=Asm::N_UNITS {
            let tagged = Asm::new(sid, kl.clone()).unwrap().encode().unwrap();
            // 0-based u32 discriminant, then the plain record bytes
            assert_eq!(&tagged[..4], &((sid as u32) - 1).to_le_bytes());
            assert_eq!(&tagged[4..], plain.as_slice());
        }
    }

    #[test]
    fn tags() {
        for (sid, tag) in (1..=7).zip(["M2S1", "M2S2", "M2S3", "M2S4", "M2S5", "M2S6", "M2S7"]) {
            let asm = Asm::new(sid, sample()).unwrap();
            assert_eq!(asm.sid(), sid);
            assert_eq!(asm.tag(), tag);
        }
    }

    #[test]
    fn unit_id_out_of_range() {
        assert!(matches!(Asm::new(0, sample()), Err(ModeError::UnitId(0))));
        assert!(matches!(Asm::new(8, sample()), Err(ModeError::UnitId(8))));
    }

    #[test]
    fn encode_revalidates_segment() {
        let mut kl = sample();
        kl.n_mode = 3;
        let asm = Asm::new(1, kl).unwrap();
        assert!(asm.encode().is_err());
    }

    #[test]
    fn segment_access() {
        let kl = sample();
        let asm = Asm::new(2, kl.clone()).unwrap();
        assert_eq!(asm.segment(), &kl);
        assert_eq!(asm.into_segment(), kl);
    }
}
