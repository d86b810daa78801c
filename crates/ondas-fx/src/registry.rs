//! The algorithm registry.
//!
//! Exactly one registry of effect descriptors exists, indexed by
//! [`AlgorithmId`]. The set is closed and known at build time, so dispatch
//! is a variant replacement rather than dynamic plugin loading; the
//! descriptors carry the metadata a UI needs (name, parameter names).

/// Maximum number of real parameters any algorithm exposes.
pub const MAX_PARAMS: usize = 3;

/// Number of registered algorithms.
pub const EFFECT_COUNT: usize = 3;

/// Identifier of a registered algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlgorithmId {
    /// Placeholder slot; outputs silence.
    Bypass = 0,
    /// Voltage-controlled amplifier with gain slewing.
    Vca = 1,
    /// Crossfading delay line with feedback.
    CleanDelay = 2,
}

impl AlgorithmId {
    /// Look up an id from its wire/index form.
    ///
    /// Returns `None` for out-of-range indices; callers treat that as a
    /// no-op rather than an error.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Bypass),
            1 => Some(Self::Vca),
            2 => Some(Self::CleanDelay),
            _ => None,
        }
    }

    /// Index form of this id.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Describes a registered algorithm.
#[derive(Debug, Clone, Copy)]
pub struct EffectDescriptor {
    /// Algorithm this descriptor belongs to.
    pub id: AlgorithmId,
    /// Display name.
    pub name: &'static str,
    /// Number of real parameters (<= [`MAX_PARAMS`]).
    pub param_count: usize,
    /// Parameter display names; entries past `param_count` are empty.
    pub param_names: [&'static str; MAX_PARAMS],
}

static EFFECTS: [EffectDescriptor; EFFECT_COUNT] = [
    EffectDescriptor {
        id: AlgorithmId::Bypass,
        name: "Bypass",
        param_count: 3,
        param_names: ["p1", "p2", "p3"],
    },
    EffectDescriptor {
        id: AlgorithmId::Vca,
        name: "VCA",
        param_count: 1,
        param_names: ["Gain", "", ""],
    },
    EffectDescriptor {
        id: AlgorithmId::CleanDelay,
        name: "ClnDly",
        param_count: 3,
        param_names: ["DlyAmt", "Feedbk", "Range"],
    },
];

/// Get the descriptor for an algorithm.
pub fn descriptor(id: AlgorithmId) -> &'static EffectDescriptor {
    &EFFECTS[id.index() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_roundtrip() {
        for i in 0..EFFECT_COUNT as u8 {
            let id = AlgorithmId::from_index(i).unwrap();
            assert_eq!(id.index(), i);
        }
        assert_eq!(AlgorithmId::from_index(EFFECT_COUNT as u8), None);
        assert_eq!(AlgorithmId::from_index(255), None);
    }

    #[test]
    fn descriptors_consistent() {
        for i in 0..EFFECT_COUNT as u8 {
            let id = AlgorithmId::from_index(i).unwrap();
            let desc = descriptor(id);
            assert_eq!(desc.id, id);
            assert!(desc.param_count <= MAX_PARAMS);
            for name in desc.param_names.iter().take(desc.param_count) {
                assert!(!name.is_empty(), "{} has an unnamed parameter", desc.name);
            }
        }
    }

    #[test]
    fn names_match_hardware_labels() {
        assert_eq!(descriptor(AlgorithmId::Vca).name, "VCA");
        assert_eq!(descriptor(AlgorithmId::CleanDelay).param_names[0], "DlyAmt");
    }
}
