use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

pub const ARCHETYPE_SPEED_MIN: i64 = 1;
pub const ARCHETYPE_SPEED_MAX: i64 = 10;
pub const ARCHETYPE_SPAWN_RATE_MIN: i64 = 1;
pub const ARCHETYPE_SPAWN_RATE_MAX: i64 = 100;

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(SizeClass, "size", {
    Small => "Small",
    Medium => "Medium",
    Large => "Large",
});

text_enum!(Material, "material", {
    Rock => "Rock",
    Iron => "Iron",
    Crystal => "Crystal",
});

text_enum!(AsteroidKind, "type", {
    Normal => "Normal",
    Rare => "Rare",
    Boss => "Boss",
});

/// Validated catalog record, before it is given an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub size: SizeClass,
    pub speed: i64,
    pub material: Material,
    pub kind: AsteroidKind,
    pub spawn_rate: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArchetypeError {
    Unknown(UnknownVariant),
    SpeedOutOfRange(i64),
    SpawnRateOutOfRange(i64),
}

impl fmt::Display for ArchetypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(err) => write!(f, "{err}"),
            Self::SpeedOutOfRange(value) => write!(
                f,
                "speed must be between {ARCHETYPE_SPEED_MIN} and {ARCHETYPE_SPEED_MAX}, got {value}"
            ),
            Self::SpawnRateOutOfRange(value) => write!(
                f,
                "spawn_rate must be between {ARCHETYPE_SPAWN_RATE_MIN} and {ARCHETYPE_SPAWN_RATE_MAX}, got {value}"
            ),
        }
    }
}

impl std::error::Error for ArchetypeError {}

impl From<UnknownVariant> for ArchetypeError {
    fn from(err: UnknownVariant) -> Self {
        Self::Unknown(err)
    }
}

impl ArchetypeSpec {
    /// Builds an archetype from loosely typed fields (request bodies, stored rows).
    pub fn parse(
        size: &str,
        speed: i64,
        material: &str,
        kind: &str,
        spawn_rate: i64,
    ) -> Result<Self, ArchetypeError> {
        let spec = Self {
            size: size.parse()?,
            speed,
            material: material.parse()?,
            kind: kind.parse()?,
            spawn_rate,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ArchetypeError> {
        if !(ARCHETYPE_SPEED_MIN..=ARCHETYPE_SPEED_MAX).contains(&self.speed) {
            return Err(ArchetypeError::SpeedOutOfRange(self.speed));
        }
        if !(ARCHETYPE_SPAWN_RATE_MIN..=ARCHETYPE_SPAWN_RATE_MAX).contains(&self.spawn_rate) {
            return Err(ArchetypeError::SpawnRateOutOfRange(self.spawn_rate));
        }
        Ok(())
    }
}
