use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed set of string-backed variants.
///
/// The storage representation (`as_str`) is the snake_case variant name, which
/// is also what serde emits, so a value read back from the database or a CSV
/// file parses with the same spelling.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
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
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    Sex as "sex" {
        Female => "female",
        Male => "male",
    }
}

string_enum! {
    /// Age class of an animal as recorded at registration.
    LifecycleStage as "lifecycle stage" {
        Calf => "calf",
        Heifer => "heifer",
        AdultCow => "adult_cow",
        Bull => "bull",
    }
}

string_enum! {
    AnimalStatus as "animal status" {
        Active => "active",
        Sold => "sold",
        Deceased => "deceased",
    }
}

string_enum! {
    MilkSession as "milking session" {
        Morning => "morning",
        Evening => "evening",
    }
}

string_enum! {
    /// Where a milk yield went after collection.
    MilkUsage as "milk usage" {
        Sale => "sale",
        HomeUse => "home_use",
        CalfFeeding => "calf_feeding",
    }
}

string_enum! {
    BreedingEventType as "breeding event type" {
        Heat => "heat",
        Insemination => "insemination",
        PregnancyCheck => "pregnancy_check",
        Calving => "calving",
    }
}

string_enum! {
    BreedingMethod as "breeding method" {
        Natural => "natural",
        Artificial => "artificial",
    }
}

string_enum! {
    BreedingOutcome as "breeding outcome" {
        Pending => "pending",
        Confirmed => "confirmed",
        Failed => "failed",
        LiveCalf => "live_calf",
        Stillborn => "stillborn",
    }
}

string_enum! {
    HealthRecordType as "health record type" {
        Vaccination => "vaccination",
        Treatment => "treatment",
        Checkup => "checkup",
        Deworming => "deworming",
    }
}

string_enum! {
    CropStatus as "crop status" {
        Sowing => "sowing",
        Growing => "growing",
        ReadyForHarvest => "ready_for_harvest",
        Harvested => "harvested",
    }
}

string_enum! {
    WorkerStatus as "worker status" {
        Active => "active",
        Inactive => "inactive",
    }
}

string_enum! {
    AttendanceStatus as "attendance status" {
        Present => "present",
        Absent => "absent",
        HalfDay => "half_day",
        Leave => "leave",
    }
}

string_enum! {
    EquipmentStatus as "equipment status" {
        Operational => "operational",
        UnderMaintenance => "under_maintenance",
        Retired => "retired",
    }
}

string_enum! {
    /// Whether a ledger entry brings money in or sends it out.
    Direction as "transaction direction" {
        Income => "income",
        Expense => "expense",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_spelling_round_trips() {
        for stage in LifecycleStage::ALL {
            assert_eq!(stage.as_str().parse::<LifecycleStage>().unwrap(), *stage);
        }
        assert_eq!(AttendanceStatus::HalfDay.as_str(), "half_day");
    }

    #[test]
    fn unknown_spelling_is_rejected() {
        let err = "Income".parse::<Direction>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownVariant { kind: "transaction direction", .. }
        ));
    }

    #[test]
    fn serde_uses_storage_spelling() {
        let json = serde_json::to_string(&MilkUsage::CalfFeeding).unwrap();
        assert_eq!(json, "\"calf_feeding\"");
    }
}
