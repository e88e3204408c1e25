//! Trip purpose enumeration.

use std::fmt;

/// The trip purpose a demand run is computed for.
///
/// Purposes follow the conventional three-way split used by trip-rate
/// manuals; rate tables carry one production/attraction column pair per
/// purpose index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum TripPurpose {
    /// Purpose 1: home-based work.
    #[default]
    HomeBasedWork,
    /// Purpose 2: home-based other.
    HomeBasedOther,
    /// Purpose 3: non-home-based.
    NonHomeBased,
}

impl TripPurpose {
    pub const ALL: [TripPurpose; 3] = [
        TripPurpose::HomeBasedWork,
        TripPurpose::HomeBasedOther,
        TripPurpose::NonHomeBased,
    ];

    /// The 1-based purpose index used in rate-table column names.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            TripPurpose::HomeBasedWork => 1,
            TripPurpose::HomeBasedOther => 2,
            TripPurpose::NonHomeBased => 3,
        }
    }

    /// Resolve a 1-based purpose index; `None` for anything outside 1..=3.
    pub fn from_index(index: u8) -> Option<TripPurpose> {
        match index {
            1 => Some(TripPurpose::HomeBasedWork),
            2 => Some(TripPurpose::HomeBasedOther),
            3 => Some(TripPurpose::NonHomeBased),
            _ => None,
        }
    }
}

impl fmt::Display for TripPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
