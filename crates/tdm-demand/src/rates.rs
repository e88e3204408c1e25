//! Land-use trip-rate tables and per-run rate resolution.
//!
//! Rates are trips per 1,000 sq. ft. of gross floor area, keyed by land-use
//! type and trip purpose.  A run resolves one purpose against either a
//! user-supplied table or the built-in defaults; types found in neither get
//! the [`FALLBACK_RATE`] and are surfaced through the unmatched lists.
//!
//! # User table format
//!
//! ```csv
//! building,production_rate1,attraction_rate1,production_rate2,attraction_rate2
//! school,1.37,0.9,0.4,0.2
//! office,1.15,0.4,,
//! ```
//!
//! Empty or unparsable rate cells contribute rate 0 for that purpose.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;

use tdm_core::TripPurpose;
use tdm_net::Poi;

use crate::DemandResult;

/// Rate assigned to a land-use type with no entry in any table.
pub const FALLBACK_RATE: f64 = 0.1;

// ── RateSource ────────────────────────────────────────────────────────────────

/// Where a resolved rate came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RateSource {
    /// Found in the table in effect (user-supplied or built-in defaults).
    Table,
    /// Neither table covered the type; [`FALLBACK_RATE`] assigned.
    Fallback,
}

/// A resolved production/attraction rate pair for one land-use type.
#[derive(Copy, Clone, Debug)]
pub struct RateEntry {
    pub production: f64,
    pub attraction: f64,
    pub production_source: RateSource,
    pub attraction_source: RateSource,
}

// ── RateBook ──────────────────────────────────────────────────────────────────

/// The full rate lookup: land-use type → purpose index → rate, one map per
/// direction.
pub struct RateBook {
    production: FxHashMap<String, FxHashMap<u8, f64>>,
    attraction: FxHashMap<String, FxHashMap<u8, f64>>,
}

impl RateBook {
    /// Load a user rate table from any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> DemandResult<RateBook> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let building_col = headers.iter().position(|h| h == "building");

        let mut production: FxHashMap<String, FxHashMap<u8, f64>> = FxHashMap::default();
        let mut attraction: FxHashMap<String, FxHashMap<u8, f64>> = FxHashMap::default();

        for record in csv_reader.records() {
            let record = record?;
            let Some(kind) = building_col.and_then(|c| record.get(c)) else {
                continue;
            };
            let prod_entry = production.entry(kind.to_owned()).or_default();
            let attr_entry = attraction.entry(kind.to_owned()).or_default();
            for purpose in TripPurpose::ALL {
                let p = purpose.index();
                prod_entry.insert(p, rate_cell(&headers, &record, "production_rate", p));
                attr_entry.insert(p, rate_cell(&headers, &record, "attraction_rate", p));
            }
        }

        Ok(RateBook { production, attraction })
    }

    /// Load the table at `path`, falling back to the built-in defaults when
    /// the file is absent or unreadable.
    pub fn load(path: Option<&Path>) -> RateBook {
        match path {
            Some(p) => match std::fs::File::open(p).map_err(Into::into).and_then(Self::from_reader) {
                Ok(book) => book,
                Err(e) => {
                    log::warn!("trip-rate table {p:?} unusable ({e}); using built-in defaults");
                    Self::builtin()
                }
            },
            None => {
                log::warn!("no trip-rate table given; using built-in defaults");
                Self::builtin()
            }
        }
    }

    /// The built-in default rates (ITE-style, purpose 1 only).
    ///
    /// Production coverage leans institutional/commercial/industrial;
    /// attraction coverage leans residential/assembly.
    pub fn builtin() -> RateBook {
        const PRODUCTION: &[(&str, f64)] = &[
            ("parking", 0.43),
            ("bicycle_parking", 0.43),
            ("digester", 0.4),
            ("service", 0.48),
            ("college", 1.17),
            ("university", 1.17),
            ("school", 1.37),
            ("university;yes", 1.17),
            ("kindergarten", 11.12),
            ("transportation", 1.72),
            ("train_station", 1.72),
            ("public", 0.11),
            ("public_building", 0.11),
            ("hospital", 0.97),
            ("government", 1.71),
            ("administrative/auxiliary", 1.71),
            ("fire_station", 0.48),
            ("bakehouse", 28.0),
            ("temple", 4.22),
            ("synagogue", 0.49),
            ("shrine", 4.22),
            ("religious", 0.49),
            ("mosque", 4.22),
            ("monastery", 4.22),
            ("church", 0.49),
            ("chapel", 0.49),
            ("cathedral", 0.49),
            ("warehouse", 0.19),
            ("retail", 6.84),
            ("supermarket", 9.24),
            ("office", 1.15),
            ("kiosk", 7.42),
            ("industrial", 0.63),
            ("commercial", 0.63),
            ("library", 1.17),
            ("childcare", 11.12),
            ("yes", 1.0),
        ];
        const ATTRACTION: &[(&str, f64)] = &[
            ("apartments", 0.36),
            ("bungalow", 0.99),
            ("cabin", 0.99),
            ("detached", 0.99),
            ("dormitory", 0.36),
            ("ger", 0.99),
            ("hotel", 0.6),
            ("house", 0.44),
            ("residential", 0.36),
            ("semidetached_house", 0.99),
            ("static_caravan", 0.46),
            ("terrace", 0.44),
            ("public", 0.11),
            ("grandstand", 0.15),
            ("pavilion", 6.29),
            ("riding_hall", 3.45),
            ("sports_hall", 3.45),
            ("stadium", 0.15),
            ("yes", 1.0),
        ];

        let purpose_one = TripPurpose::HomeBasedWork.index();
        let fold = |table: &[(&str, f64)]| {
            table
                .iter()
                .map(|&(kind, rate)| {
                    let mut per_purpose = FxHashMap::default();
                    per_purpose.insert(purpose_one, rate);
                    (kind.to_owned(), per_purpose)
                })
                .collect()
        };
        RateBook {
            production: fold(PRODUCTION),
            attraction: fold(ATTRACTION),
        }
    }

    fn production_rate(&self, kind: &str, purpose: TripPurpose) -> Option<f64> {
        self.production.get(kind)?.get(&purpose.index()).copied()
    }

    fn attraction_rate(&self, kind: &str, purpose: TripPurpose) -> Option<f64> {
        self.attraction.get(kind)?.get(&purpose.index()).copied()
    }
}

fn rate_cell(headers: &csv::StringRecord, record: &csv::StringRecord, prefix: &str, purpose: u8) -> f64 {
    let name = format!("{prefix}{purpose}");
    headers
        .iter()
        .position(|h| h == name)
        .and_then(|c| record.get(c))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

// ── ResolvedRates ─────────────────────────────────────────────────────────────

/// Per-run rates: one entry per land-use type occurring in the POI set,
/// resolved for the selected purpose.
#[derive(Debug)]
pub struct ResolvedRates {
    pub purpose: TripPurpose,
    entries: FxHashMap<String, RateEntry>,
    /// Types that fell back to the default production rate, deduplicated.
    pub unmatched_production: Vec<String>,
    /// Types that fell back to the default attraction rate, deduplicated.
    pub unmatched_attraction: Vec<String>,
    /// POIs (not types) whose production rate was unmatched.
    pub unmatched_production_count: usize,
    /// POIs (not types) whose attraction rate was unmatched.
    pub unmatched_attraction_count: usize,
}

impl ResolvedRates {
    /// Resolve rates for every POI's land-use type under `purpose`.
    pub fn resolve(book: &RateBook, pois: &[Poi], purpose: Option<TripPurpose>) -> ResolvedRates {
        let purpose = purpose.unwrap_or_else(|| {
            log::warn!("trip purpose not given; defaulting to purpose 1");
            TripPurpose::HomeBasedWork
        });

        let mut resolved = ResolvedRates {
            purpose,
            entries: FxHashMap::default(),
            unmatched_production: Vec::new(),
            unmatched_attraction: Vec::new(),
            unmatched_production_count: 0,
            unmatched_attraction_count: 0,
        };

        for poi in pois {
            let production = book.production_rate(&poi.kind, purpose);
            if production.is_none() {
                resolved.unmatched_production_count += 1;
                if !resolved.unmatched_production.contains(&poi.kind) {
                    resolved.unmatched_production.push(poi.kind.clone());
                    log::info!(
                        "no production rate for {:?} (purpose {purpose}); using {FALLBACK_RATE}",
                        poi.kind
                    );
                }
            }
            let attraction = book.attraction_rate(&poi.kind, purpose);
            if attraction.is_none() {
                resolved.unmatched_attraction_count += 1;
                if !resolved.unmatched_attraction.contains(&poi.kind) {
                    resolved.unmatched_attraction.push(poi.kind.clone());
                    log::info!(
                        "no attraction rate for {:?} (purpose {purpose}); using {FALLBACK_RATE}",
                        poi.kind
                    );
                }
            }

            resolved.entries.insert(
                poi.kind.clone(),
                RateEntry {
                    production: production.unwrap_or(FALLBACK_RATE),
                    attraction: attraction.unwrap_or(FALLBACK_RATE),
                    production_source: source_of(production),
                    attraction_source: source_of(attraction),
                },
            );
        }

        log::info!(
            "POIs with unmatched production rate = {}, unmatched attraction rate = {}",
            resolved.unmatched_production_count,
            resolved.unmatched_attraction_count
        );
        resolved
    }

    /// The resolved entry for a land-use type, if any POI carried it.
    pub fn entry(&self, kind: &str) -> Option<&RateEntry> {
        self.entries.get(kind)
    }

    /// Entries sorted by type name, for deterministic table output.
    pub fn sorted_entries(&self) -> Vec<(&str, &RateEntry)> {
        let mut entries: Vec<(&str, &RateEntry)> =
            self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}

fn source_of(rate: Option<f64>) -> RateSource {
    if rate.is_some() {
        RateSource::Table
    } else {
        RateSource::Fallback
    }
}
