//! Odds table and draw engine.
//!
//! A case's drops are laid out as contiguous, non-overlapping half-open ranges
//! over a draw space of size `W`. One uniform roll in `[0, W)` picks the drop
//! whose range contains it. The display reel is generated afterwards from the
//! already-resolved winner and never feeds back into the draw.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::entities::{Case, CaseDrop, DropOdds};
use crate::errors::DrawError;

pub const DEFAULT_DRAW_SPACE: u64 = 100_000;

pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. Callers never pass a zero bound.
    fn next_roll(&mut self, bound: u64) -> u64;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_roll(&mut self, bound: u64) -> u64 {
        self.0.gen_range(0..bound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// Drops carry explicit ranges over a fixed draw space.
    Ranged,
    /// Drops carry weights; the draw space is their sum.
    Weighted,
}

impl PartitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionMode::Ranged => "ranged",
            PartitionMode::Weighted => "weighted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    pub drop: CaseDrop,
    pub lo: u64,
    pub hi: u64,
}

impl PartitionEntry {
    pub fn weight(&self) -> u64 {
        self.hi - self.lo
    }

    pub fn contains(&self, roll: u64) -> bool {
        self.lo <= roll && roll < self.hi
    }
}

#[derive(Debug, Clone)]
pub struct PartitionTable {
    // Sorted by `lo`; never empty.
    entries: Vec<PartitionEntry>,
    // Indices of positive-width entries; both `lo` and `hi` ascend along it. Never empty.
    searchable: Vec<usize>,
    draw_space: u64,
    mode: PartitionMode,
    gaps: Vec<(u64, u64)>,
}

impl PartitionTable {
    fn new(
        entries: Vec<PartitionEntry>,
        draw_space: u64,
        mode: PartitionMode,
        gaps: Vec<(u64, u64)>,
    ) -> Self {
        let searchable = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.hi > entry.lo)
            .map(|(idx, _)| idx)
            .collect();
        Self {
            entries,
            searchable,
            draw_space,
            mode,
            gaps,
        }
    }

    pub fn entries(&self) -> &[PartitionEntry] {
        &self.entries
    }

    pub fn draw_space(&self) -> u64 {
        self.draw_space
    }

    pub fn mode(&self) -> PartitionMode {
        self.mode
    }

    /// Uncovered `[lo, hi)` stretches of the draw space. Always empty in weighted mode.
    pub fn gaps(&self) -> &[(u64, u64)] {
        &self.gaps
    }

    pub fn probability(&self, entry: &PartitionEntry) -> f64 {
        entry.weight() as f64 / self.draw_space as f64
    }

    /// Catalog drops in partition order.
    pub fn drops(&self) -> Vec<CaseDrop> {
        self.entries.iter().map(|entry| entry.drop.clone()).collect()
    }

    /// SHA-256 over the mode, draw space and every `(id, lo, hi)` triple.
    /// Two tables with the same fingerprint map every roll to the same drop id.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.mode.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(self.draw_space.to_string().as_bytes());
        for entry in &self.entries {
            hasher.update(format!("|{}:{}:{}", entry.drop.id, entry.lo, entry.hi).as_bytes());
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    /// Highest positive-width entry; zero-width drops never win.
    fn fallback_entry(&self) -> &PartitionEntry {
        let idx = self
            .searchable
            .last()
            .copied()
            .unwrap_or(self.entries.len() - 1);
        &self.entries[idx]
    }
}

/// Checks everything that makes `case` openable and returns its partition.
///
/// Prices are checked here rather than in [`build_partition`] so that every
/// path deciding whether a case may be opened agrees on the same rules.
pub fn validate_case(case: &Case, ranged_draw_space: u64) -> Result<PartitionTable, DrawError> {
    if case.price.is_negative() {
        return Err(DrawError::InvalidCase(format!(
            "case '{}' has a negative price {}",
            case.url_name, case.price
        )));
    }
    if let Some(drop) = case.drops.iter().find(|drop| drop.skin_price.is_negative()) {
        return Err(DrawError::InvalidCase(format!(
            "drop '{}' has a negative skin price {}",
            drop.id, drop.skin_price
        )));
    }
    build_partition(&case.drops, ranged_draw_space)
}

/// Lays out `drops` over the draw space.
///
/// Ranged drops use `ranged_draw_space` as `W`; weighted drops are sorted by id
/// and stacked from zero, so `W` is the total weight. Both layouts are a pure
/// function of the input.
pub fn build_partition(
    drops: &[CaseDrop],
    ranged_draw_space: u64,
) -> Result<PartitionTable, DrawError> {
    if drops.is_empty() {
        return Err(DrawError::InvalidCase("case has no drops".to_string()));
    }

    let mut seen = HashSet::new();
    let mut ranged = Vec::new();
    let mut weighted = Vec::new();
    for drop in drops {
        if drop.id.trim().is_empty() {
            return Err(DrawError::InvalidCase("drop id must not be empty".to_string()));
        }
        if !seen.insert(drop.id.as_str()) {
            return Err(DrawError::InvalidCase(format!(
                "duplicate drop id '{}'",
                drop.id
            )));
        }
        match drop.odds() {
            Some(DropOdds::Range { lo, hi }) => ranged.push((drop, lo, hi)),
            Some(DropOdds::Weight(weight)) => weighted.push((drop, weight)),
            None => {
                return Err(DrawError::InvalidCase(format!(
                    "drop '{}' must carry exactly one of odds_range or weight",
                    drop.id
                )))
            }
        }
    }

    if !ranged.is_empty() && !weighted.is_empty() {
        return Err(DrawError::InvalidCase(
            "drops mix odds ranges and weights".to_string(),
        ));
    }

    if weighted.is_empty() {
        build_ranged(ranged, ranged_draw_space)
    } else {
        build_weighted(weighted)
    }
}

fn build_ranged(
    mut ranged: Vec<(&CaseDrop, u64, u64)>,
    draw_space: u64,
) -> Result<PartitionTable, DrawError> {
    if draw_space == 0 {
        return Err(DrawError::InvalidCase("draw space must be positive".to_string()));
    }
    ranged.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));

    let mut entries = Vec::with_capacity(ranged.len());
    let mut gaps = Vec::new();
    let mut cursor = 0u64;
    let mut total = 0u64;
    for (drop, lo, hi) in ranged {
        if hi < lo {
            return Err(DrawError::InvalidCase(format!(
                "drop '{}' has inverted range [{}, {})",
                drop.id, lo, hi
            )));
        }
        if hi > draw_space {
            return Err(DrawError::InvalidCase(format!(
                "drop '{}' range [{}, {}) exceeds draw space {}",
                drop.id, lo, hi, draw_space
            )));
        }
        if hi > lo {
            if lo < cursor {
                return Err(DrawError::InvalidCase(format!(
                    "drop '{}' range [{}, {}) overlaps a previous range ending at {}",
                    drop.id, lo, hi, cursor
                )));
            }
            if lo > cursor {
                gaps.push((cursor, lo));
            }
            cursor = hi;
            total += hi - lo;
        }
        entries.push(PartitionEntry {
            drop: drop.clone(),
            lo,
            hi,
        });
    }
    if total == 0 {
        return Err(DrawError::InvalidCase("total drop weight is zero".to_string()));
    }
    if cursor < draw_space {
        gaps.push((cursor, draw_space));
    }

    Ok(PartitionTable::new(entries, draw_space, PartitionMode::Ranged, gaps))
}

fn build_weighted(mut weighted: Vec<(&CaseDrop, u64)>) -> Result<PartitionTable, DrawError> {
    weighted.sort_by(|a, b| a.0.id.cmp(&b.0.id));

    let mut entries = Vec::with_capacity(weighted.len());
    let mut cursor = 0u64;
    for (drop, weight) in weighted {
        let hi = cursor
            .checked_add(weight)
            .ok_or_else(|| DrawError::InvalidCase("total drop weight overflows".to_string()))?;
        entries.push(PartitionEntry {
            drop: drop.clone(),
            lo: cursor,
            hi,
        });
        cursor = hi;
    }
    if cursor == 0 {
        return Err(DrawError::InvalidCase("total drop weight is zero".to_string()));
    }

    Ok(PartitionTable::new(
        entries,
        cursor,
        PartitionMode::Weighted,
        Vec::new(),
    ))
}

/// Raised when a roll lands outside every range; the draw still resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataIntegrityWarning {
    pub roll: u64,
    pub draw_space: u64,
    pub fallback_drop_id: String,
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "roll {} matched no range in draw space {}, fell back to '{}'",
            self.roll, self.draw_space, self.fallback_drop_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub drop: CaseDrop,
    pub roll: u64,
    pub integrity: Option<DataIntegrityWarning>,
}

pub fn draw(table: &PartitionTable, source: &mut dyn RandomSource) -> DrawOutcome {
    let roll = source.next_roll(table.draw_space);
    draw_with_roll(table, roll)
}

/// Maps a known roll onto the table. Used by [`draw`] and to re-verify
/// historical openings.
pub fn draw_with_roll(table: &PartitionTable, roll: u64) -> DrawOutcome {
    let pos = table
        .searchable
        .partition_point(|&idx| table.entries[idx].hi <= roll);
    if let Some(entry) = table.searchable.get(pos).map(|&idx| &table.entries[idx]) {
        if entry.contains(roll) {
            return DrawOutcome {
                drop: entry.drop.clone(),
                roll,
                integrity: None,
            };
        }
    }

    let fallback = table.fallback_entry();
    DrawOutcome {
        drop: fallback.drop.clone(),
        roll,
        integrity: Some(DataIntegrityWarning {
            roll,
            draw_space: table.draw_space,
            fallback_drop_id: fallback.drop.id.clone(),
        }),
    }
}

/// Builds the decoy reel: every slot but `winning_position` is a uniform pick
/// from the whole catalog, and `winning_position` holds `winner`.
pub fn generate_display_sequence<T: Clone>(
    catalog: &[T],
    winner: &T,
    length: usize,
    winning_position: usize,
    source: &mut dyn RandomSource,
) -> Result<Vec<T>, DrawError> {
    if catalog.is_empty() {
        return Err(DrawError::InvalidCase("case has no drops".to_string()));
    }
    if winning_position >= length {
        return Err(DrawError::InvalidReel {
            length,
            position: winning_position,
        });
    }

    let bound = catalog.len() as u64;
    let mut reel = Vec::with_capacity(length);
    for idx in 0..length {
        if idx == winning_position {
            reel.push(winner.clone());
        } else {
            let pick = (source.next_roll(bound) % bound) as usize;
            reel.push(catalog[pick].clone());
        }
    }
    Ok(reel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Money;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedRoll(u64);

    impl RandomSource for FixedRoll {
        fn next_roll(&mut self, _bound: u64) -> u64 {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingSource {
        bounds: Vec<u64>,
        next: u64,
    }

    impl RandomSource for RecordingSource {
        fn next_roll(&mut self, bound: u64) -> u64 {
            self.bounds.push(bound);
            self.next += 1;
            self.next % bound
        }
    }

    fn drop_with(id: &str, odds_range: Option<[u64; 2]>, weight: Option<u64>) -> CaseDrop {
        CaseDrop {
            id: id.to_string(),
            global_inv_id: format!("g-{id}"),
            weapon_name: "AWP".to_string(),
            skin_name: id.to_uppercase(),
            skin_quality: "Factory New".to_string(),
            skin_rarity: "Covert".to_string(),
            stattrak: false,
            skin_price: Money::from_cents(100),
            skin_img_source: None,
            odds_range,
            weight,
        }
    }

    fn ranged(id: &str, lo: u64, hi: u64) -> CaseDrop {
        drop_with(id, Some([lo, hi]), None)
    }

    fn weighted(id: &str, weight: u64) -> CaseDrop {
        drop_with(id, None, Some(weight))
    }

    fn two_drop_table() -> PartitionTable {
        build_partition(
            &[ranged("b", 30_000, 100_000), ranged("a", 0, 30_000)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition")
    }

    #[test]
    fn ranged_partition_covers_draw_space_exactly() {
        let table = build_partition(
            &[
                ranged("c", 90_000, 100_000),
                ranged("a", 0, 25_000),
                ranged("b", 25_000, 90_000),
            ],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");

        let entries = table.entries();
        assert_eq!(entries.first().map(|e| e.lo), Some(0));
        assert_eq!(entries.last().map(|e| e.hi), Some(DEFAULT_DRAW_SPACE));
        for pair in entries.windows(2) {
            assert_eq!(pair[0].hi, pair[1].lo);
        }
        assert!(table.gaps().is_empty());
        let total: u64 = entries.iter().map(PartitionEntry::weight).sum();
        assert_eq!(total, table.draw_space());
    }

    #[test]
    fn weighted_partition_is_deterministic_regardless_of_input_order() {
        let forward = build_partition(
            &[weighted("knife", 2), weighted("glove", 3), weighted("mil-spec", 95)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");
        let shuffled = build_partition(
            &[weighted("mil-spec", 95), weighted("knife", 2), weighted("glove", 3)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");

        assert_eq!(forward.draw_space(), 100);
        assert_eq!(forward.entries(), shuffled.entries());
        assert_eq!(forward.fingerprint(), shuffled.fingerprint());
        let ids: Vec<_> = forward.entries().iter().map(|e| e.drop.id.as_str()).collect();
        assert_eq!(ids, vec!["glove", "knife", "mil-spec"]);
        assert_eq!((forward.entries()[0].lo, forward.entries()[0].hi), (0, 3));
        assert_eq!((forward.entries()[2].lo, forward.entries()[2].hi), (5, 100));
    }

    #[test]
    fn empty_drop_list_is_an_invalid_case() {
        let err = build_partition(&[], DEFAULT_DRAW_SPACE).expect_err("empty case");
        assert!(matches!(err, DrawError::InvalidCase(_)));
    }

    #[test]
    fn zero_total_weight_is_an_invalid_case() {
        let err = build_partition(&[weighted("a", 0), weighted("b", 0)], DEFAULT_DRAW_SPACE)
            .expect_err("zero weight");
        assert!(matches!(err, DrawError::InvalidCase(_)));

        let err = build_partition(&[ranged("a", 10, 10)], DEFAULT_DRAW_SPACE)
            .expect_err("zero width");
        assert!(matches!(err, DrawError::InvalidCase(_)));
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        let overlap = build_partition(
            &[ranged("a", 0, 50_001), ranged("b", 50_000, 100_000)],
            DEFAULT_DRAW_SPACE,
        );
        assert!(matches!(overlap, Err(DrawError::InvalidCase(_))));

        let overflow = build_partition(&[ranged("a", 0, 100_001)], DEFAULT_DRAW_SPACE);
        assert!(matches!(overflow, Err(DrawError::InvalidCase(_))));

        let inverted = build_partition(&[ranged("a", 10, 5)], DEFAULT_DRAW_SPACE);
        assert!(matches!(inverted, Err(DrawError::InvalidCase(_))));

        let mixed = build_partition(&[ranged("a", 0, 10), weighted("b", 5)], DEFAULT_DRAW_SPACE);
        assert!(matches!(mixed, Err(DrawError::InvalidCase(_))));

        let duplicate = build_partition(
            &[ranged("a", 0, 50_000), ranged("a", 50_000, 100_000)],
            DEFAULT_DRAW_SPACE,
        );
        assert!(matches!(duplicate, Err(DrawError::InvalidCase(_))));
    }

    #[test]
    fn fixed_roll_selects_the_containing_range() {
        let table = two_drop_table();
        assert_eq!(draw(&table, &mut FixedRoll(0)).drop.id, "a");
        assert_eq!(draw(&table, &mut FixedRoll(29_999)).drop.id, "a");
        assert_eq!(draw(&table, &mut FixedRoll(30_000)).drop.id, "b");
        assert_eq!(draw(&table, &mut FixedRoll(99_999)).drop.id, "b");
    }

    #[test]
    fn every_roll_maps_to_exactly_one_drop() {
        let table = build_partition(
            &[weighted("a", 3), weighted("b", 0), weighted("c", 5), weighted("d", 2)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");
        for roll in 0..table.draw_space() {
            let outcome = draw_with_roll(&table, roll);
            assert!(outcome.integrity.is_none());
            let holders = table
                .entries()
                .iter()
                .filter(|entry| entry.contains(roll))
                .count();
            assert_eq!(holders, 1);
            assert_ne!(outcome.drop.id, "b");
        }
    }

    #[test]
    fn roll_in_gap_falls_back_to_last_drop_with_warning() {
        let table = build_partition(
            &[ranged("a", 0, 40_000), ranged("b", 60_000, 90_000)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("gaps are tolerated");
        assert_eq!(table.gaps(), &[(40_000, 60_000), (90_000, 100_000)]);

        let outcome = draw(&table, &mut FixedRoll(50_000));
        assert_eq!(outcome.drop.id, "b");
        let warning = outcome.integrity.expect("integrity warning");
        assert_eq!(warning.roll, 50_000);
        assert_eq!(warning.fallback_drop_id, "b");

        let past_end = draw(&table, &mut FixedRoll(250_000));
        assert_eq!(past_end.drop.id, "b");
        assert!(past_end.integrity.is_some());
    }

    #[test]
    fn empirical_frequencies_track_weights() {
        let table = two_drop_table();
        let mut source = RngSource::new(StdRng::seed_from_u64(7));
        let draws = 200_000;
        let mut hits_a = 0u32;
        for _ in 0..draws {
            if draw(&table, &mut source).drop.id == "a" {
                hits_a += 1;
            }
        }
        let freq = f64::from(hits_a) / f64::from(draws);
        assert!((freq - 0.30).abs() < 0.01, "frequency {freq} too far from 0.30");
    }

    #[test]
    fn display_sequence_places_winner_at_position() {
        let catalog = vec!["a", "b", "c"];
        let mut source = RngSource::new(StdRng::seed_from_u64(11));
        for (length, position) in [(1, 0), (10, 9), (50, 35)] {
            let reel = generate_display_sequence(&catalog, &"winner", length, position, &mut source)
                .expect("reel");
            assert_eq!(reel.len(), length);
            assert_eq!(reel[position], "winner");
            for (idx, slot) in reel.iter().enumerate() {
                if idx != position {
                    assert!(catalog.contains(slot));
                }
            }
        }
    }

    #[test]
    fn display_sequence_samples_full_catalog_uniformly() {
        let catalog = vec![1u8, 2, 3, 4];
        let mut source = RecordingSource::default();
        let reel = generate_display_sequence(&catalog, &9u8, 50, 35, &mut source).expect("reel");
        assert_eq!(source.bounds.len(), 49);
        assert!(source.bounds.iter().all(|bound| *bound == 4));
        assert_eq!(reel[35], 9);
        assert!(reel.iter().filter(|slot| **slot == 9).count() == 1);
    }

    #[test]
    fn display_sequence_rejects_bad_geometry() {
        let mut source = FixedRoll(0);
        let err = generate_display_sequence(&[1u8], &1u8, 5, 5, &mut source).expect_err("position");
        assert_eq!(err, DrawError::InvalidReel { length: 5, position: 5 });

        let empty: [u8; 0] = [];
        let err = generate_display_sequence(&empty, &1u8, 5, 2, &mut source).expect_err("catalog");
        assert!(matches!(err, DrawError::InvalidCase(_)));
    }

    #[test]
    fn fingerprint_changes_when_ranges_change() {
        let original = two_drop_table();
        let shifted = build_partition(
            &[ranged("a", 0, 30_001), ranged("b", 30_001, 100_000)],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");
        assert_ne!(original.fingerprint(), shifted.fingerprint());
        assert_eq!(original.fingerprint(), two_drop_table().fingerprint());
    }

    #[test]
    fn zero_width_drop_sorted_last_never_wins_the_fallback() {
        let table = build_partition(
            &[
                ranged("a", 0, 30_000),
                ranged("b", 50_000, 90_000),
                ranged("z", 100_000, 100_000),
            ],
            DEFAULT_DRAW_SPACE,
        )
        .expect("valid partition");
        let outcome = draw_with_roll(&table, 95_000);
        assert_eq!(outcome.drop.id, "b");
        let warning = outcome.integrity.expect("gap roll warns");
        assert_eq!(warning.fallback_drop_id, "b");
    }

    fn case_with(price: i64, drops: Vec<CaseDrop>) -> Case {
        Case {
            url_name: "chroma".to_string(),
            website_name: "Chroma Case".to_string(),
            price: Money::from_cents(price),
            expired: false,
            category: None,
            golden_case: false,
            img_name: None,
            position_in_grid: None,
            drops,
        }
    }

    #[test]
    fn negative_prices_make_a_case_invalid() {
        let valid = case_with(250, vec![ranged("a", 0, 100_000)]);
        assert!(validate_case(&valid, DEFAULT_DRAW_SPACE).is_ok());

        let negative_case = case_with(-500, vec![ranged("a", 0, 100_000)]);
        assert!(matches!(
            validate_case(&negative_case, DEFAULT_DRAW_SPACE),
            Err(DrawError::InvalidCase(_))
        ));

        let mut cheap = ranged("a", 0, 100_000);
        cheap.skin_price = Money::from_cents(-9_000);
        let negative_drop = case_with(250, vec![cheap]);
        assert!(matches!(
            validate_case(&negative_drop, DEFAULT_DRAW_SPACE),
            Err(DrawError::InvalidCase(_))
        ));
    }
}
