// Property-style tests for the public scoring API, driven by seeded random
// record streams so failures are reproducible.

use bincompare::{
    Correlator, MatchRecord, Record, RecordSeq, ScoringConfig, Significance, correlate,
    correlate_parallel, score,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_records(rng: &mut StdRng, n: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(n * 4);
    for _ in 0..n {
        // Small alphabet so partial matches actually happen
        let rec = [
            rng.gen_range(1..5u8),
            rng.gen_range(0..3u8),
            rng.gen_range(0..2u8),
            rng.gen_range(0..2u8),
        ];
        bytes.extend_from_slice(&rec);
    }
    bytes
}

#[test]
fn test_self_score_is_length_times_exact_weight() {
    let cfg = ScoringConfig::default();
    let mut rng = StdRng::seed_from_u64(0xB1C0_4DA7);
    for len in [1usize, 2, 7, 64, 333] {
        let bytes = random_records(&mut rng, len);
        let seq = RecordSeq::new(&bytes);
        let res = score(seq, seq, 10, &cfg);
        assert_eq!(res.score, len as i64 * i64::from(cfg.exact));
        assert_eq!(res.matched_len, len);
        assert!(res.boundary);
    }
}

#[test]
fn test_scoring_is_pure() {
    let cfg = ScoringConfig {
        exact: 8,
        half: 3,
        prefix: 1,
        mismatch: -5,
    };
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_records(&mut rng, 200);
    let b = random_records(&mut rng, 300);
    let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));
    for start in 0..50 {
        let first = score(sa.tail(start), sb.tail(start * 2), 4, &cfg);
        let second = score(sa.tail(start), sb.tail(start * 2), 4, &cfg);
        assert_eq!(first, second);
    }
}

#[test]
fn test_reported_matches_clear_cutoffs_and_stay_in_bounds() {
    let cfg = ScoringConfig::default();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let a = random_records(&mut rng, 60);
    let b = random_records(&mut rng, 90);
    let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));

    let found: Vec<MatchRecord> = correlate(sa, sb, 10, &cfg).collect();
    for m in &found {
        assert!(m.score >= 13);
        assert!(m.matched_len >= 4);
        assert!(m.small_start + m.matched_len <= sa.len());
        assert!(m.large_start + m.matched_len <= sb.len());
    }
}

#[test]
fn test_matches_on_a_diagonal_never_overlap() {
    let cfg = ScoringConfig::default();
    let mut rng = StdRng::seed_from_u64(99);
    let a = random_records(&mut rng, 80);
    let b = random_records(&mut rng, 80);
    let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));

    let found: Vec<MatchRecord> = correlate(sa, sb, 10, &cfg).collect();
    for pair in found.windows(2) {
        let (x, y) = (pair[0], pair[1]);
        let dx = x.large_start as i64 - x.small_start as i64;
        let dy = y.large_start as i64 - y.small_start as i64;
        assert!(dx <= dy, "diagonal order violated: {:?} then {:?}", x, y);
        if dx == dy {
            assert!(y.small_start >= x.small_start + x.matched_len);
        }
    }
}

#[test]
fn test_contiguous_region_reported_once() {
    let cfg = ScoringConfig::default();
    let k = 9;
    let mut small: Vec<u8> = Vec::new();
    let mut large: Vec<u8> = Vec::new();
    for i in 0..4u8 {
        small.extend_from_slice(&[0xd0, i + 1, 0, 0]);
    }
    for i in 0..2u8 {
        large.extend_from_slice(&[0xe0, i + 1, 0, 0]);
    }
    for i in 0..k as u8 {
        let rec = Record::new([0x40 + i, 1, 2, 3]);
        small.extend_from_slice(rec.bytes());
        large.extend_from_slice(rec.bytes());
    }
    small.extend_from_slice(Record::TERMINATOR.bytes());
    for i in 0..10u8 {
        large.extend_from_slice(&[0xe8, i + 1, 0, 0]);
    }

    let found: Vec<MatchRecord> =
        correlate(RecordSeq::new(&small), RecordSeq::new(&large), 10, &cfg).collect();
    assert_eq!(
        found,
        vec![MatchRecord {
            small_start: 4,
            large_start: 2,
            score: k as i64 * i64::from(cfg.exact),
            matched_len: k,
        }]
    );
}

#[test]
fn test_parallel_sweep_matches_serial_order() {
    let cfg = ScoringConfig::default();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for (n_small, n_large) in [(0usize, 5usize), (1, 1), (30, 45), (70, 70)] {
        let a = random_records(&mut rng, n_small);
        let b = random_records(&mut rng, n_large);
        let (sa, sb) = (RecordSeq::new(&a), RecordSeq::new(&b));

        let serial: Vec<MatchRecord> =
            Correlator::new(sa, sb, 6, &cfg, Significance::default()).collect();
        let parallel = correlate_parallel(sa, sb, 6, &cfg, Significance::default());
        assert_eq!(serial, parallel);
    }
}
