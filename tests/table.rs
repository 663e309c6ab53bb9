// HashTable behavioral suite: counter arithmetic, growth policy, and the
// observable dump, driven through the public API only.
//
// Each test documents what behavior is being verified. The core invariants
// exercised:
// - Collision accounting: +N for a new key joining N residents, -1 for a
//   removal that leaves its bucket occupied, untouched by overwrites.
// - Growth: lazy, strictly-above-threshold trigger; target capacity derived
//   from the live item count; entries always survive a resize.
// - Counters and iteration stay coherent through aggressive resize settings.
use hackable_hashmap::{DivisionHash, HashTable, HashTableBuilder, LookupError, PrehashFn};

fn identity(k: &u64) -> u64 {
    *k
}

// Division table over integer keys with the prehash pinned to identity, so
// bucket placement is the bare `key % capacity`.
fn division_table(
    capacity: usize,
) -> HashTable<u64, i32, PrehashFn<fn(&u64) -> u64>, DivisionHash> {
    HashTableBuilder::new()
        .initial_capacity(capacity)
        .prehash(PrehashFn(identity as fn(&u64) -> u64))
        .build()
}

fn division_table_with(
    capacity: usize,
    load_factor: f64,
    growth_rate: f64,
) -> HashTable<u64, i32, PrehashFn<fn(&u64) -> u64>, DivisionHash> {
    HashTableBuilder::new()
        .initial_capacity(capacity)
        .load_factor(load_factor)
        .growth_rate(growth_rate)
        .prehash(PrehashFn(identity as fn(&u64) -> u64))
        .build()
}

// Test: three keys funneled into one bucket by division mod 8.
// Verifies: collision increments are 0, 1, 2 (one per resident entry at
// each insert), total 3, and every key remains retrievable.
#[test]
fn one_shared_bucket_counts_a_collision_per_resident() {
    let mut t = division_table(8);
    t.insert(0, 1);
    assert_eq!(t.collision_count(), 0);
    t.insert(8, 2);
    assert_eq!(t.collision_count(), 1);
    t.insert(16, 3);
    assert_eq!(t.collision_count(), 3);
    assert_eq!(t.len(), 3);
    for (key, value) in [(0, 1), (8, 2), (16, 3)] {
        assert_eq!(t.get(&key), Ok(&value));
    }
}

// Test: a mixed layout (two keys sharing a bucket, one alone), its dump,
// then a forced resize under growth rate 5.
// Verifies: collision_count == 1 from the single shared bucket; the dump
// renders every bucket by index; resize lands on floor(3 * 5) = 15 buckets,
// preserves the entry set, bumps resize_count once, and leaves the
// collision counter alone.
#[test]
fn mixed_buckets_then_forced_growth() {
    let mut t = division_table_with(8, 0.75, 5.0);
    t.insert(0, 1);
    t.insert(2, 2);
    t.insert(8, 3);
    assert_eq!(t.len(), 3);
    assert_eq!(t.collision_count(), 1);

    let expected = "[0]   [(0, 1), (8, 3)]\n\
                    [1]   []\n\
                    [2]   [(2, 2)]\n\
                    [3]   []\n\
                    [4]   []\n\
                    [5]   []\n\
                    [6]   []\n\
                    [7]   []\n";
    assert_eq!(format!("{:?}", t), expected);

    let before: Vec<(u64, i32)> = sorted_entries(&t);
    t.resize();
    assert_eq!(t.capacity(), 15);
    assert_eq!(t.resize_count(), 1);
    assert_eq!(t.collision_count(), 1);
    assert_eq!(sorted_entries(&t), before);
}

// Test: forced resizes on a table with nothing in it.
// Verifies: the target capacity floors at two and each call still counts.
#[test]
fn forced_resizes_on_an_empty_table_floor_at_two() {
    let mut t = division_table(8);
    t.resize();
    assert_eq!(t.capacity(), 2);
    t.resize();
    assert_eq!(t.capacity(), 2);
    assert_eq!(t.resize_count(), 2);
    assert!(t.is_empty());
}

// Test: repeated writes to one key under the default profile.
// Verifies: the second write is an overwrite, not a second entry.
#[test]
fn overwrites_do_not_double_count() {
    let mut t: HashTable<String, i32> = HashTable::new();
    t.insert("a".to_string(), 1);
    t.insert("b".to_string(), 2);
    t.insert("b".to_string(), 3);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&"a".to_string()), Ok(&1));
    assert_eq!(t.get(&"b".to_string()), Ok(&3));
}

// Test: a deliberately thrashing profile (three buckets, 0.2 threshold,
// 5x growth) where almost every insert grows the table first.
// Verifies: growth happens on the second and third inserts, each sized
// from the item count at that moment, and lookups are unaffected.
#[test]
fn thrashing_profile_resizes_on_nearly_every_insert() {
    let mut t = HashTableBuilder::new()
        .initial_capacity(3)
        .load_factor(0.2)
        .growth_rate(5.0)
        .build::<String, i32>();

    t.insert("a".to_string(), 1); // load 0/3: no growth
    assert_eq!(t.capacity(), 3);
    t.insert("b".to_string(), 2); // load 1/3 > 0.2: grow to floor(1 * 5)
    assert_eq!(t.capacity(), 5);
    t.insert("b".to_string(), 3); // load 2/5 > 0.2: grow to floor(2 * 5)
    assert_eq!(t.capacity(), 10);

    assert_eq!(t.resize_count(), 2);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&"a".to_string()), Ok(&1));
    assert_eq!(t.get(&"b".to_string()), Ok(&3));
}

// Test: removal flows under the thrashing profile.
// Verifies: delete-then-get reports KeyNotFound, deleting an absent key
// fails cleanly, and the aggressive resizes never resurrect entries.
#[test]
fn thrashing_profile_removals_stay_clean() {
    let mut t = HashTableBuilder::new()
        .initial_capacity(3)
        .load_factor(0.2)
        .growth_rate(5.0)
        .build::<String, i32>();

    t.insert("a".to_string(), 1);
    t.insert("b".to_string(), 2);
    assert_eq!(t.remove(&"a".to_string()), Ok(1));
    assert_eq!(t.get(&"a".to_string()), Err(LookupError::KeyNotFound));
    assert_eq!(t.remove(&"a".to_string()), Err(LookupError::KeyNotFound));

    t.insert("c".to_string(), 3);
    t.insert("d".to_string(), 4);
    assert_eq!(t.len(), 3);
    assert_eq!(t.iter().count(), 3);
}

// Test: load factor readout.
// Verifies: load_factor() is live entries over buckets at every step,
// including right after a resize changes the denominator.
#[test]
fn load_factor_tracks_items_over_buckets() {
    let mut t = division_table(8);
    assert_eq!(t.load_factor(), 0.0);
    t.insert(1, 1);
    t.insert(2, 2);
    assert_eq!(t.load_factor(), 0.25);
    t.resize(); // floor(2 * 2.0) = 4 buckets
    assert_eq!(t.load_factor(), 0.5);
    t.remove(&1).unwrap();
    assert_eq!(t.load_factor(), 0.25);
}

// Test: a hundred-key churn through several automatic growths.
// Verifies: every key stays reachable across resizes, iteration agrees
// with len, and removals leave exactly the surviving half behind.
#[test]
fn hundred_key_churn_with_automatic_growth() {
    let mut t: HashTable<u64, u64> = HashTable::new();
    for key in 0..100 {
        t.insert(key, key * 10);
    }
    assert_eq!(t.len(), 100);
    assert!(t.resize_count() >= 3);
    assert_eq!(t.iter().count(), 100);
    for key in 0..100 {
        assert_eq!(t.get(&key), Ok(&(key * 10)));
    }

    for key in (0..100).filter(|k| k % 2 == 0) {
        assert_eq!(t.remove(&key), Ok(key * 10));
    }
    assert_eq!(t.len(), 50);
    assert_eq!(t.iter().count(), 50);
    for key in (1..100).step_by(2) {
        assert!(t.contains_key(&key));
    }
    for key in (0..100).step_by(2) {
        assert!(!t.contains_key(&key));
    }
}

fn sorted_entries(
    t: &HashTable<u64, i32, PrehashFn<fn(&u64) -> u64>, DivisionHash>,
) -> Vec<(u64, i32)> {
    let mut entries: Vec<(u64, i32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    entries
}
