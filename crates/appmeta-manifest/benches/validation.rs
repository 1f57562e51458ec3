use appmeta_manifest::{Availability, CoverageCheck, Entry, ManifestEntry, ManifestError, Platform};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// 64 dictionaries of 32 leaves each, every leaf declaring iOS availability
fn build_tree() -> Result<Entry, ManifestError> {
    let leaf_availability = Availability::since(&[(Platform::Ios, "14.0")])?;
    let mut sections = Vec::with_capacity(64);
    for section in 0..64 {
        let mut leaves = Vec::with_capacity(32);
        for key in 0..32 {
            leaves.push(Entry::new(
                &format!("Key{section}_{key}"),
                None,
                (key % 2 == 0).into(),
                None,
                Some(leaf_availability.clone()),
                false,
            )?);
        }
        sections.push(Entry::dict(None, &format!("Section{section}"), leaves, None, false)?);
    }
    Entry::array(None, "Root", sections, None, true)
}

fn bench_validation(c: &mut Criterion) {
    let (Ok(tree), Ok(reference)) = (
        build_tree(),
        Availability::since(&[(Platform::Ios, "13.0"), (Platform::Macos, "12.0")]),
    ) else {
        return;
    };

    c.bench_function("validate_sequential", |b| {
        b.iter(|| black_box(tree.validate_with(&reference, &CoverageCheck)));
    });

    c.bench_function("validate_parallel", |b| {
        b.iter(|| black_box(tree.validate_par(&reference, &CoverageCheck)));
    });
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
