// Criterion benchmarks for Pairing Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pairing_algo::core::{
    build_score_matrix, filter, partition, CancellationToken, CompatibilityTable, MatchingEngine,
    MatchingInput,
};
use pairing_algo::models::{ScoringWeights, SurveyParticipant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const IDENTITIES: [&str; 3] = ["Male", "Female", "Nonbinary"];
const PREFERENCES: [&str; 3] = ["Men", "Women", "Bisexual"];

fn create_input(n: usize, seed: u64) -> MatchingInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 0.0 } else { rng.gen::<f64>() }).collect())
        .collect();
    let identities: Vec<&str> = (0..n).map(|i| IDENTITIES[i % 3]).collect();
    let preferences: Vec<&str> = (0..n).map(|i| PREFERENCES[(i / 3) % 3]).collect();

    MatchingInput::from_raw(rows, identities, preferences).expect("valid benchmark input")
}

fn create_survey(n: usize) -> Vec<SurveyParticipant> {
    (0..n)
        .map(|i| SurveyParticipant {
            name: None,
            gender_identity: IDENTITIES[i % 3].to_string(),
            gender_preference: PREFERENCES[(i / 3) % 3].to_string(),
            grad_year: 2024 + (i % 4) as i32,
            responses: (0..20).map(|q| ((i * 7 + q * 3) % 5) as u8).collect(),
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let input = create_input(500, 1);
    let table = CompatibilityTable::standard();

    c.bench_function("compatibility_filter_500", |b| {
        b.iter(|| filter(black_box(input.scores()), black_box(input.participants()), &table));
    });
}

fn bench_partition(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("role_partition_1000", |b| {
        b.iter(|| partition(black_box(1000), &mut rng));
    });
}

fn bench_matching(c: &mut Criterion) {
    let engine = MatchingEngine::default();
    let mut group = c.benchmark_group("matching");

    for participant_count in [10, 50, 200, 500].iter() {
        let input = create_input(*participant_count, 42);

        group.bench_with_input(
            BenchmarkId::new("run", participant_count),
            participant_count,
            |b, _| {
                b.iter(|| {
                    engine.run_with_rng(
                        black_box(&input),
                        &mut StdRng::seed_from_u64(7),
                        &CancellationToken::new(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_survey_scoring(c: &mut Criterion) {
    let survey = create_survey(200);
    let weights = ScoringWeights::default();

    c.bench_function("survey_score_matrix_200", |b| {
        b.iter(|| build_score_matrix(black_box(&survey), &weights));
    });
}

criterion_group!(
    benches,
    bench_filter,
    bench_partition,
    bench_matching,
    bench_survey_scoring
);

criterion_main!(benches);
