#[cfg(feature = "bench")]
use std::{hint::black_box, time::Duration};

#[cfg(feature = "bench")]
use criterion::{Criterion, criterion_group, criterion_main};

#[cfg(feature = "bench")]
use darts_knockout::{bracket::Bracket, matchup::MatchOptions, sheet::Sheet, side::Side};

#[cfg(feature = "bench")]
fn roster(count: usize) -> Vec<Side> {
    (1..=count)
        .map(|i| Side::new(&format!("s{i}"), &format!("Side {i}")))
        .collect()
}

#[cfg(feature = "bench")]
fn play_out(sides: Vec<Side>) -> anyhow::Result<Bracket> {
    let mut bracket = Bracket::new(sides, MatchOptions::default());

    while bracket.can_start_next_round() {
        let depth = bracket.start_next_round()?;
        bracket.seed_round(depth)?;

        let round = bracket.round(depth)?;
        let playable: Vec<usize> = round
            .matches()
            .enumerate()
            .filter(|(_, matchup)| !matchup.is_bye())
            .map(|(index, _)| index)
            .collect();

        for index in playable {
            bracket.record_score(depth, index, 3, 2)?;
        }
    }

    Ok(bracket)
}

#[cfg(feature = "bench")]
fn bracket_play_outs(c: &mut Criterion) {
    let sides = roster(256);
    c.bench_function("bracket_play_out_256", move |b| {
        b.iter(|| play_out(black_box(sides.clone())).unwrap());
    });
}

#[cfg(feature = "bench")]
fn sheet_projection(c: &mut Criterion) {
    let mut bracket = Bracket::new(roster(100), MatchOptions::default());
    bracket.start_next_round().unwrap();
    bracket.seed_round(1).unwrap();

    c.bench_function("sheet_projection_100", move |b| {
        b.iter(|| Sheet::new(black_box(&bracket)));
    });
}

#[cfg(feature = "bench")]
criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = bracket_play_outs, sheet_projection
}

#[cfg(feature = "bench")]
criterion_main!(benches);

#[cfg(not(feature = "bench"))]
fn main() {
    eprintln!("You must enable pass `--features=bench`");
}
