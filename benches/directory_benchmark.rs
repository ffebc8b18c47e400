use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use playpal::models::{Sport, Team};
use playpal::services::directory::{filter_teams, sport_icon};
use playpal::services::TeamFilter;
use std::hint::black_box;

fn directory(size: usize) -> Vec<Team> {
    let towns = ["Palo Alto", "San Jose", "Santa Cruz", "Menlo Park", "Gilroy"];
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..size)
        .map(|i| {
            let sport = Sport::ALL[i % Sport::ALL.len()];
            Team {
                id: format!("team-{}", i),
                team_name: format!("{} Club {}", sport.name(), i),
                sport: sport.name().to_string(),
                location: towns[i % towns.len()].to_string(),
                description: "Weekly games".to_string(),
                max_members: 10,
                members: vec![format!("creator-{}", i)],
                creator_id: format!("creator-{}", i),
                creator_name: "Creator".to_string(),
                created_at: start + Duration::seconds(i as i64),
            }
        })
        .collect()
}

fn benchmark_filter(c: &mut Criterion) {
    let teams = directory(5_000);

    let mut group = c.benchmark_group("directory_filter");

    group.bench_function("no_filter", |b| {
        let filter = TeamFilter::default();
        b.iter(|| filter_teams(black_box(teams.clone()), &filter))
    });

    group.bench_function("search_and_sport", |b| {
        let filter = TeamFilter::new("santa", Some("Tennis"));
        b.iter(|| filter_teams(black_box(teams.clone()), &filter))
    });

    group.finish();
}

fn benchmark_icons(c: &mut Criterion) {
    let names: Vec<&str> = Sport::ALL
        .iter()
        .map(|s| s.name())
        .chain(["Curling", ""])
        .collect();

    c.bench_function("sport_icon_lookup", |b| {
        b.iter(|| {
            for name in &names {
                black_box(sport_icon(black_box(name)));
            }
        })
    });
}

criterion_group!(benches, benchmark_filter, benchmark_icons);
criterion_main!(benches);
