use std::{env, fs, process};

use serde::Deserialize;

use darts_knockout::{
    bracket::Bracket,
    document::TournamentDocument,
    matchup::MatchOptions,
    side::{Side, SideId},
    sheet::{Sheet, SheetSlot},
    status::Status,
    tournament::Tournament,
};

#[derive(Debug, Deserialize)]
struct MatchRecord {
    depth: usize,
    side_a: String,
    side_b: Option<String>,
    score_a: Option<u16>,
    score_b: Option<u16>,
}

fn match_records() -> anyhow::Result<Vec<MatchRecord>> {
    let twelve_sides_csv = include_str!("twelve_sides.csv");
    let mut reader = csv::Reader::from_reader(twelve_sides_csv.as_bytes());

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }

    Ok(records)
}

fn roster(count: usize) -> Vec<Side> {
    (1..=count)
        .map(|i| Side::new(&format!("s{i:02}"), &format!("Side {i}")))
        .collect()
}

/// Plays the recorded matches depth by depth. Matches are added by hand, the
/// byes come from seeding what is left.
fn play_records(bracket: &mut Bracket, records: &[MatchRecord]) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let last_depth = records.iter().map(|record| record.depth).max().unwrap_or(0);

    for depth in 1..=last_depth {
        assert_eq!(bracket.start_next_round()?, depth);
        names.push(bracket.round_name(depth).to_string());

        let records: Vec<_> = records.iter().filter(|record| record.depth == depth).collect();
        for record in records.iter().filter(|record| record.side_b.is_some()) {
            let index = bracket.add_match(
                depth,
                Some(SideId::from(record.side_a.as_str())),
                record.side_b.as_deref().map(SideId::from),
            )?;

            if let (Some(score_a), Some(score_b)) = (record.score_a, record.score_b) {
                bracket.record_score(depth, index, score_a, score_b)?;
            }
        }

        let byes = records.iter().filter(|record| record.side_b.is_none()).count();
        assert_eq!(bracket.seed_round(depth)?, byes);

        let round = bracket.round(depth)?;
        for record in records.iter().filter(|record| record.side_b.is_none()) {
            let bye = round
                .matches()
                .find(|matchup| matchup.is_bye())
                .map(|matchup| matchup.side_a.0.clone());
            assert_eq!(bye.as_deref(), Some(record.side_a.as_str()));
        }
        assert!(round.is_complete());
    }

    Ok(names)
}

#[test]
fn twelve_sides_play_through() -> anyhow::Result<()> {
    let records = match_records()?;
    let mut bracket = Bracket::new(roster(12), MatchOptions::default());

    assert_eq!(bracket.rounds_required(), 4);
    let names = play_records(&mut bracket, &records)?;
    assert_eq!(names, ["Round 1", "Quarter-Final", "Semi-Final", "Final"]);

    let quarter_final_pool: Vec<_> = bracket.pool(2).into_iter().map(|side| side.id.0).collect();
    assert_eq!(quarter_final_pool, ["s01", "s11", "s03", "s04", "s08", "s06"]);

    let final_pool: Vec<_> = bracket.pool(4).into_iter().map(|side| side.id.0).collect();
    assert_eq!(final_pool, ["s08", "s03"]);

    assert_eq!(bracket.winner().map(|side| side.id.0), Some("s03".to_string()));
    assert!(!bracket.can_start_next_round());

    Ok(())
}

#[test]
fn losers_never_advance() -> anyhow::Result<()> {
    let records = match_records()?;
    let mut bracket = Bracket::new(roster(12), MatchOptions::default());
    play_records(&mut bracket, &records)?;

    for depth in 1..bracket.rounds.len() {
        let next_pool = bracket.pool(depth + 1);
        for matchup in bracket.round(depth)?.matches() {
            if let Some(loser) = matchup.loser() {
                assert!(next_pool.iter().all(|side| &side.id != loser), "{loser}");
            }
            if let Status::Decided(winner) = matchup.status() {
                assert!(next_pool.iter().any(|side| side.id == winner), "{winner}");
            }
        }
    }

    Ok(())
}

#[test]
fn sheet_after_the_first_round() -> anyhow::Result<()> {
    let records = match_records()?;
    let first_round: Vec<_> = records.into_iter().filter(|record| record.depth == 1).collect();
    let mut bracket = Bracket::new(roster(12), MatchOptions::default());
    play_records(&mut bracket, &first_round)?;

    let sheet = Sheet::new(&bracket);
    let names: Vec<_> = sheet.rounds.iter().map(|round| round.name.to_string()).collect();
    assert_eq!(names, ["Round 1", "Quarter-Final", "Semi-Final", "Final"]);

    let quarter_final = &sheet.rounds[1].matches;
    assert_eq!(quarter_final.len(), 3);
    assert_eq!(quarter_final[0].side_a, SheetSlot::Side("Side 1".to_string()));
    assert_eq!(quarter_final[0].side_b, Some(SheetSlot::Side("Side 11".to_string())));
    assert_eq!(sheet.rounds[2].matches.len(), 2);
    assert!(sheet.rounds[2].matches[1].is_bye());
    assert!(sheet.winner.is_none());

    Ok(())
}

#[test]
fn save_and_load_a_bracket() -> anyhow::Result<()> {
    let records = match_records()?;
    let mut bracket = Bracket::new(roster(12), MatchOptions::default());
    play_records(&mut bracket, &records)?;

    let dir = env::temp_dir().join(format!("darts-knockout-{}", process::id()));
    fs::create_dir_all(&dir)?;

    for file in ["bracket.ron", "bracket.json"] {
        let path = dir.join(file);
        TournamentDocument::from(&bracket).save(&path)?;
        let loaded = Bracket::from(&TournamentDocument::load(&path)?);
        assert_eq!(loaded, bracket, "{file}");
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn five_sides_over_the_protocol() -> anyhow::Result<()> {
    let mut tournament = Tournament::default();
    for i in 1..=5 {
        tournament.read_line(&format!("side s{i} Side {i}"))?;
    }

    assert_eq!(tournament.read_line("next_round")?, Some("1 Quarter-Final".to_string()));
    assert_eq!(tournament.read_line("seed 1")?, Some("3".to_string()));
    assert!(tournament.read_line("score 1 2 3 0").is_err());

    tournament.read_line("score 1 0 3 0")?;
    assert!(tournament.read_line("next_round").is_err());
    tournament.read_line("score 1 1 0 3")?;

    assert_eq!(tournament.read_line("next_round")?, Some("2 Semi-Final".to_string()));
    assert_eq!(tournament.read_line("pool 2")?, Some("s1 s4 s5".to_string()));

    Ok(())
}
