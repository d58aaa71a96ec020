use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    bracket::Bracket,
    matchup::Match,
    round::InvalidEdit,
    side::SideId,
};

/// A partial update carrying one match to the server. The match sits under
/// one `nextRound` per level between the root round and its own round:
///
/// ```text
/// depth 1: { "round": { "match": {..} } }
/// depth 2: { "round": { "nextRound": { "match": {..} } } }
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TournamentPatch {
    pub round: RoundPatch,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPatch {
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub matchup: Option<MatchPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_round: Option<Box<RoundPatch>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPatch {
    pub side_a: SideId,
    pub side_b: Option<SideId>,
    pub score_a: Option<u16>,
    pub score_b: Option<u16>,
}

impl From<&Match> for MatchPatch {
    fn from(matchup: &Match) -> Self {
        Self {
            side_a: matchup.side_a.clone(),
            side_b: matchup.side_b.clone(),
            score_a: matchup.score_a,
            score_b: matchup.score_b,
        }
    }
}

impl TournamentPatch {
    /// Depth 0 is treated as the root round.
    #[must_use]
    pub fn for_match(depth: usize, matchup: &Match) -> Self {
        let mut round = RoundPatch {
            matchup: Some(MatchPatch::from(matchup)),
            next_round: None,
        };

        for _ in 1..depth {
            round = RoundPatch {
                matchup: None,
                next_round: Some(Box::new(round)),
            };
        }

        Self { round }
    }

    /// The depth of the round holding the patched match, with the match.
    #[must_use]
    pub fn innermost(&self) -> (usize, Option<&MatchPatch>) {
        let mut depth = 1;
        let mut round = &self.round;

        while let Some(next_round) = &round.next_round {
            depth += 1;
            round = next_round;
        }

        (depth, round.matchup.as_ref())
    }

    /// Applies the patched scores to the match in `bracket` with the same
    /// sides at the same depth.
    ///
    /// # Errors
    ///
    /// If the round is missing or none of its matches has those sides.
    pub fn apply(&self, bracket: &mut Bracket) -> Result<(), InvalidEdit> {
        let (depth, Some(patch)) = self.innermost() else {
            return Err(InvalidEdit::PatchMismatch(self.innermost().0));
        };

        let index = bracket
            .round(depth)?
            .matches()
            .position(|matchup| matchup.side_a == patch.side_a && matchup.side_b == patch.side_b)
            .ok_or(InvalidEdit::PatchMismatch(depth))?;

        match (patch.score_a, patch.score_b) {
            (Some(score_a), Some(score_b)) => {
                bracket.record_score(depth, index, score_a, score_b)?;
            }
            _ => debug!("patch at depth {depth} carries no complete score"),
        }

        Ok(())
    }

    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{matchup::MatchOptions, side::Side};

    fn scored() -> Match {
        let mut matchup = Match::new(SideId::from("a"), SideId::from("b"));
        matchup.score_a = Some(3);
        matchup.score_b = Some(2);
        matchup
    }

    #[test]
    fn root_round_patch() -> anyhow::Result<()> {
        let patch = TournamentPatch::for_match(1, &scored());

        assert_eq!(
            serde_json::to_value(&patch)?,
            json!({ "round": { "match": { "sideA": "a", "sideB": "b", "scoreA": 3, "scoreB": 2 } } })
        );
        assert_eq!(TournamentPatch::for_match(0, &scored()), patch);

        Ok(())
    }

    #[test]
    fn nested_patch_wraps_once_per_level() -> anyhow::Result<()> {
        let patch = TournamentPatch::for_match(3, &scored());

        assert_eq!(
            serde_json::to_value(&patch)?,
            json!({
                "round": {
                    "nextRound": {
                        "nextRound": {
                            "match": { "sideA": "a", "sideB": "b", "scoreA": 3, "scoreB": 2 }
                        }
                    }
                }
            })
        );
        assert_eq!(patch.innermost().0, 3);

        Ok(())
    }

    #[test]
    fn patch_applies_to_the_matching_match() -> anyhow::Result<()> {
        let sides = ["a", "b", "c", "d"]
            .into_iter()
            .map(|id| Side::new(id, id))
            .collect();
        let mut bracket = Bracket::new(sides, MatchOptions::default());
        bracket.start_next_round()?;
        bracket.seed_round(1)?;

        let json = r#"{"round":{"match":{"sideA":"c","sideB":"d","scoreA":1,"scoreB":3}}}"#;
        let patch: TournamentPatch = serde_json::from_str(json)?;
        patch.apply(&mut bracket)?;

        let matchup = bracket.find_match(1, 1).map(|matchup| (matchup.score_a, matchup.score_b));
        assert_eq!(matchup, Some((Some(1), Some(3))));

        let json = r#"{"round":{"nextRound":{"match":{"sideA":"c","sideB":"d","scoreA":1,"scoreB":3}}}}"#;
        let patch: TournamentPatch = serde_json::from_str(json)?;
        assert_eq!(patch.apply(&mut bracket), Err(InvalidEdit::NoSuchRound(2)));

        Ok(())
    }
}
