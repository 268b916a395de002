// Rankings data loading.
//
// Reads a plain rankings CSV with columns id,name,position,team,rank,tier.
// Tier may be blank; extra columns are ignored.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::draft::{Player, PlayerId, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RankingsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRanking {
    id: PlayerId,
    name: String,
    position: String,
    #[serde(default)]
    team: String,
    rank: u32,
    #[serde(default)]
    tier: Option<u32>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_rankings_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawRanking>() {
        match result {
            Ok(raw) => {
                let Some(position) = Position::from_str_pos(&raw.position) else {
                    warn!("skipping player '{}': unknown position '{}'", raw.name, raw.position);
                    continue;
                };
                if position.is_meta_slot() {
                    warn!("skipping player '{}': {} is not a playing position", raw.name, position);
                    continue;
                }
                players.push(Player {
                    id: raw.id,
                    name: raw.name,
                    position,
                    team: raw.team,
                    rank: raw.rank,
                    tier: raw.tier,
                });
            }
            Err(e) => {
                warn!("skipping malformed rankings row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load players from a rankings CSV, sorted by rank.
pub fn load_rankings(path: &Path) -> Result<Vec<Player>, RankingsError> {
    let file = std::fs::File::open(path).map_err(|e| RankingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut players = load_rankings_from_reader(file).map_err(|e| RankingsError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if players.is_empty() {
        return Err(RankingsError::Validation(format!(
            "rankings CSV {} produced zero valid rows",
            path.display()
        )));
    }
    players.sort_by_key(|p| (p.rank, p.id));
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rankings_csv_roundtrip() {
        let csv_data = "\
id,name,position,team,rank,tier
1,Christian McCaffrey,RB,SF,1,1
2,CeeDee Lamb,WR,DAL,2,1
3,Josh Allen,QB,BUF,20,";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].name, "Christian McCaffrey");
        assert_eq!(players[0].position, Position::RunningBack);
        assert_eq!(players[0].tier, Some(1));
        assert_eq!(players[2].team, "BUF");
        assert!(players[2].tier.is_none());
    }

    #[test]
    fn unknown_position_skipped() {
        let csv_data = "\
id,name,position,team,rank,tier
1,Someone,SP,NYY,1,1
2,Bills D/ST,D/ST,BUF,150,";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position, Position::Defense);
    }

    #[test]
    fn slot_only_positions_skipped() {
        let csv_data = "\
id,name,position,team,rank,tier
1,Utility Guy,FLEX,FA,1,
2,Benchwarmer,BENCH,FA,2,";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn malformed_rows_skipped() {
        let csv_data = "\
id,name,position,team,rank,tier
x,Bad Id,RB,SF,1,1
2,Good Row,WR,DAL,2,1
3,Bad Rank,WR,DAL,two,1";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, 2);
    }

    #[test]
    fn whitespace_trimmed() {
        let csv_data = "\
id,name,position,team,rank,tier
 7 , Tyreek Hill , wr , MIA , 5 , 2 ";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players[0].id, 7);
        assert_eq!(players[0].name, "Tyreek Hill");
        assert_eq!(players[0].position, Position::WideReceiver);
        assert_eq!(players[0].tier, Some(2));
    }

    #[test]
    fn extra_columns_ignored() {
        let csv_data = "\
id,name,position,team,rank,tier,bye,adp
1,Bijan Robinson,RB,ATL,3,1,12,3.4";

        let players = load_rankings_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_rankings(Path::new("/nonexistent/rankings.csv")).unwrap_err();
        assert!(matches!(err, RankingsError::Io { .. }));
    }

    #[test]
    fn empty_file_is_validation_error() {
        let dir = std::env::temp_dir().join("autodraft_test_rankings_empty");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rankings.csv");
        std::fs::write(&path, "id,name,position,team,rank,tier\n").unwrap();

        let err = load_rankings(&path).unwrap_err();
        assert!(matches!(err, RankingsError::Validation(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn loaded_rankings_sorted_by_rank() {
        let dir = std::env::temp_dir().join("autodraft_test_rankings_sorted");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rankings.csv");
        std::fs::write(
            &path,
            "id,name,position,team,rank,tier\n2,B,WR,DAL,9,\n1,A,RB,SF,4,\n",
        )
        .unwrap();

        let players = load_rankings(&path).unwrap();
        assert_eq!(players[0].id, 1);
        assert_eq!(players[1].id, 2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
