//! 저장된 포인트로부터 통계를 다시 계산하는 읽기 전용 집계.
//!
//! 누적 카운터(DefenderStats)를 읽지 않고 포인트와 출전 수비수 목록에서 직접 세므로
//! 두 값을 비교하면 카운터가 어긋났는지 확인할 수 있습니다.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::domain::defender::entity::defender;
use crate::domain::game::dto::{GameResponse, OffensivePlayerResponse};
use crate::domain::point::dto::PointResponse;
use crate::domain::point::stats::{break_percentage, break_percentage_label};

use super::dto::{DefenderReportItem, GameTotals};

pub const CSV_HEADER: [&str; 13] = [
    "Game",
    "Opponent",
    "Location",
    "Date",
    "Point #",
    "Got Break",
    "Wind Speed",
    "Wind Direction",
    "Offensive Player",
    "Position",
    "Defender",
    "Result",
    "Notes",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub points_played: i32,
    pub breaks: i32,
    pub no_breaks: i32,
}

impl Tally {
    pub fn record(&mut self, got_break: bool) {
        self.points_played += 1;
        if got_break {
            self.breaks += 1;
        } else {
            self.no_breaks += 1;
        }
    }
}

/// (브레이크 여부, 출전 수비수) 목록으로 수비수별 집계
pub fn tally_defenders<'a, I>(points: I) -> BTreeMap<i64, Tally>
where
    I: IntoIterator<Item = (bool, &'a [i64])>,
{
    let mut tallies: BTreeMap<i64, Tally> = BTreeMap::new();
    for (got_break, defender_ids) in points {
        for defender_id in defender_ids {
            tallies.entry(*defender_id).or_default().record(got_break);
        }
    }
    tallies
}

pub fn game_totals(points: &[PointResponse]) -> GameTotals {
    let mut tally = Tally::default();
    for p in points {
        tally.record(p.got_break);
    }
    GameTotals::from(tally)
}

impl From<Tally> for GameTotals {
    fn from(t: Tally) -> Self {
        Self {
            points: t.points_played,
            breaks: t.breaks,
            no_breaks: t.no_breaks,
            break_percentage: break_percentage(t.breaks, t.points_played),
        }
    }
}

/// 집계를 수비수 정보와 합쳐 보고서 행으로 변환
///
/// `roster`에 있는 수비수는 출전 기록이 없어도 0으로 포함됩니다.
/// 출전 수 내림차순, 같으면 id 오름차순.
pub fn defender_reports(
    tallies: &BTreeMap<i64, Tally>,
    roster: &[defender::Model],
) -> Vec<DefenderReportItem> {
    let mut names: HashMap<i64, &defender::Model> =
        roster.iter().map(|d| (d.defender_id, d)).collect();

    let mut items: Vec<DefenderReportItem> = tallies
        .iter()
        .map(|(id, t)| {
            let found = names.remove(id);
            report_item(*id, found, *t)
        })
        .collect();
    items.extend(
        names
            .into_values()
            .map(|d| report_item(d.defender_id, Some(d), Tally::default())),
    );

    items.sort_by(|a, b| {
        b.points_played
            .cmp(&a.points_played)
            .then(a.defender_id.cmp(&b.defender_id))
    });
    items
}

fn report_item(defender_id: i64, found: Option<&defender::Model>, t: Tally) -> DefenderReportItem {
    DefenderReportItem {
        defender_id,
        name: found.map(|d| d.name.clone()).unwrap_or_default(),
        jersey_number: found.and_then(|d| d.jersey_number),
        points_played: t.points_played,
        breaks: t.breaks,
        no_breaks: t.no_breaks,
        break_percentage: break_percentage(t.breaks, t.points_played),
        break_percentage_label: break_percentage_label(t.breaks, t.points_played),
    }
}

/// 매치업 하나당 한 줄. 매치업이 없는 포인트는 매치업 칸을 비운 한 줄.
pub fn render_game_csv(
    game: &GameResponse,
    players: &[OffensivePlayerResponse],
    defender_names: &HashMap<i64, String>,
    points: &[PointResponse],
) -> String {
    let players: HashMap<i64, &OffensivePlayerResponse> =
        players.iter().map(|p| (p.offensive_player_id, p)).collect();

    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    let date = game.game_date.format("%Y-%m-%d").to_string();
    for p in points {
        let prefix = [
            game.name.clone(),
            game.opponent.clone(),
            game.location.clone().unwrap_or_default(),
            date.clone(),
            p.point_number.to_string(),
            if p.got_break { "Yes" } else { "No" }.to_string(),
            p.wind_speed.map(|w| w.to_string()).unwrap_or_default(),
            p.wind_direction.clone().unwrap_or_default(),
        ];
        let notes = p.notes.clone().unwrap_or_default();

        if p.matchups.is_empty() {
            let blanks = std::iter::repeat(String::new()).take(4);
            push_row(
                &mut out,
                prefix.iter().cloned().chain(blanks).chain([notes]),
            );
            continue;
        }

        for m in &p.matchups {
            let player = players.get(&m.offensive_player_id);
            let matchup_cols = [
                player.map(|pl| pl.name.clone()).unwrap_or_default(),
                player
                    .map(|pl| pl.position.label().to_string())
                    .unwrap_or_default(),
                m.defender_id
                    .and_then(|id| defender_names.get(&id).cloned())
                    .unwrap_or_default(),
                m.result.label().to_string(),
            ];
            push_row(
                &mut out,
                prefix
                    .iter()
                    .cloned()
                    .chain(matchup_cols)
                    .chain([notes.clone()]),
            );
        }
    }
    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

/// RFC 4180: 쉼표, 따옴표, 줄바꿈이 있으면 따옴표로 감싸고 내부 따옴표는 두 번 씁니다.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::game::entity::game::GameStatus;
    use crate::domain::game::entity::offensive_player::PlayerPosition;
    use crate::domain::point::dto::MatchupResponse;
    use crate::domain::point::entity::matchup::MatchupResult;

    fn at(h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn game() -> GameResponse {
        GameResponse {
            game_id: 1,
            team_id: 1,
            name: "Nationals, Pool A".to_string(),
            opponent: "Ring".to_string(),
            location: None,
            game_date: at(10),
            slug: "nationals-pool-a".to_string(),
            share_code: "abc".to_string(),
            status: GameStatus::InProgress,
            is_public: false,
            notes: None,
            created_at: at(9),
            updated_at: at(9),
        }
    }

    fn point(number: i32, got_break: bool, ids: Vec<i64>, matchups: Vec<MatchupResponse>) -> PointResponse {
        PointResponse {
            point_id: number as i64,
            game_id: 1,
            point_number: number,
            got_break,
            wind_speed: None,
            wind_direction: None,
            notes: None,
            selected_defender_ids: ids,
            matchups,
            created_at: at(11),
            updated_at: at(11),
        }
    }

    fn defender(id: i64, name: &str) -> defender::Model {
        defender::Model {
            defender_id: id,
            team_id: 1,
            name: name.to_string(),
            jersey_number: Some(id as i32),
            position: None,
            notes: None,
            active: true,
            created_at: at(8),
            updated_at: at(8),
        }
    }

    #[test]
    fn should_tally_credited_defenders_per_point() {
        // Arrange
        let points = [point(1, true, vec![1, 2], vec![]), point(2, false, vec![1], vec![])];

        // Act
        let tallies = tally_defenders(
            points
                .iter()
                .map(|p| (p.got_break, p.selected_defender_ids.as_slice())),
        );

        // Assert
        assert_eq!(
            tallies[&1],
            Tally { points_played: 2, breaks: 1, no_breaks: 1 }
        );
        assert_eq!(
            tallies[&2],
            Tally { points_played: 1, breaks: 1, no_breaks: 0 }
        );
    }

    #[test]
    fn should_include_idle_roster_defenders_with_zero_percentage() {
        let tallies = tally_defenders([(true, [1_i64].as_slice())]);
        let roster = vec![defender(1, "Alex"), defender(2, "Blair")];

        let items = defender_reports(&tallies, &roster);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].defender_id, 1);
        assert_eq!(items[0].break_percentage, 100);
        assert_eq!(items[1].name, "Blair");
        assert_eq!(items[1].break_percentage, 0);
        assert_eq!(items[1].break_percentage_label, "N/A");
    }

    #[test]
    fn should_compute_game_totals() {
        let points = [
            point(1, true, vec![], vec![]),
            point(2, false, vec![], vec![]),
            point(3, false, vec![], vec![]),
        ];

        let totals = game_totals(&points);

        assert_eq!(totals.points, 3);
        assert_eq!(totals.breaks, 1);
        assert_eq!(totals.no_breaks, 2);
        assert_eq!(totals.break_percentage, 33);
    }

    #[test]
    fn should_quote_fields_with_separators() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn should_render_one_row_per_matchup_and_blank_row_for_empty_point() {
        // Arrange
        let players = vec![OffensivePlayerResponse {
            offensive_player_id: 7,
            game_id: 1,
            name: "Jordan".to_string(),
            position: PlayerPosition::Handler,
            is_bench: false,
            order: 0,
        }];
        let names = HashMap::from([(3_i64, "Casey".to_string())]);
        let matchup = MatchupResponse {
            matchup_id: 1,
            point_id: 1,
            offensive_player_id: 7,
            defender_id: Some(3),
            result: MatchupResult::Shutdown,
            is_active: true,
        };
        let points = vec![
            point(1, true, vec![3], vec![matchup]),
            point(2, false, vec![], vec![]),
        ];

        // Act
        let csv = render_game_csv(&game(), &players, &names, &points);

        // Assert
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            "\"Nationals, Pool A\",Ring,,2024-06-01,1,Yes,,,Jordan,Handler,Casey,Shutdown,"
        );
        assert_eq!(lines[2], "\"Nationals, Pool A\",Ring,,2024-06-01,2,No,,,,,,,");
    }
}
